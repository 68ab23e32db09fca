use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// The normalized result of a drag gesture.
///
/// `destination` is `None` when the drag was cancelled or dropped outside
/// the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub source: usize,
    pub destination: Option<usize>,
}

impl MoveEvent {
    /// Move the element at `source` to `destination`.
    pub fn new(source: usize, destination: usize) -> Self {
        Self {
            source,
            destination: Some(destination),
        }
    }

    /// A drag that ended without a drop target.
    pub fn cancelled(source: usize) -> Self {
        Self {
            source,
            destination: None,
        }
    }
}

/// What a [`move_item`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moved {
    /// The element moved from one index to another.
    Moved { from: usize, to: usize },
    /// Source and destination were the same index.
    Unchanged,
    /// The event had no destination.
    Cancelled,
}

/// Move one element of `items` with "remove then insert" semantics.
///
/// The element at `event.source` is removed and reinserted at
/// `event.destination`, where the destination index refers to the list with
/// the source already removed. Moving `[a, b, c]` from 0 to 2 gives
/// `[b, c, a]`.
///
/// A cancelled event leaves `items` untouched. Out-of-range indices are
/// rejected (never clamped) and also leave `items` untouched.
pub fn move_item<T>(items: &mut Vec<T>, event: MoveEvent) -> Result<Moved, ValidationError> {
    let Some(destination) = event.destination else {
        return Ok(Moved::Cancelled);
    };

    let len = items.len();
    for index in [event.source, destination] {
        if index >= len {
            return Err(ValidationError::IndexOutOfRange { index, len });
        }
    }

    if event.source == destination {
        return Ok(Moved::Unchanged);
    }

    let item = items.remove(event.source);
    items.insert(destination, item);
    Ok(Moved::Moved {
        from: event.source,
        to: destination,
    })
}
