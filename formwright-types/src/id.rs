use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

string_id!(
    /// Identifier of a question, stable across edits and reorders.
    QuestionId
);

string_id!(
    /// Identifier of a persisted form document.
    FormId
);

string_id!(
    /// Identifier of a feedback or response record.
    RecordId
);

/// Remote backends hand out integer primary keys; local stores use strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Source of fresh identifiers for questions, forms and records.
pub trait IdGenerator: Send + Sync {
    /// Produce an identifier that this generator has never returned before.
    fn next_id(&self) -> String;
}

/// Time-derived identifiers.
///
/// Each id is the current Unix time in milliseconds as a decimal string,
/// zero-padded to 13 digits. Any time after 2001 already has 13 digits, so
/// the padding only matters for a clock reset to the epoch and ids read the
/// same as a plain millisecond timestamp. Ids are strictly increasing per
/// generator: if the clock stalls or steps backwards the previous value is
/// bumped by one. Equal width keeps string order and numeric order the same.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: AtomicU64,
}

impl ClockIds {
    /// Create a generator with no history.
    pub fn new() -> Self {
        Self::default()
    }

    fn now_millis() -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

impl IdGenerator for ClockIds {
    fn next_id(&self) -> String {
        let now = Self::now_millis();
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return format!("{next:013}"),
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Deterministic identifiers (`prefix` followed by a counter starting at 1).
///
/// Useful in tests and demos where ids must be predictable.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    /// Create a generator producing `{prefix}1`, `{prefix}2`, ...
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::AcqRel);
        format!("{}{n}", self.prefix)
    }
}
