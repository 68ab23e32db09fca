//! Newest-first feedback history.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use formwright_types::{Category, FeedbackDraft, FeedbackRecord, IdGenerator};

use crate::{GatewayError, RecordGateway};

/// The storage key holding the feedback history in local stores.
pub const FEEDBACK_KEY: &str = "feedbackItems";

/// The demonstration records a never-used store starts with.
///
/// Content and ids are fixed; timestamps are one, two and three days before
/// `now`.
pub fn seed_records(now: DateTime<Utc>) -> Vec<FeedbackRecord> {
    let seeds = [
        (
            "1",
            FeedbackDraft::new(
                Category::Bug,
                "App Crashes on Startup",
                "The app crashes when I try to open it on my Android device.",
            ),
            1,
        ),
        (
            "2",
            FeedbackDraft::new(
                Category::Feature,
                "Dark Mode Implementation",
                "Please add a dark mode to reduce eye strain at night.",
            )
            .with_contact("user@example.com"),
            2,
        ),
        (
            "3",
            FeedbackDraft::new(
                Category::General,
                "Great User Experience",
                "I love how intuitive the app is to use. Great job on the design!",
            ),
            3,
        ),
    ];

    seeds
        .into_iter()
        .filter_map(|(id, draft, days_ago)| {
            FeedbackRecord::from_draft(draft, id, now - Duration::days(days_ago)).ok()
        })
        .collect()
}

/// Append-only feedback history, newest first.
///
/// New records are prepended, so the stored order is the display order.
pub struct RecordStore<G> {
    gateway: G,
    ids: Arc<dyn IdGenerator>,
}

impl<G: RecordGateway> RecordStore<G> {
    /// Create a store persisting through `gateway`.
    pub fn new(gateway: G, ids: Arc<dyn IdGenerator>) -> Self {
        Self { gateway, ids }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Accept a draft and put it at the front of the history.
    ///
    /// An invalid draft is rejected before the store is read or written.
    pub async fn append(&self, draft: FeedbackDraft) -> Result<FeedbackRecord, GatewayError> {
        draft.validate()?;
        let record = FeedbackRecord::from_draft(draft, self.ids.next_id(), Utc::now())?;

        let mut records = self.gateway.load_records().await?.unwrap_or_default();
        records.insert(0, record.clone());
        self.gateway.store_records(&records).await?;

        tracing::info!(
            id = %record.id(),
            category = %record.category(),
            total = records.len(),
            "appended feedback"
        );
        Ok(record)
    }

    /// The full history, newest first.
    ///
    /// A store that has never been written is seeded with
    /// [`seed_records`] first. A store that was written and later emptied
    /// stays empty.
    pub async fn list_all(&self) -> Result<Vec<FeedbackRecord>, GatewayError> {
        if let Some(records) = self.gateway.load_records().await? {
            return Ok(records);
        }

        let seeded = seed_records(Utc::now());
        self.gateway.store_records(&seeded).await?;
        tracing::info!(count = seeded.len(), "seeded feedback history");
        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_are_fixed_and_newest_first() {
        let now = Utc::now();
        let seeds = seed_records(now);

        let ids: Vec<&str> = seeds.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(seeds[1].contact(), Some("user@example.com"));
        assert!(seeds.windows(2).all(|w| w[0].created_at() > w[1].created_at()));
        assert_eq!(seeds[0].created_at(), now - Duration::days(1));
    }
}
