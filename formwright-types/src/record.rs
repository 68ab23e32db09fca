use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Answers, FormId, RecordId, ValidationError};

/// The kind of feedback being reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bug,
    Feature,
    #[default]
    General,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Bug, Self::Feature, Self::General];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::General => "general",
        }
    }

    /// Human-readable name for lists, e.g. "Bug".
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::Feature => "Feature",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback as typed by the user, before it is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub category: Category,
    pub title: String,
    pub description: String,
    /// Optional email address to reply to.
    pub contact: Option<String>,
}

impl FeedbackDraft {
    pub fn new(
        category: Category,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            title: title.into(),
            description: description.into(),
            contact: None,
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Title and description must be non-empty after trimming.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyField("description"));
        }
        Ok(())
    }
}

/// A submitted piece of feedback. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    id: RecordId,
    title: String,
    description: String,
    #[serde(rename = "email", default, skip_serializing_if = "Option::is_none")]
    contact: Option<String>,
    #[serde(rename = "type")]
    category: Category,
    #[serde(rename = "timestamp")]
    created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Accept a draft, stamping it with its id and creation time.
    ///
    /// A blank contact is dropped.
    pub fn from_draft(
        draft: FeedbackDraft,
        id: impl Into<RecordId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            id: id.into(),
            title: draft.title,
            description: draft.description,
            contact: draft.contact.filter(|c| !c.trim().is_empty()),
            category: draft.category,
            created_at,
        })
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A submitted set of answers to one form.
///
/// Remote servers may omit the id, respondent or timestamp when listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(alias = "form")]
    pub form_id: FormId,

    #[serde(
        default,
        alias = "user__username",
        skip_serializing_if = "Option::is_none"
    )]
    pub respondent: Option<String>,

    pub answers: Answers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ResponseRecord {
    pub fn new(id: impl Into<RecordId>, form_id: FormId, answers: Answers, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Some(id.into()),
            form_id,
            respondent: None,
            answers,
            created_at: Some(created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn whitespace_title_is_rejected() {
        let draft = FeedbackDraft::new(Category::Bug, "   ", "Crashes");
        assert_eq!(
            FeedbackRecord::from_draft(draft, "1", Utc::now()),
            Err(ValidationError::EmptyField("title"))
        );
    }

    #[test]
    fn empty_description_is_rejected() {
        let draft = FeedbackDraft::new(Category::Bug, "Bug", "\n");
        assert_eq!(
            draft.validate(),
            Err(ValidationError::EmptyField("description"))
        );
    }

    #[test]
    fn blank_contact_is_dropped() {
        let draft = FeedbackDraft::new(Category::General, "Hi", "There").with_contact("  ");
        let record = FeedbackRecord::from_draft(draft, "1", Utc::now()).unwrap();
        assert_eq!(record.contact(), None);
    }

    #[test]
    fn stored_shape_matches_feedback_items() {
        let json = json!({
            "id": "2",
            "title": "Dark Mode Implementation",
            "description": "Please add a dark mode.",
            "type": "feature",
            "email": "user@example.com",
            "timestamp": "2024-05-01T12:00:00Z"
        });
        let record: FeedbackRecord = serde_json::from_value(json.clone()).unwrap();

        assert_eq!(record.category(), Category::Feature);
        assert_eq!(record.contact(), Some("user@example.com"));
        assert_eq!(serde_json::to_value(&record).unwrap(), json);
    }

    #[test]
    fn response_from_server_listing() {
        let json = json!({ "form": 4, "user__username": "ada", "answers": {} });
        let response: ResponseRecord = serde_json::from_value(json).unwrap();

        assert_eq!(response.form_id.as_str(), "4");
        assert_eq!(response.respondent.as_deref(), Some("ada"));
        assert!(response.id.is_none());
    }
}
