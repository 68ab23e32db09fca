use async_trait::async_trait;

use formwright_types::{Answers, FeedbackRecord, FormDocument, FormId, FormSummary, ResponseRecord};

use crate::GatewayError;

/// The credential context threaded into every gateway call.
///
/// Obtained once at login and passed explicitly; nothing reads credentials
/// from global state. Local gateways ignore it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// A session without a credential.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session carrying a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Persistence contract for form documents and their responses.
///
/// Realizations must keep identical semantics so the editor does not care
/// where documents live:
/// - `save` creates when the document has no id and overwrites otherwise;
///   saving the same content twice leaves the same stored state. A failed
///   save leaves the previously stored version intact.
/// - `load` of an unknown id is [`GatewayError::NotFound`], never an I/O error.
/// - `remove` of an unknown id succeeds.
#[async_trait]
pub trait FormGateway: Send + Sync {
    /// Persist a document, returning its (possibly newly assigned) id.
    async fn save(&self, session: &Session, form: &FormDocument) -> Result<FormId, GatewayError>;

    /// Fetch the last saved state of a document.
    async fn load(&self, session: &Session, id: &FormId) -> Result<FormDocument, GatewayError>;

    /// Summaries of all stored documents, in store-defined order.
    async fn list(&self, session: &Session) -> Result<Vec<FormSummary>, GatewayError>;

    /// Delete a document.
    async fn remove(&self, session: &Session, id: &FormId) -> Result<(), GatewayError>;

    /// Store one filled-in response to a form.
    async fn submit_response(
        &self,
        session: &Session,
        form: &FormId,
        answers: &Answers,
    ) -> Result<ResponseRecord, GatewayError>;

    /// All responses to a form, in submission order.
    async fn list_responses(
        &self,
        session: &Session,
        form: &FormId,
    ) -> Result<Vec<ResponseRecord>, GatewayError>;
}

/// Persistence contract for the feedback history.
///
/// The whole newest-first sequence is read and written as one value.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Read the stored sequence. `None` means it has never been written,
    /// which is different from an empty sequence.
    async fn load_records(&self) -> Result<Option<Vec<FeedbackRecord>>, GatewayError>;

    /// Replace the stored sequence, all or nothing.
    async fn store_records(&self, records: &[FeedbackRecord]) -> Result<(), GatewayError>;
}
