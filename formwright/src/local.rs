//! Gateway realization over a local key-value store.
//!
//! Layout:
//! - `forms` holds the ids of all saved forms, in creation order.
//! - `form:{id}` holds one JSON form document.
//! - `responses:{id}` holds the responses to that form, in submission order.
//! - `feedbackItems` holds the newest-first feedback history.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use formwright_types::{
    Answers, FeedbackRecord, FormDocument, FormId, FormSummary, IdGenerator, ResponseRecord,
};

use crate::record_store::FEEDBACK_KEY;
use crate::{FormGateway, GatewayError, KeyValueStore, RecordGateway, RenderMode, Session};

const INDEX_KEY: &str = "forms";

fn form_key(id: &FormId) -> String {
    format!("form:{id}")
}

fn responses_key(id: &FormId) -> String {
    format!("responses:{id}")
}

/// Stores forms, responses and feedback in a [`KeyValueStore`].
pub struct LocalGateway<S> {
    store: S,
    ids: Arc<dyn IdGenerator>,
}

impl<S: KeyValueStore> LocalGateway<S> {
    /// Create a gateway over `store`, drawing new ids from `ids`.
    pub fn new(store: S, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        key: &str,
    ) -> Result<Option<T>, GatewayError> {
        let Some(bytes) = self
            .store
            .get(key)
            .map_err(|err| GatewayError::persistence(operation, err))?
        else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| GatewayError::persistence(operation, err))
    }

    fn write_json<T: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        key: &str,
        value: &T,
    ) -> Result<(), GatewayError> {
        let bytes =
            serde_json::to_vec(value).map_err(|err| GatewayError::persistence(operation, err))?;
        self.store.set(key, &bytes).map_err(|err| {
            tracing::warn!(key, error = %err, "store rejected write");
            GatewayError::persistence(operation, err)
        })?;
        tracing::debug!(key, bytes = bytes.len(), "stored value");
        Ok(())
    }

    fn index(&self, operation: &'static str) -> Result<Vec<FormId>, GatewayError> {
        Ok(self.read_json(operation, INDEX_KEY)?.unwrap_or_default())
    }

    fn add_to_index(&self, operation: &'static str, id: &FormId) -> Result<(), GatewayError> {
        let mut index = self.index(operation)?;
        if !index.contains(id) {
            index.push(id.clone());
            self.write_json(operation, INDEX_KEY, &index)?;
        }
        Ok(())
    }

    fn discard(&self, key: &str) {
        if let Err(err) = self.store.remove(key) {
            tracing::warn!(key, error = %err, "could not discard unlisted document");
        }
    }

    fn require_form(
        &self,
        operation: &'static str,
        id: &FormId,
    ) -> Result<FormDocument, GatewayError> {
        self.read_json(operation, &form_key(id))?
            .ok_or_else(|| GatewayError::not_found(operation, "form", id))
    }
}

#[async_trait]
impl<S: KeyValueStore> FormGateway for LocalGateway<S> {
    async fn save(&self, _session: &Session, form: &FormDocument) -> Result<FormId, GatewayError> {
        const OP: &str = "save form";
        form.validate()?;

        let (id, created) = match form.id() {
            Some(id) => (id.clone(), false),
            None => (FormId::new(self.ids.next_id()), true),
        };
        let mut stored = form.clone();
        stored.assign_id(id.clone());

        // Document first, then the index.
        self.write_json(OP, &form_key(&id), &stored)?;

        if let Err(err) = self.add_to_index(OP, &id) {
            // A fresh id never reaches the caller; drop its document.
            if created {
                self.discard(&form_key(&id));
            }
            return Err(err);
        }
        if created {
            tracing::info!(form = %id, title = %stored.title, "created form");
        }
        Ok(id)
    }

    async fn load(&self, _session: &Session, id: &FormId) -> Result<FormDocument, GatewayError> {
        self.require_form("load form", id)
    }

    async fn list(&self, _session: &Session) -> Result<Vec<FormSummary>, GatewayError> {
        const OP: &str = "list forms";
        let mut summaries = Vec::new();
        for id in self.index(OP)? {
            match self.read_json::<FormDocument>(OP, &form_key(&id))? {
                Some(form) => summaries.extend(form.summary()),
                None => tracing::warn!(form = %id, "index entry without document"),
            }
        }
        Ok(summaries)
    }

    async fn remove(&self, _session: &Session, id: &FormId) -> Result<(), GatewayError> {
        const OP: &str = "remove form";
        let mut index = self.index(OP)?;
        if let Some(position) = index.iter().position(|entry| entry == id) {
            index.remove(position);
            self.write_json(OP, INDEX_KEY, &index)?;
        }
        for key in [form_key(id), responses_key(id)] {
            self.store
                .remove(&key)
                .map_err(|err| GatewayError::persistence(OP, err))?;
        }
        tracing::debug!(form = %id, "removed form");
        Ok(())
    }

    async fn submit_response(
        &self,
        _session: &Session,
        form: &FormId,
        answers: &Answers,
    ) -> Result<ResponseRecord, GatewayError> {
        const OP: &str = "submit response";
        let document = self.require_form(OP, form)?;
        crate::render_form(&document, RenderMode::Entry).check_answers(answers)?;

        let key = responses_key(form);
        let mut responses: Vec<ResponseRecord> = self.read_json(OP, &key)?.unwrap_or_default();
        let record = ResponseRecord::new(
            self.ids.next_id(),
            form.clone(),
            answers.clone(),
            Utc::now(),
        );
        responses.push(record.clone());
        self.write_json(OP, &key, &responses)?;
        tracing::info!(form = %form, responses = responses.len(), "stored response");
        Ok(record)
    }

    async fn list_responses(
        &self,
        _session: &Session,
        form: &FormId,
    ) -> Result<Vec<ResponseRecord>, GatewayError> {
        const OP: &str = "list responses";
        self.require_form(OP, form)?;
        Ok(self.read_json(OP, &responses_key(form))?.unwrap_or_default())
    }
}

#[async_trait]
impl<S: KeyValueStore> RecordGateway for LocalGateway<S> {
    async fn load_records(&self) -> Result<Option<Vec<FeedbackRecord>>, GatewayError> {
        self.read_json("load feedback", FEEDBACK_KEY)
    }

    async fn store_records(&self, records: &[FeedbackRecord]) -> Result<(), GatewayError> {
        self.write_json("store feedback", FEEDBACK_KEY, records)
    }
}
