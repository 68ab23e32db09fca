//! Editing state for one form: overlapping saves and late results.
//!
//! Gateway calls are asynchronous, so the editor hands out tickets when a
//! call starts and checks them when the result arrives. A result that
//! belongs to an older state of the editor, or to an editor that has been
//! closed, is dropped instead of clobbering newer edits.

use std::sync::Arc;

use formwright_types::{
    Answers, FormDocument, FormId, IdGenerator, MoveEvent, Moved, Question, QuestionId,
    QuestionPatch, QuestionType, ResponseRecord, ValidationError,
};

use crate::{FormGateway, GatewayError, RenderMode, Session, render_form};

/// Error type for editor operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A save or submit is already running.
    #[error("Another save or submit is still in progress")]
    Busy,

    /// The editor was closed before the operation started.
    #[error("Editor is closed")]
    Closed,

    /// Responses can only be collected for a saved form.
    #[error("Form has not been saved yet")]
    Unsaved,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Marks a load started at a given editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "pass the ticket to apply_load"]
pub struct LoadTicket {
    generation: u64,
}

/// Marks a save started at a given editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "pass the ticket to finish_save"]
pub struct SaveTicket {
    generation: u64,
}

/// Marks a submission in flight for a saved form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "pass the ticket to finish_submit"]
pub struct SubmitTicket {
    form: FormId,
}

impl SubmitTicket {
    pub fn form(&self) -> &FormId {
        &self.form
    }
}

/// One form being edited.
pub struct EditorSession {
    form: FormDocument,
    ids: Arc<dyn IdGenerator>,
    generation: u64,
    saved_generation: Option<u64>,
    in_flight: bool,
    alive: bool,
}

impl EditorSession {
    /// Start editing `form`. Question ids are drawn from `ids`.
    pub fn new(form: FormDocument, ids: Arc<dyn IdGenerator>) -> Self {
        let saved_generation = form.is_saved().then_some(0);
        Self {
            form,
            ids,
            generation: 0,
            saved_generation,
            in_flight: false,
            alive: true,
        }
    }

    pub fn form(&self) -> &FormDocument {
        &self.form
    }

    /// Whether a save or submit is running.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether there are edits the store has not seen.
    pub fn is_dirty(&self) -> bool {
        self.saved_generation != Some(self.generation)
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.set_title(title);
        self.touch();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.form.set_description(description);
        self.touch();
    }

    /// Append a question with default content and return its id.
    pub fn add_question(&mut self, ty: QuestionType) -> QuestionId {
        let id = self.form.add_question(self.ids.as_ref(), ty).id().clone();
        self.touch();
        id
    }

    pub fn remove_question(&mut self, id: &QuestionId) -> Option<Question> {
        let removed = self.form.remove_question(id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn reorder(&mut self, event: MoveEvent) -> Result<Moved, ValidationError> {
        let moved = self.form.reorder(event)?;
        if matches!(moved, Moved::Moved { .. }) {
            self.touch();
        }
        Ok(moved)
    }

    pub fn edit_field(&mut self, id: &QuestionId, patch: QuestionPatch) -> Result<(), ValidationError> {
        self.form.edit_field(id, patch)?;
        self.touch();
        Ok(())
    }

    /// Close the editor. Results still in flight will be dropped.
    pub fn teardown(&mut self) {
        self.alive = false;
        self.touch();
        tracing::debug!(form = ?self.form.id(), "editor closed");
    }

    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Replace the document with a loaded one, unless the editor changed or
    /// closed since the load began. Returns whether the document was applied.
    pub fn apply_load(&mut self, ticket: LoadTicket, form: FormDocument) -> bool {
        if !self.alive || ticket.generation != self.generation {
            tracing::warn!(
                form = ?form.id(),
                started = ticket.generation,
                current = self.generation,
                "dropping stale load result"
            );
            return false;
        }
        self.form = form;
        self.touch();
        self.saved_generation = Some(self.generation);
        true
    }

    /// Claim the in-flight slot for a save of the current document.
    pub fn begin_save(&mut self) -> Result<SaveTicket, EditorError> {
        self.claim()?;
        if let Err(err) = self.form.validate() {
            self.in_flight = false;
            return Err(err.into());
        }
        Ok(SaveTicket {
            generation: self.generation,
        })
    }

    /// Record the outcome of a save and release the in-flight slot.
    ///
    /// A newly assigned id is kept unless the editor was closed meanwhile.
    /// On failure the document is left exactly as it is.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<FormId, GatewayError>,
    ) -> Result<FormId, EditorError> {
        self.in_flight = false;
        let id = result?;

        if !self.alive {
            tracing::warn!(form = %id, "editor closed during save, dropping id");
            return Ok(id);
        }
        if !self.form.is_saved() {
            self.form.assign_id(id.clone());
        }
        if ticket.generation == self.generation {
            self.saved_generation = Some(self.generation);
        }
        Ok(id)
    }

    /// Claim the in-flight slot for a response submission.
    ///
    /// The answers are checked against the form before anything is sent.
    pub fn begin_submit(&mut self, answers: &Answers) -> Result<SubmitTicket, EditorError> {
        let form = self.form.id().cloned().ok_or(EditorError::Unsaved)?;
        render_form(&self.form, RenderMode::Entry).check_answers(answers)?;
        self.claim()?;
        Ok(SubmitTicket { form })
    }

    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<ResponseRecord, GatewayError>,
    ) -> Result<ResponseRecord, EditorError> {
        self.in_flight = false;
        let record = result?;
        tracing::debug!(form = %ticket.form, "response accepted");
        Ok(record)
    }

    /// Save through `gateway`, start to finish.
    pub async fn save(
        &mut self,
        gateway: &dyn FormGateway,
        session: &Session,
    ) -> Result<FormId, EditorError> {
        let ticket = self.begin_save()?;
        let result = gateway.save(session, &self.form).await;
        self.finish_save(ticket, result)
    }

    /// Load `id` through `gateway` into this editor.
    pub async fn load(
        &mut self,
        gateway: &dyn FormGateway,
        session: &Session,
        id: &FormId,
    ) -> Result<bool, EditorError> {
        let ticket = self.begin_load();
        let form = gateway.load(session, id).await?;
        Ok(self.apply_load(ticket, form))
    }

    /// Submit one response to the saved form through `gateway`.
    pub async fn submit(
        &mut self,
        gateway: &dyn FormGateway,
        session: &Session,
        answers: &Answers,
    ) -> Result<ResponseRecord, EditorError> {
        let ticket = self.begin_submit(answers)?;
        let result = gateway.submit_response(session, ticket.form(), answers).await;
        self.finish_submit(ticket, result)
    }

    fn claim(&mut self) -> Result<(), EditorError> {
        if !self.alive {
            return Err(EditorError::Closed);
        }
        if self.in_flight {
            return Err(EditorError::Busy);
        }
        self.in_flight = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LocalGateway, MemoryStore};
    use formwright_types::SequentialIds;

    fn editor(title: &str) -> EditorSession {
        EditorSession::new(FormDocument::new(title), Arc::new(SequentialIds::new("q")))
    }

    #[test]
    fn second_save_while_busy_is_rejected() {
        let mut editor = editor("Survey");
        let ticket = editor.begin_save().unwrap();

        assert!(matches!(editor.begin_save(), Err(EditorError::Busy)));
        editor.finish_save(ticket, Ok("7".into())).unwrap();

        assert!(!editor.is_busy());
        assert!(editor.begin_save().is_ok());
    }

    #[test]
    fn invalid_document_does_not_claim_the_slot() {
        let mut editor = editor(" ");
        assert!(matches!(
            editor.begin_save(),
            Err(EditorError::Validation(ValidationError::EmptyField("title")))
        ));
        assert!(!editor.is_busy());
    }

    #[test]
    fn failed_save_leaves_document_untouched() {
        let mut editor = editor("Survey");
        editor.add_question(QuestionType::TextInput);
        let before = editor.form().clone();

        let ticket = editor.begin_save().unwrap();
        let err = editor
            .finish_save(ticket, Err(GatewayError::Auth { operation: "save form" }))
            .unwrap_err();

        assert!(matches!(err, EditorError::Gateway(ref e) if e.is_auth()));
        assert_eq!(editor.form(), &before);
        assert!(!editor.is_busy());
        assert!(editor.is_dirty());
    }

    #[test]
    fn edits_during_save_stay_dirty_but_keep_the_id() {
        let mut editor = editor("Survey");
        let ticket = editor.begin_save().unwrap();
        editor.set_title("Survey v2");

        let id = editor.finish_save(ticket, Ok("1".into())).unwrap();

        assert_eq!(editor.form().id(), Some(&id));
        assert!(editor.is_dirty());
    }

    #[test]
    fn closed_editor_drops_save_result() {
        let mut editor = editor("Survey");
        let ticket = editor.begin_save().unwrap();
        editor.teardown();

        editor.finish_save(ticket, Ok("1".into())).unwrap();

        assert!(editor.form().id().is_none());
        assert!(matches!(editor.begin_save(), Err(EditorError::Closed)));
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut editor = editor("Local edits");
        let ticket = editor.begin_load();
        editor.add_question(QuestionType::Checkbox);

        let applied = editor.apply_load(ticket, FormDocument::new("From server"));

        assert!(!applied);
        assert_eq!(editor.form().title, "Local edits");
    }

    #[test]
    fn load_after_teardown_is_discarded() {
        let mut editor = editor("Local");
        let ticket = editor.begin_load();
        editor.teardown();
        assert!(!editor.apply_load(ticket, FormDocument::new("Remote")));
    }

    #[test]
    fn noop_reorder_does_not_dirty() {
        let mut editor = editor("Survey");
        editor.add_question(QuestionType::TextInput);
        let ticket = editor.begin_save().unwrap();
        editor.finish_save(ticket, Ok("1".into())).unwrap();

        assert_eq!(editor.reorder(MoveEvent::new(0, 0)).unwrap(), Moved::Unchanged);
        assert_eq!(editor.reorder(MoveEvent::cancelled(0)).unwrap(), Moved::Cancelled);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn submit_requires_a_saved_form() {
        let mut editor = editor("Survey");
        assert!(matches!(
            editor.begin_submit(&Answers::new()),
            Err(EditorError::Unsaved)
        ));
    }

    #[tokio::test]
    async fn save_load_and_submit_through_local_gateway() {
        let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIds::new("f"));
        let gateway = LocalGateway::new(MemoryStore::new(), ids.clone());
        let session = Session::anonymous();

        let mut editor = EditorSession::new(FormDocument::new("Check-in"), ids.clone());
        let question = editor.add_question(QuestionType::TextInput);
        let id = editor.save(&gateway, &session).await.unwrap();
        assert!(!editor.is_dirty());

        let answers = Answers::new().with(question.clone(), "fine");
        let record = editor.submit(&gateway, &session, &answers).await.unwrap();
        assert_eq!(record.form_id, id);

        let mut other = EditorSession::new(FormDocument::empty(), ids);
        assert!(other.load(&gateway, &session, &id).await.unwrap());
        assert_eq!(other.form(), editor.form());
    }
}
