use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    FormId, IdGenerator, MoveEvent, Moved, Question, QuestionId, QuestionPatch, QuestionType,
    ValidationError, move_item,
};

/// An editable form: ordered questions plus title and description.
///
/// The order of `questions` is the display and fill-in order. A document
/// without an `id` has never been saved; it acquires one on first persist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<FormId>,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    questions: Vec<Question>,
}

impl FormDocument {
    /// Create a new, unsaved form with no questions.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            questions: Vec::new(),
        }
    }

    /// Create an untitled, unsaved form.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append an already-built question.
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn id(&self) -> Option<&FormId> {
        self.id.as_ref()
    }

    /// Whether this document has been persisted at least once.
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Record the id handed out by the store on first save.
    pub fn assign_id(&mut self, id: FormId) {
        self.id = Some(id);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Set or clear the description. Blank descriptions are stored as `None`.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.filter(|d| !d.trim().is_empty());
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Position of a question in display order.
    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Append a new question of the given type with a fresh id and default label.
    pub fn add_question(&mut self, ids: &dyn IdGenerator, ty: QuestionType) -> &Question {
        let question = Question::new(ids.next_id(), ty.default_label(), ty.kind());
        self.questions.push(question);
        &self.questions[self.questions.len() - 1]
    }

    /// Remove a question. Unknown ids are ignored.
    pub fn remove_question(&mut self, id: &QuestionId) -> Option<Question> {
        let index = self.position(id)?;
        Some(self.questions.remove(index))
    }

    /// Move one question to a new position.
    pub fn reorder(&mut self, event: MoveEvent) -> Result<Moved, ValidationError> {
        move_item(&mut self.questions, event)
    }

    /// Apply a partial update to one question's label, text, options or required flag.
    pub fn edit_field(&mut self, id: &QuestionId, patch: QuestionPatch) -> Result<(), ValidationError> {
        self.questions
            .iter_mut()
            .find(|q| q.id() == id)
            .ok_or_else(|| ValidationError::UnknownQuestion(id.clone()))?
            .apply(patch)
    }

    /// Check the document is fit to be saved.
    ///
    /// The title must be non-blank, question ids unique, and every choice
    /// question must carry an options list.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(question.id()) {
                return Err(ValidationError::DuplicateQuestion(question.id().clone()));
            }
            question.validate()?;
        }
        Ok(())
    }

    /// The list projection of this document.
    ///
    /// Returns `None` for a document that has never been saved.
    pub fn summary(&self) -> Option<FormSummary> {
        Some(FormSummary {
            id: self.id.clone()?,
            title: self.title.clone(),
            description: self.description.clone(),
            question_count: self.questions.len(),
        })
    }
}

/// One entry in a list of saved forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: FormId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub question_count: usize,
}
