//! Core types for the formwright crate.
//!
//! This crate provides the foundational types for building forms:
//! - `FormDocument` - An ordered list of questions plus title/description
//! - `Question` and `QuestionKind` - Individual questions and their types
//! - `move_item` and `MoveEvent` - Drag-and-drop reordering with move semantics
//! - `FeedbackRecord` and `ResponseRecord` - Immutable submitted entries
//! - `Answers` and `AnswerValue` - Values collected when a form is filled in
//! - `IdGenerator` - Time-ordered identifiers for new questions and records

mod id;
pub use id::{ClockIds, FormId, IdGenerator, QuestionId, RecordId, SequentialIds};

mod answer;
pub use answer::AnswerValue;

mod answers;
pub use answers::{AnswerError, Answers};

mod question;
pub use question::{ChoiceQuestion, Question, QuestionKind, QuestionPatch, QuestionType};

mod reorder;
pub use reorder::{MoveEvent, Moved, move_item};

mod form;
pub use form::{FormDocument, FormSummary};

mod record;
pub use record::{Category, FeedbackDraft, FeedbackRecord, ResponseRecord};

mod error;
pub use error::ValidationError;
