use crate::QuestionId;

/// A correctable problem with user input or document structure.
///
/// Validation errors are reported back to the user and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field is empty or whitespace-only.
    #[error("Required field '{0}' is empty")]
    EmptyField(&'static str),

    /// A choice question has no `options` sequence at all.
    #[error("Question '{question}' of type {type_name} is missing its options")]
    MissingOptions {
        question: QuestionId,
        type_name: String,
    },

    /// A reorder index falls outside the question list.
    #[error("Index {index} is out of range for a list of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No question with id '{0}'")]
    UnknownQuestion(QuestionId),

    /// Options were supplied for a question that does not take them.
    #[error("Question '{0}' does not take options")]
    OptionsNotApplicable(QuestionId),

    #[error("Duplicate question id '{0}'")]
    DuplicateQuestion(QuestionId),

    #[error("Unknown question type '{0}'")]
    UnknownQuestionType(String),

    /// An answer does not match the value shape its question expects.
    #[error("Answer to '{question}' has the wrong shape: expected {expected}, got {actual}")]
    AnswerShape {
        question: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("'{option}' is not an option of question '{question}'")]
    UnknownOption { question: QuestionId, option: String },

    #[error("Question '{0}' requires an answer")]
    MissingAnswer(QuestionId),

    /// An answer was given for a question rendered read-only or unsupported.
    #[error("Question '{0}' does not accept answers")]
    NotAnswerable(QuestionId),
}
