use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{QuestionId, ValidationError};

/// A single question in a form.
///
/// The `id` and `kind` are fixed at creation. Changing a question's type
/// means replacing the question, not mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuestionWire", into = "QuestionWire")]
pub struct Question {
    /// Stable identity, unchanged by edits and reorders.
    id: QuestionId,

    /// The kind of question (determines the widget it renders to).
    kind: QuestionKind,

    /// The label shown to the user.
    label: String,

    /// Optional helper text shown under the label.
    text: Option<String>,

    /// Whether a response must answer this question.
    required: bool,
}

impl Question {
    /// Create a new question.
    pub fn new(id: impl Into<QuestionId>, label: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            text: None,
            required: false,
        }
    }

    /// Set the helper text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Mark the question as required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Apply a partial update to the mutable fields.
    ///
    /// Nothing is changed if the patch is rejected.
    pub fn apply(&mut self, patch: QuestionPatch) -> Result<(), ValidationError> {
        let QuestionPatch {
            label,
            text,
            options,
            required,
        } = patch;

        if let Some(options) = options {
            match self.kind.choice_mut() {
                Some(choice) => choice.options = Some(options),
                None => return Err(ValidationError::OptionsNotApplicable(self.id.clone())),
            }
        }
        if let Some(label) = label {
            self.label = label;
        }
        if let Some(text) = text {
            self.text = text;
        }
        if let Some(required) = required {
            self.required = required;
        }
        Ok(())
    }

    /// Check the structural integrity of this question.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.kind {
            QuestionKind::MultipleChoice(choice) | QuestionKind::Checkbox(choice)
                if choice.options.is_none() =>
            {
                Err(ValidationError::MissingOptions {
                    question: self.id.clone(),
                    type_name: self.kind.type_name().to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// The kind of question, determining the widget it renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    /// Single-line text input.
    TextInput,

    /// Multi-line text input.
    Paragraph,

    /// Pick exactly one option.
    MultipleChoice(ChoiceQuestion),

    /// Tick any number of options.
    Checkbox(ChoiceQuestion),

    /// A type this version does not know about, kept so the rest of the
    /// document still loads. Renders as a placeholder. Any stored options
    /// are carried along so re-saving loses nothing.
    Unsupported {
        type_name: String,
        options: Option<Vec<String>>,
    },
}

impl QuestionKind {
    /// The wire tag of this kind, e.g. `"multiple_choice"`.
    pub fn type_name(&self) -> &str {
        match self {
            Self::TextInput => QuestionType::TextInput.as_str(),
            Self::Paragraph => QuestionType::Paragraph.as_str(),
            Self::MultipleChoice(_) => QuestionType::MultipleChoice.as_str(),
            Self::Checkbox(_) => QuestionType::Checkbox.as_str(),
            Self::Unsupported { type_name, .. } => type_name,
        }
    }

    /// Check if this kind carries a list of options.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::MultipleChoice(_) | Self::Checkbox(_))
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported { .. })
    }

    /// The option configuration, for choice kinds.
    pub fn choice(&self) -> Option<&ChoiceQuestion> {
        match self {
            Self::MultipleChoice(choice) | Self::Checkbox(choice) => Some(choice),
            _ => None,
        }
    }

    fn choice_mut(&mut self) -> Option<&mut ChoiceQuestion> {
        match self {
            Self::MultipleChoice(choice) | Self::Checkbox(choice) => Some(choice),
            _ => None,
        }
    }

    fn from_wire(tag: String, options: Option<Vec<String>>) -> Self {
        match tag.parse::<QuestionType>() {
            Ok(QuestionType::TextInput) => Self::TextInput,
            Ok(QuestionType::Paragraph) => Self::Paragraph,
            Ok(QuestionType::MultipleChoice) => Self::MultipleChoice(ChoiceQuestion { options }),
            Ok(QuestionType::Checkbox) => Self::Checkbox(ChoiceQuestion { options }),
            Err(_) => Self::Unsupported {
                type_name: tag,
                options,
            },
        }
    }
}

/// Configuration for multiple choice and checkbox questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceQuestion {
    /// The selectable options, in display order.
    ///
    /// Always `Some` for questions built in memory. `None` only comes from a
    /// stored document that omitted the field, which is an integrity error.
    pub options: Option<Vec<String>>,
}

impl ChoiceQuestion {
    /// Create with the given options.
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options: Some(options),
        }
    }

    /// Create with no options yet.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The options, treating a missing list as empty.
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }
}

/// The question types a user can add to a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    TextInput,
    Paragraph,
    MultipleChoice,
    Checkbox,
}

impl QuestionType {
    /// Every constructible type, in palette order.
    pub const ALL: [QuestionType; 4] = [
        Self::TextInput,
        Self::Paragraph,
        Self::MultipleChoice,
        Self::Checkbox,
    ];

    /// The wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextInput => "text_input",
            Self::Paragraph => "paragraph",
            Self::MultipleChoice => "multiple_choice",
            Self::Checkbox => "checkbox",
        }
    }

    /// The label given to a freshly added question, e.g. "New multiple choice Question".
    pub fn default_label(self) -> String {
        format!("New {} Question", self.as_str().replace('_', " "))
    }

    /// A fresh kind of this type.
    pub fn kind(self) -> QuestionKind {
        match self {
            Self::TextInput => QuestionKind::TextInput,
            Self::Paragraph => QuestionKind::Paragraph,
            Self::MultipleChoice => QuestionKind::MultipleChoice(ChoiceQuestion::empty()),
            Self::Checkbox => QuestionKind::Checkbox(ChoiceQuestion::empty()),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // "text" is what older documents used for single-line input.
            "text_input" | "text" => Ok(Self::TextInput),
            "paragraph" => Ok(Self::Paragraph),
            "multiple_choice" => Ok(Self::MultipleChoice),
            "checkbox" => Ok(Self::Checkbox),
            other => Err(ValidationError::UnknownQuestionType(other.to_string())),
        }
    }
}

/// A partial update to a question's mutable fields.
///
/// There is deliberately no way to express a change of `id` or type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    pub label: Option<String>,
    /// `Some(None)` clears the helper text.
    pub text: Option<Option<String>>,
    pub options: Option<Vec<String>>,
    pub required: Option<bool>,
}

impl QuestionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(Some(text.into()));
        self
    }

    pub fn clear_text(mut self) -> Self {
        self.text = Some(None);
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }
}

/// On-disk and on-the-wire shape of a question.
#[derive(Serialize, Deserialize)]
struct QuestionWire {
    id: QuestionId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
}

impl From<QuestionWire> for Question {
    fn from(wire: QuestionWire) -> Self {
        Self {
            id: wire.id,
            kind: QuestionKind::from_wire(wire.kind, wire.options),
            label: wire.label,
            text: wire.text,
            required: wire.required,
        }
    }
}

impl From<Question> for QuestionWire {
    fn from(question: Question) -> Self {
        let kind = question.kind.type_name().to_string();
        let options = match question.kind {
            QuestionKind::MultipleChoice(choice) | QuestionKind::Checkbox(choice) => choice.options,
            QuestionKind::Unsupported { options, .. } => options,
            QuestionKind::TextInput | QuestionKind::Paragraph => None,
        };
        Self {
            id: question.id,
            kind,
            label: question.label,
            text: question.text,
            required: question.required,
            options,
        }
    }
}
