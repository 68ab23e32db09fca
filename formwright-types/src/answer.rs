use serde::{Deserialize, Serialize};

/// A single answer collected when a form is filled in.
///
/// The variant mirrors the widget the question renders to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    /// Free text (from text input and paragraph questions).
    Text(String),

    /// The one selected option of a multiple choice question.
    Choice(String),

    /// The selected options of a checkbox question, in option order.
    Choices(Vec<String>),
}

impl AnswerValue {
    /// Try to get this value as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a single selected option.
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a set of selected options.
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(list) => Some(list),
            _ => None,
        }
    }

    /// Whether the answer carries no content (blank text or nothing ticked).
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) | Self::Choice(s) => s.trim().is_empty(),
            Self::Choices(list) => list.is_empty(),
        }
    }

    /// Get the shape name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Choice(_) => "Choice",
            Self::Choices(_) => "Choices",
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(list: Vec<String>) -> Self {
        Self::Choices(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(AnswerValue::Text("   ".into()).is_blank());
        assert!(AnswerValue::Choices(vec![]).is_blank());
        assert!(!AnswerValue::Choice("Yes".into()).is_blank());
    }

    #[test]
    fn wire_format_is_tagged() {
        let json = serde_json::to_value(AnswerValue::Choice("Red".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "choice", "value": "Red" }));
    }
}
