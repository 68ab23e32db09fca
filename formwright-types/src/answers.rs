use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AnswerValue, QuestionId};

/// Error type for typed answer access.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("Missing answer for question: {0}")]
    Missing(QuestionId),

    #[error("Type mismatch for question '{question}': expected {expected}, got {actual}")]
    TypeMismatch {
        question: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Answers collected for one submission of a form, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    values: BTreeMap<QuestionId, AnswerValue>,
}

impl Answers {
    /// Create an empty answer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing any earlier one for the same question.
    pub fn insert(&mut self, question: impl Into<QuestionId>, value: impl Into<AnswerValue>) {
        self.values.insert(question.into(), value.into());
    }

    /// Builder-style variant of [`Answers::insert`].
    pub fn with(mut self, question: impl Into<QuestionId>, value: impl Into<AnswerValue>) -> Self {
        self.insert(question, value);
        self
    }

    pub fn get(&self, question: &QuestionId) -> Option<&AnswerValue> {
        self.values.get(question)
    }

    pub fn contains(&self, question: &QuestionId) -> bool {
        self.values.contains_key(question)
    }

    pub fn remove(&mut self, question: &QuestionId) -> Option<AnswerValue> {
        self.values.remove(question)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a text answer.
    pub fn get_text(&self, question: &QuestionId) -> Result<&str, AnswerError> {
        match self.get(question) {
            Some(AnswerValue::Text(s)) => Ok(s),
            Some(other) => Err(AnswerError::TypeMismatch {
                question: question.clone(),
                expected: "Text",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(question.clone())),
        }
    }

    /// Get a single-choice answer.
    pub fn get_choice(&self, question: &QuestionId) -> Result<&str, AnswerError> {
        match self.get(question) {
            Some(AnswerValue::Choice(s)) => Ok(s),
            Some(other) => Err(AnswerError::TypeMismatch {
                question: question.clone(),
                expected: "Choice",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(question.clone())),
        }
    }

    /// Get a multi-choice answer.
    pub fn get_choices(&self, question: &QuestionId) -> Result<&[String], AnswerError> {
        match self.get(question) {
            Some(AnswerValue::Choices(list)) => Ok(list),
            Some(other) => Err(AnswerError::TypeMismatch {
                question: question.clone(),
                expected: "Choices",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(question.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let answers = Answers::new()
            .with("name", "Ada")
            .with("color", AnswerValue::Choice("Blue".into()));

        assert_eq!(answers.get_text(&"name".into()).unwrap(), "Ada");
        assert_eq!(answers.get_choice(&"color".into()).unwrap(), "Blue");
        assert!(matches!(
            answers.get_choices(&"color".into()),
            Err(AnswerError::TypeMismatch { expected: "Choices", .. })
        ));
        assert!(matches!(
            answers.get_text(&"missing".into()),
            Err(AnswerError::Missing(_))
        ));
    }

    #[test]
    fn serializes_as_object() {
        let answers = Answers::new().with("q1", "hello");
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "q1": { "kind": "text", "value": "hello" } })
        );
    }
}
