//! Maps questions to the widget contracts a front end must expose.

use formwright_types::{
    AnswerValue, Answers, FormDocument, Question, QuestionId, QuestionKind, ValidationError,
};

/// Whether a form is shown for reading or for data entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    ReadOnly,
    Entry,
}

/// The shape of the value a widget produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// Free text.
    Text,
    /// Exactly one of the options.
    Choice,
    /// Any subset of the options.
    Choices,
    /// The widget produces no value.
    Nothing,
}

impl ValueShape {
    fn name(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Choice => "Choice",
            Self::Choices => "Choices",
            Self::Nothing => "nothing",
        }
    }
}

/// The input control a question renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    TextField { multiline: bool },
    RadioGroup { options: Vec<String> },
    CheckboxGroup { options: Vec<String> },
    /// Placeholder for a question type this version cannot render.
    Unsupported { type_name: String },
}

/// Everything a front end needs to draw one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub question_id: QuestionId,
    pub label: String,
    pub text: Option<String>,
    pub required: bool,
    pub mode: RenderMode,
    pub control: Control,
}

impl Widget {
    /// The value shape this widget produces.
    pub fn shape(&self) -> ValueShape {
        match self.control {
            Control::TextField { .. } => ValueShape::Text,
            Control::RadioGroup { .. } => ValueShape::Choice,
            Control::CheckboxGroup { .. } => ValueShape::Choices,
            Control::Unsupported { .. } => ValueShape::Nothing,
        }
    }

    /// Whether the user can type or pick a value.
    pub fn is_editable(&self) -> bool {
        self.mode == RenderMode::Entry && self.shape() != ValueShape::Nothing
    }

    /// The selectable options, for choice widgets.
    pub fn options(&self) -> &[String] {
        match &self.control {
            Control::RadioGroup { options } | Control::CheckboxGroup { options } => options,
            _ => &[],
        }
    }

    /// Check an answer (or its absence) against this widget.
    pub fn check(&self, answer: Option<&AnswerValue>) -> Result<(), ValidationError> {
        let Some(value) = answer else {
            return self.check_missing();
        };
        if !self.is_editable() {
            return Err(ValidationError::NotAnswerable(self.question_id.clone()));
        }

        let shape_matches = matches!(
            (self.shape(), value),
            (ValueShape::Text, AnswerValue::Text(_))
                | (ValueShape::Choice, AnswerValue::Choice(_))
                | (ValueShape::Choices, AnswerValue::Choices(_))
        );
        if !shape_matches {
            return Err(ValidationError::AnswerShape {
                question: self.question_id.clone(),
                expected: self.shape().name(),
                actual: value.type_name(),
            });
        }
        if value.is_blank() {
            return self.check_missing();
        }

        let picked: &[String] = match value {
            AnswerValue::Text(_) => &[],
            AnswerValue::Choice(option) => std::slice::from_ref(option),
            AnswerValue::Choices(options) => options,
        };
        match picked.iter().find(|option| !self.options().contains(*option)) {
            Some(unknown) => Err(ValidationError::UnknownOption {
                question: self.question_id.clone(),
                option: unknown.clone(),
            }),
            None => Ok(()),
        }
    }

    fn check_missing(&self) -> Result<(), ValidationError> {
        if self.required && self.is_editable() {
            Err(ValidationError::MissingAnswer(self.question_id.clone()))
        } else {
            Ok(())
        }
    }
}

/// Produce the widget contract for one question.
///
/// Choice questions without an options list are an integrity error. A
/// question of unknown type is not an error: it renders as
/// [`Control::Unsupported`].
pub fn render_question(question: &Question, mode: RenderMode) -> Result<Widget, ValidationError> {
    let control = match question.kind() {
        QuestionKind::TextInput => Control::TextField { multiline: false },
        QuestionKind::Paragraph => Control::TextField { multiline: true },
        QuestionKind::MultipleChoice(choice) | QuestionKind::Checkbox(choice) => {
            let options = choice
                .options
                .clone()
                .ok_or_else(|| ValidationError::MissingOptions {
                    question: question.id().clone(),
                    type_name: question.kind().type_name().to_string(),
                })?;
            if matches!(question.kind(), QuestionKind::Checkbox(_)) {
                Control::CheckboxGroup { options }
            } else {
                Control::RadioGroup { options }
            }
        }
        QuestionKind::Unsupported { type_name, .. } => {
            tracing::debug!(question = %question.id(), type_name, "rendering unsupported question");
            Control::Unsupported {
                type_name: type_name.clone(),
            }
        }
    };

    Ok(Widget {
        question_id: question.id().clone(),
        label: question.label().to_string(),
        text: question.text().map(str::to_string),
        required: question.is_required(),
        mode,
        control,
    })
}

/// A whole form projected into widgets, one entry per question in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: String,
    pub description: Option<String>,
    pub mode: RenderMode,
    /// A broken question yields an error in its slot; the others still render.
    pub fields: Vec<Result<Widget, ValidationError>>,
}

impl FormView {
    /// The widgets that rendered successfully.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.fields.iter().filter_map(|field| field.as_ref().ok())
    }

    /// The integrity errors found while rendering.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.fields.iter().filter_map(|field| field.as_ref().err())
    }

    /// Check a complete submission against every widget.
    ///
    /// Fails on the first problem, including answers to questions that are
    /// not part of the form and forms with broken questions.
    pub fn check_answers(&self, answers: &Answers) -> Result<(), ValidationError> {
        for field in &self.fields {
            let widget = field.as_ref().map_err(Clone::clone)?;
            widget.check(answers.get(&widget.question_id))?;
        }
        for (question, _) in answers.iter() {
            if !self.widgets().any(|w| &w.question_id == question) {
                return Err(ValidationError::UnknownQuestion(question.clone()));
            }
        }
        Ok(())
    }
}

/// Project a form into widgets.
pub fn render_form(form: &FormDocument, mode: RenderMode) -> FormView {
    FormView {
        title: form.title.clone(),
        description: form.description.clone(),
        mode,
        fields: form
            .questions()
            .iter()
            .map(|question| render_question(question, mode))
            .collect(),
    }
}
