//! HTML form generator implementation.

use formwright::{Control, FormDocument, RenderMode, ValidationError, Widget, render_form};

/// Options for HTML generation.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Overrides the form's own title in the page head and heading.
    pub title: Option<String>,
    /// Whether to include default CSS styling.
    pub include_styles: bool,
    /// Whether to generate a complete HTML document (with html/head/body tags).
    pub full_document: bool,
    /// Custom CSS class prefix for all generated elements.
    pub class_prefix: String,
    /// Fillable form (`Entry`) or disabled preview (`ReadOnly`).
    pub mode: RenderMode,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self {
            title: None,
            include_styles: true,
            full_document: true,
            class_prefix: "form".to_string(),
            mode: RenderMode::Entry,
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable default CSS styling.
    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    /// Generate a complete HTML document or just the form fragment.
    pub fn full_document(mut self, full: bool) -> Self {
        self.full_document = full;
        self
    }

    /// Set a custom CSS class prefix.
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Render a disabled preview instead of a fillable form.
    pub fn preview(mut self) -> Self {
        self.mode = RenderMode::ReadOnly;
        self
    }
}

/// Generate a fillable HTML page for a form with default options.
pub fn to_html(form: &FormDocument) -> String {
    to_html_with_options(form, &HtmlOptions::new())
}

/// Generate HTML for a form with custom options.
pub fn to_html_with_options(form: &FormDocument, options: &HtmlOptions) -> String {
    let view = render_form(form, options.mode);
    let prefix = &options.class_prefix;
    let title = options.title.as_deref().unwrap_or(&view.title);
    let mut html = String::new();

    if options.full_document {
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"UTF-8\">\n");
        html.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));

        if options.include_styles {
            html.push_str(&generate_styles(prefix));
        }

        html.push_str("</head>\n<body>\n");
    }

    let form_attrs = match form.id() {
        Some(id) => format!(" data-form-id=\"{}\"", escape_html(id.as_str())),
        None => String::new(),
    };
    html.push_str(&format!("<form class=\"{prefix}-form\"{form_attrs}>\n"));
    html.push_str(&format!(
        "  <h1 class=\"{prefix}-title\">{}</h1>\n",
        escape_html(title)
    ));
    if let Some(description) = &view.description {
        html.push_str(&format!(
            "  <p class=\"{prefix}-description\">{}</p>\n",
            escape_html(description)
        ));
    }

    html.push_str(&format!("  <div class=\"{prefix}-questions\">\n"));
    for field in &view.fields {
        match field {
            Ok(widget) => html.push_str(&generate_widget(widget, prefix)),
            Err(err) => html.push_str(&generate_invalid(err, prefix)),
        }
    }
    html.push_str("  </div>\n");

    if view.mode == RenderMode::Entry {
        html.push_str(&format!(
            "  <button type=\"submit\" class=\"{prefix}-submit\">Submit</button>\n"
        ));
    }

    html.push_str("</form>\n");

    if options.full_document {
        html.push_str("</body>\n</html>\n");
    }

    html
}

/// Generate HTML for a single question.
fn generate_widget(widget: &Widget, prefix: &str) -> String {
    let ind = "    ";
    let name = escape_html(widget.question_id.as_str());
    let field_id = format!("{prefix}-{name}");
    let label = escape_html(&widget.label);
    let marker = if widget.required {
        format!(" <span class=\"{prefix}-required\">*</span>")
    } else {
        String::new()
    };

    let mut attrs = String::new();
    if widget.mode == RenderMode::ReadOnly {
        attrs.push_str(" disabled");
    }
    if widget.required && widget.is_editable() {
        attrs.push_str(" required");
    }

    let mut html = String::new();
    match &widget.control {
        Control::TextField { multiline } => {
            html.push_str(&format!("{ind}<div class=\"{prefix}-field\">\n"));
            html.push_str(&format!(
                "{ind}  <label for=\"{field_id}\">{label}{marker}</label>\n"
            ));
            html.push_str(&generate_help(widget, prefix, ind));
            if *multiline {
                html.push_str(&format!(
                    "{ind}  <textarea id=\"{field_id}\" name=\"{name}\" rows=\"4\" class=\"{prefix}-textarea\"{attrs}></textarea>\n"
                ));
            } else {
                html.push_str(&format!(
                    "{ind}  <input type=\"text\" id=\"{field_id}\" name=\"{name}\" class=\"{prefix}-input\"{attrs}>\n"
                ));
            }
            html.push_str(&format!("{ind}</div>\n"));
        }

        Control::RadioGroup { options } | Control::CheckboxGroup { options } => {
            let (kind, input_name) = match widget.control {
                Control::RadioGroup { .. } => ("radio", name.clone()),
                _ => ("checkbox", format!("{name}[]")),
            };

            html.push_str(&format!(
                "{ind}<fieldset class=\"{prefix}-fieldset {prefix}-{kind}-group\">\n"
            ));
            html.push_str(&format!("{ind}  <legend>{label}{marker}</legend>\n"));
            html.push_str(&generate_help(widget, prefix, ind));

            // `required` on a checkbox would demand that particular box.
            let option_attrs = if kind == "radio" {
                attrs.as_str()
            } else {
                attrs.trim_end_matches(" required")
            };
            for (idx, option) in options.iter().enumerate() {
                let option_id = format!("{field_id}-{idx}");
                let value = escape_html(option);
                html.push_str(&format!("{ind}  <div class=\"{prefix}-{kind}-option\">\n"));
                html.push_str(&format!(
                    "{ind}    <input type=\"{kind}\" id=\"{option_id}\" name=\"{input_name}\" value=\"{value}\"{option_attrs}>\n"
                ));
                html.push_str(&format!(
                    "{ind}    <label for=\"{option_id}\">{value}</label>\n"
                ));
                html.push_str(&format!("{ind}  </div>\n"));
            }

            html.push_str(&format!("{ind}</fieldset>\n"));
        }

        Control::Unsupported { type_name } => {
            html.push_str(&format!(
                "{ind}<div class=\"{prefix}-field {prefix}-unsupported\" data-type=\"{}\">\n",
                escape_html(type_name)
            ));
            html.push_str(&format!("{ind}  <p>{label}</p>\n"));
            html.push_str(&format!("{ind}  <p>Unknown Question Type</p>\n"));
            html.push_str(&format!("{ind}</div>\n"));
        }
    }

    html
}

fn generate_help(widget: &Widget, prefix: &str, ind: &str) -> String {
    match &widget.text {
        Some(text) => format!(
            "{ind}  <p class=\"{prefix}-help\">{}</p>\n",
            escape_html(text)
        ),
        None => String::new(),
    }
}

/// A notice standing in for a question that could not be rendered.
fn generate_invalid(err: &ValidationError, prefix: &str) -> String {
    format!(
        "    <div class=\"{prefix}-field {prefix}-invalid\">{}</div>\n",
        escape_html(&err.to_string())
    )
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Generate default CSS styles.
fn generate_styles(prefix: &str) -> String {
    format!(
        r#"  <style>
    .{prefix}-form {{
      max-width: 600px;
      margin: 2rem auto;
      padding: 1rem;
      font-family: sans-serif;
    }}
    .{prefix}-description, .{prefix}-help {{
      color: #555;
      white-space: pre-wrap;
    }}
    .{prefix}-field {{
      margin: 0.5rem 0;
    }}
    .{prefix}-field label {{
      display: block;
      margin-bottom: 0.25rem;
    }}
    .{prefix}-input, .{prefix}-textarea {{
      width: 100%;
      padding: 0.5rem;
      box-sizing: border-box;
    }}
    .{prefix}-required {{
      color: #b00020;
    }}
    .{prefix}-fieldset {{
      margin: 1rem 0;
      padding: 1rem;
    }}
    .{prefix}-radio-option, .{prefix}-checkbox-option {{
      margin: 0.25rem 0;
    }}
    .{prefix}-radio-option label, .{prefix}-checkbox-option label {{
      display: inline;
    }}
    .{prefix}-unsupported, .{prefix}-invalid {{
      padding: 0.5rem;
      background: #fff4e5;
      border-left: 3px solid #e69500;
    }}
    .{prefix}-submit {{
      margin-top: 1rem;
      padding: 0.5rem 1rem;
    }}
  </style>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright::{ChoiceQuestion, Question, QuestionKind};

    fn sample() -> FormDocument {
        FormDocument::new("Team <lunch>")
            .with_description("Pick & choose")
            .with_question(
                Question::new("name", "Your name", QuestionKind::TextInput).with_required(true),
            )
            .with_question(
                Question::new("notes", "Notes", QuestionKind::Paragraph).with_text("Optional"),
            )
            .with_question(Question::new(
                "dish",
                "Dish",
                QuestionKind::MultipleChoice(ChoiceQuestion::new(vec![
                    "Pizza".into(),
                    "Salad".into(),
                ])),
            ))
            .with_question(Question::new(
                "extras",
                "Extras",
                QuestionKind::Checkbox(ChoiceQuestion::new(vec!["Soda".into()])),
            ))
    }

    #[test]
    fn html_options_chaining() {
        let options = HtmlOptions::new()
            .with_title("Test Form")
            .with_styles(false)
            .full_document(false)
            .with_class_prefix("my-form")
            .preview();

        assert_eq!(options.title, Some("Test Form".to_string()));
        assert!(!options.include_styles);
        assert!(!options.full_document);
        assert_eq!(options.class_prefix, "my-form");
        assert_eq!(options.mode, RenderMode::ReadOnly);
    }

    #[test]
    fn entry_page_has_every_control() {
        let html = to_html(&sample());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Team &lt;lunch&gt;</title>"));
        assert!(html.contains("Pick &amp; choose"));
        assert!(html.contains("name=\"name\" class=\"form-input\" required>"));
        assert!(html.contains("<textarea id=\"form-notes\""));
        assert!(html.contains("<p class=\"form-help\">Optional</p>"));
        assert!(html.contains("type=\"radio\" id=\"form-dish-1\" name=\"dish\" value=\"Salad\""));
        assert!(html.contains("type=\"checkbox\" id=\"form-extras-0\" name=\"extras[]\""));
        assert!(html.contains("class=\"form-submit\""));
    }

    #[test]
    fn preview_disables_inputs_and_drops_submit() {
        let options = HtmlOptions::new().full_document(false).preview();
        let html = to_html_with_options(&sample(), &options);

        assert!(!html.contains("<!DOCTYPE html>"));
        assert!(html.contains("class=\"form-input\" disabled>"));
        assert!(!html.contains(" required"));
        assert!(!html.contains("form-submit"));
    }

    #[test]
    fn unknown_type_shows_placeholder() {
        let form = FormDocument::new("F").with_question(Question::new(
            "r",
            "Stars",
            QuestionKind::Unsupported {
                type_name: "rating".into(),
                options: Some(vec!["1".into(), "5".into()]),
            },
        ));

        let html = to_html_with_options(&form, &HtmlOptions::new().full_document(false));

        assert!(html.contains("data-type=\"rating\""));
        assert!(html.contains("Unknown Question Type"));
    }

    #[test]
    fn broken_question_does_not_hide_the_rest() {
        let form = FormDocument::new("F")
            .with_question(Question::new(
                "bad",
                "Pick",
                QuestionKind::Checkbox(ChoiceQuestion { options: None }),
            ))
            .with_question(Question::new("ok", "Name", QuestionKind::TextInput));

        let html = to_html(&form);

        assert!(html.contains("form-invalid"));
        assert!(html.contains("id=\"form-ok\""));
    }

    #[test]
    fn escape_html_covers_quotes() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
