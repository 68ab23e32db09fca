//! Generate a fillable page and a preview for a small lunch order form.
//!
//! Run with: cargo run -p formwright-doc-html --example lunch_order

use formwright::{FormDocument, QuestionPatch, QuestionType, SequentialIds};
use formwright_doc_html::{HtmlOptions, to_html, to_html_with_options};

fn main() {
    let ids = SequentialIds::new("q");
    let mut form = FormDocument::new("Lunch order").with_description("Orders close at 11:00.");

    let name = form.add_question(&ids, QuestionType::TextInput).id().clone();
    let dish = form.add_question(&ids, QuestionType::MultipleChoice).id().clone();
    let extras = form.add_question(&ids, QuestionType::Checkbox).id().clone();

    form.edit_field(&name, QuestionPatch::new().label("Your name").required(true))
        .expect("text question accepts a label");
    form.edit_field(
        &dish,
        QuestionPatch::new()
            .label("Main dish")
            .options(["Pizza", "Salad", "Soup"]),
    )
    .expect("choice question accepts options");
    form.edit_field(
        &extras,
        QuestionPatch::new().label("Extras").options(["Soda", "Dessert"]),
    )
    .expect("choice question accepts options");

    std::fs::write("lunch_order.html", to_html(&form)).expect("Failed to write HTML file");
    std::fs::write(
        "lunch_order_preview.html",
        to_html_with_options(&form, &HtmlOptions::new().preview()),
    )
    .expect("Failed to write HTML file");

    println!("Generated lunch_order.html and lunch_order_preview.html");
}
