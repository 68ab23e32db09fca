//! # formwright-doc-html
//!
//! Turn a `FormDocument` into a standalone HTML page, either as a fillable
//! form or as a disabled preview.
//!
//! ```rust,ignore
//! use formwright_doc_html::{HtmlOptions, to_html, to_html_with_options};
//!
//! let page = to_html(&form);
//! let preview = to_html_with_options(&form, &HtmlOptions::new().preview());
//! ```

mod generator;

pub use generator::{HtmlOptions, to_html, to_html_with_options};
