//! # formwright
//!
//! Build multi-question forms, reorder their questions, persist them and
//! render them for response collection. Storage-agnostic.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formwright::{
//!     ClockIds, FormDocument, FormGateway, LocalGateway, MemoryStore, MoveEvent,
//!     QuestionType, RenderMode, Session, render_form,
//! };
//! use std::sync::Arc;
//!
//! let ids = Arc::new(ClockIds::new());
//! let mut form = FormDocument::new("Team lunch");
//! form.add_question(ids.as_ref(), QuestionType::TextInput);
//! form.add_question(ids.as_ref(), QuestionType::MultipleChoice);
//! form.reorder(MoveEvent::new(1, 0))?;
//!
//! let gateway = LocalGateway::new(MemoryStore::new(), ids);
//! let id = gateway.save(&Session::anonymous(), &form).await?;
//!
//! let loaded = gateway.load(&Session::anonymous(), &id).await?;
//! let view = render_form(&loaded, RenderMode::Entry);
//! ```
//!
//! ## Pieces
//!
//! - `FormDocument` and friends live in `formwright-types` and are re-exported here.
//! - `render_question` / `render_form` map each question to the widget it must expose.
//! - `FormGateway` and `RecordGateway` are the persistence contract, realized by
//!   `LocalGateway` (any `KeyValueStore`) and `RemoteGateway` (HTTP + bearer token).
//! - `RecordStore` keeps the newest-first feedback history.
//! - `EditorSession` guards against overlapping saves and stale load results.

// Re-export all types from formwright-types
pub use formwright_types::*;

mod config;
pub use config::{ClientConfig, ConfigError, DEFAULT_API_URL, DEFAULT_TIMEOUT};

mod error;
pub use error::GatewayError;

mod kv;
pub use kv::{FileStore, KeyValueStore, MemoryStore, StoreError};

mod gateway;
pub use gateway::{FormGateway, RecordGateway, Session};

mod local;
pub use local::LocalGateway;

mod remote;
pub use remote::{Credentials, RemoteGateway};

mod record_store;
pub use record_store::{FEEDBACK_KEY, RecordStore, seed_records};

mod render;
pub use render::{Control, FormView, RenderMode, ValueShape, Widget, render_form, render_question};

mod editor;
pub use editor::{EditorError, EditorSession, LoadTicket, SaveTicket, SubmitTicket};
