//! Invoice and purchase-order composer.
//!
//! A [`store::DocumentStore`] owns the document, applies typed edit commands,
//! keeps line amounts in step with quantity and rate, and persists after each
//! change. Totals and labels are pure lookups over the stored document.

pub mod commands;
pub mod config;
pub mod error;
pub mod labels;
pub mod logo;
pub mod model;
pub mod render;
pub mod storage;
pub mod store;
pub mod totals;

pub use commands::{DocumentField, LabelKey, LineItemField, TemplateField};
pub use error::{Error, Result};
pub use model::{DocumentData, DocumentType, LineItem, Locale, TemplateSettings};
pub use store::DocumentStore;
pub use totals::Totals;
