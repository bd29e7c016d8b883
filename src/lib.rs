//! # stencil
//!
//! Document-tree templating: parse (X)HTML into a mutable tree, then bind data
//! to it with a sequence of renderers.
//!
//! ## Renderers
//!
//! - [`ViewModelRenderer`] binds [`Value`]s to elements carrying a
//!   `property` attribute: flags keep or remove, text replaces content,
//!   models rewrite attributes, sequences repeat elements
//! - [`SnippetRenderer`] applies [`Snippet`]s to elements by `id`
//! - [`FormDataRenderer`] and [`CsrfProtectionRenderer`] fill forms
//! - [`TransformationProcessor`] runs selector-driven [`Transformation`]s
//!
//! Each renderer mutates the tree in place and keeps no state between calls.
//! A failed render leaves the tree partially rewritten.
//!
//! ## Quick Start
//!
//! ```
//! use stencil::{Document, Record, Value};
//!
//! let mut doc = Document::parse_xml(
//!     r#"<ul><li property="items">placeholder</li></ul>"#,
//! )?;
//! let model = Record::new().field("items", Value::sequence(["one".into(), "two".into()]));
//! doc.apply_view_model(model.into())?;
//!
//! assert_eq!(
//!     doc.to_xml_string(),
//!     r#"<ul><li property="items">one</li><li property="items">two</li></ul>"#
//! );
//! # Ok::<(), stencil::Error>(())
//! ```

pub mod csrf;
pub mod document;
pub mod dom;
pub mod error;
pub mod formdata;
pub mod select;
pub mod snippet;
pub mod transformation;
pub(crate) mod util;
pub mod viewmodel;

pub use csrf::{CsrfProtection, CsrfProtectionRenderer};
pub use document::Document;
pub use error::{BindingError, Error, Result, SnapshotError};
pub use formdata::{FormData, FormDataRenderer};
pub use select::Selector;
pub use snippet::{
    AssetLoader, SimpleSnippet, Snippet, SnippetCollection, SnippetRenderer, TextSnippet,
};
pub use transformation::{Transformation, TransformationProcessor};
pub use viewmodel::{ModelSequence, Record, Value, ViewModel, ViewModelRenderer};
