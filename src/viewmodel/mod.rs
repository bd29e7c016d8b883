//! View-model binding.
//!
//! Markup names the data it wants with `property` attributes; a [`Value`]
//! tree supplies it. [`ViewModelRenderer`] walks the markup and rewrites it
//! according to the shape of each bound value:
//!
//! - `Flag(true)` keeps the element, `Flag(false)` removes it
//! - `Text` replaces the element's content
//! - `Model` binds attributes and nested properties, choosing between
//!   alternatives by their `typeof` attribute
//! - `Sequence` repeats the element once per entry (zero entries remove it)
//!
//! ```
//! use stencil::dom::{parse_xml, to_xml};
//! use stencil::viewmodel::{Record, Value, ViewModelRenderer};
//!
//! let mut dom = parse_xml(r#"<p><span property="name">?</span></p>"#).unwrap();
//! let root = dom.document_element().unwrap();
//! let model = Record::new().field("name", "Jane");
//!
//! ViewModelRenderer::new()
//!     .render(&mut dom, root, Value::from(model))
//!     .unwrap();
//! assert_eq!(
//!     to_xml(&dom, dom.document()),
//!     r#"<p><span property="name">Jane</span></p>"#
//! );
//! ```

#[cfg(feature = "json")]
mod json;
mod renderer;
mod value;

#[cfg(feature = "json")]
pub use json::{TYPE_KEY, from_json};
pub use renderer::ViewModelRenderer;
pub use value::{ModelSequence, Record, UncountedSequence, Value, ViewModel};
