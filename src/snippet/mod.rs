//! Named content fragments applied by element `id`.
//!
//! A [`SnippetCollection`] maps target ids to an ordered list of
//! [`Snippet`]s; [`SnippetRenderer`] walks a tree and applies them. Snippets
//! are independent of view-model binding and are usually loaded from files
//! with [`AssetLoader`].

mod loader;
mod renderer;
mod simple;

pub use loader::{ASSET_NAMESPACE, AssetLoader};
pub use renderer::SnippetRenderer;
pub use simple::{SimpleSnippet, TextSnippet};

use std::collections::HashMap;

use crate::dom::{ArenaDom, NodeId};
use crate::error::Result;

/// Content bound to a target element id.
pub trait Snippet {
    fn target_id(&self) -> &str;

    /// Apply to `element` and return the node now occupying its position.
    ///
    /// Returning a node other than an element stops further snippets for
    /// this position.
    fn apply_to(&self, dom: &mut ArenaDom, element: NodeId) -> Result<NodeId>;
}

/// Snippets grouped by target id, in insertion order.
#[derive(Default)]
pub struct SnippetCollection {
    entries: HashMap<String, Vec<Box<dyn Snippet>>>,
}

impl SnippetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, snippet: impl Snippet + 'static) {
        self.entries
            .entry(snippet.target_id().to_string())
            .or_default()
            .push(Box::new(snippet));
    }

    pub fn has_snippets_for(&self, id: &str) -> bool {
        self.entries.get(id).is_some_and(|list| !list.is_empty())
    }

    /// Snippets for `id`; empty when none are registered.
    pub fn snippets_for(&self, id: &str) -> &[Box<dyn Snippet>] {
        self.entries.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of snippets.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
