//! Node selection with CSS selectors.
//!
//! The renderers and the form/CSRF helpers locate elements through this
//! module: "given a context and a query, return the matching elements in
//! document order". An empty result is never an error here; callers decide
//! whether absence is fatal.
//!
//! # Example
//!
//! ```
//! use stencil::dom::parse_xml;
//! use stencil::select::Selector;
//!
//! let dom = parse_xml(r#"<form><input name="a"/><input name="b"/></form>"#).unwrap();
//! let form = dom.document_element().unwrap();
//!
//! let inputs = Selector::parse("input").unwrap().select(&dom, form);
//! assert_eq!(inputs.len(), 2);
//!
//! let b = Selector::attribute_equals("name", "b").unwrap();
//! assert_eq!(b.select(&dom, form), vec![inputs[1]]);
//! ```

mod element_ref;

pub use element_ref::{ElementRef, StencilSelectors};

use cssparser::{Parser, ParserInput};
use selectors::context::{MatchingContext, SelectorCaches};

use crate::dom::{ArenaDom, NodeId};
use crate::error::{Error, Result};

/// A parsed, reusable selector list.
#[derive(Debug, Clone)]
pub struct Selector {
    source: String,
    selectors: Vec<selectors::parser::Selector<StencilSelectors>>,
}

impl Selector {
    /// Parse a comma-separated selector list.
    pub fn parse(css: &str) -> Result<Self> {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let list = selectors::parser::SelectorList::parse(
            &StencilSelectors,
            &mut parser,
            selectors::parser::ParseRelative::No,
        )
        .map_err(|_| Error::InvalidSelector(css.to_string()))?;

        Ok(Self {
            source: css.to_string(),
            selectors: list.slice().to_vec(),
        })
    }

    /// `[name="value"]`, with both parts escaped.
    pub fn attribute_equals(name: &str, value: &str) -> Result<Self> {
        Self::parse(&attribute_equals_css(name, value))
    }

    /// The expression this selector was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether `node` is an element matching this selector.
    pub fn matches(&self, dom: &ArenaDom, node: NodeId) -> bool {
        if !dom.is_element(node) {
            return false;
        }
        let elem = ElementRef::new(dom, node);
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            selectors::matching::MatchingMode::Normal,
            None,
            &mut caches,
            selectors::context::QuirksMode::NoQuirks,
            selectors::matching::NeedsSelectorFlags::No,
            selectors::matching::MatchingForInvalidation::No,
        );

        self.selectors.iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, &elem, &mut context)
        })
    }

    /// Matching descendants of `context`, in document order.
    pub fn select(&self, dom: &ArenaDom, context: NodeId) -> Vec<NodeId> {
        dom.descendant_elements(context)
            .into_iter()
            .filter(|&id| self.matches(dom, id))
            .collect()
    }

    /// Matching direct children of `parent`.
    pub fn select_children(&self, dom: &ArenaDom, parent: NodeId) -> Vec<NodeId> {
        dom.children(parent)
            .filter(|&id| self.matches(dom, id))
            .collect()
    }

    /// Matching siblings after `node`.
    pub fn select_following_siblings(&self, dom: &ArenaDom, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = dom.next_sibling(node);
        while let Some(id) = cursor {
            if self.matches(dom, id) {
                out.push(id);
            }
            cursor = dom.next_sibling(id);
        }
        out
    }
}

/// Build `[name="value"]` CSS, quoting the value as a CSS string.
pub fn attribute_equals_css(name: &str, value: &str) -> String {
    let mut css = String::from("[");
    let _ = cssparser::serialize_identifier(name, &mut css);
    css.push('=');
    let _ = cssparser::serialize_string(value, &mut css);
    css.push(']');
    css
}
