//! Glue between the `selectors` crate and [`ArenaDom`].
//!
//! Templates are queried with type, id, class and attribute selectors plus
//! the usual combinators. No pseudo-classes or pseudo-elements are parsed
//! beyond the structural ones the `selectors` crate handles itself
//! (`:root`, `:empty`, `:first-child`, ...).

use std::fmt;

use html5ever::{LocalName, Namespace, QualName};
use precomputed_hash::PrecomputedHash;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::MatchingContext;
use selectors::matching::ElementSelectorFlags;
use selectors::parser::SelectorParseErrorKind;
use selectors::{OpaqueElement, SelectorImpl};

use crate::dom::{ArenaDom, Attribute, NodeId};

/// Selector implementation over the arena DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StencilSelectors;

/// Newtype around an html5ever atom so it satisfies the selector bounds.
macro_rules! css_atom {
    ($(#[$meta:meta])* $name:ident($atom:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub $atom);

        impl PrecomputedHash for $name {
            fn precomputed_hash(&self) -> u32 {
                self.0.precomputed_hash()
            }
        }

        impl cssparser::ToCss for $name {
            fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
                dest.write_str(&self.0)
            }
        }

        impl<'a> From<&'a str> for $name {
            fn from(s: &'a str) -> Self {
                Self(<$atom>::from(s))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

css_atom! {
    /// Tag names, attribute names and values, ids and classes.
    CssAtom(LocalName)
}

css_atom! {
    /// Namespace URLs; the empty atom means "no namespace".
    CssNamespace(Namespace)
}

/// Uninhabited: no pseudo-class is accepted by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoPseudoClass {}

/// Uninhabited: no pseudo-element is accepted by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoPseudoElement {}

impl cssparser::ToCss for NoPseudoClass {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl cssparser::ToCss for NoPseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::NonTSPseudoClass for NoPseudoClass {
    type Impl = StencilSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for NoPseudoElement {
    type Impl = StencilSelectors;
}

impl<'i> selectors::parser::Parser<'i> for StencilSelectors {
    type Impl = StencilSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

impl SelectorImpl for StencilSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssAtom;
    type Identifier = CssAtom;
    type LocalName = CssAtom;
    type NamespaceUrl = CssNamespace;
    type NamespacePrefix = CssAtom;
    type BorrowedLocalName = CssAtom;
    type BorrowedNamespaceUrl = CssNamespace;
    type NonTSPseudoClass = NoPseudoClass;
    type PseudoElement = NoPseudoElement;
}

/// An element of an [`ArenaDom`] as seen by the selector matcher.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    pub dom: &'a ArenaDom,
    pub id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn new(dom: &'a ArenaDom, id: NodeId) -> Self {
        Self { dom, id }
    }

    fn name(&self) -> Option<&'a QualName> {
        self.dom.element_qual_name(self.id)
    }

    fn attrs(&self) -> &'a [Attribute] {
        self.dom.attrs(self.id)
    }

    fn element(&self, id: NodeId) -> Option<Self> {
        self.dom.is_element(id).then(|| Self::new(self.dom, id))
    }

    /// First element at or after `start`, following `step`.
    fn scan(
        &self,
        start: Option<NodeId>,
        step: fn(&ArenaDom, NodeId) -> Option<NodeId>,
    ) -> Option<Self> {
        std::iter::successors(start, |&id| step(self.dom, id)).find_map(|id| self.element(id))
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementRef({:?} <", self.id)?;
        match self.name() {
            Some(name) => write!(f, "{}", name.local)?,
            None => f.write_str("?")?,
        }
        f.write_str(">)")
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = StencilSelectors;

    fn opaque(&self) -> OpaqueElement {
        // Identity of the arena slot, not of this short-lived handle
        match self.dom.get(self.id) {
            Some(node) => OpaqueElement::new(node),
            None => OpaqueElement::new(self),
        }
    }

    fn parent_element(&self) -> Option<Self> {
        self.dom.parent(self.id).and_then(|parent| self.element(parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.scan(self.dom.prev_sibling(self.id), ArenaDom::prev_sibling)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.scan(self.dom.next_sibling(self.id), ArenaDom::next_sibling)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.scan(self.dom.first_child(self.id), ArenaDom::next_sibling)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        // Case-insensitive attribute matching only applies to HTML elements
        self.name().is_some_and(|name| name.ns == html5ever::ns!(html))
    }

    fn has_local_name(&self, local_name: &CssAtom) -> bool {
        self.name().is_some_and(|name| name.local == local_name.0)
    }

    fn has_namespace(&self, ns: &CssNamespace) -> bool {
        self.name().is_some_and(|name| name.ns == ns.0)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        match (self.name(), other.name()) {
            (Some(a), Some(b)) => a.local == b.local && a.ns == b.ns,
            _ => false,
        }
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssNamespace>,
        local_name: &CssAtom,
        operation: &AttrSelectorOperation<&CssAtom>,
    ) -> bool {
        self.attrs().iter().any(|attr| {
            let in_namespace = match ns {
                NamespaceConstraint::Any => true,
                NamespaceConstraint::Specific(ns) => attr.name.ns == ns.0,
            };
            in_namespace && attr.name.local == local_name.0 && operation.eval_str(&attr.value)
        })
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NoPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &NoPseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        false
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssAtom, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_id(self.id)
            .is_some_and(|own| case_sensitivity.eq(own.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &CssAtom, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_classes(self.id)
            .iter()
            .any(|class| case_sensitivity.eq(class.as_bytes(), name.0.as_bytes()))
    }

    fn has_custom_state(&self, _name: &CssAtom) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssAtom) -> Option<CssAtom> {
        None
    }

    fn is_part(&self, _name: &CssAtom) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        // Comments do not count; any character of text does
        self.dom.children(self.id).all(|child| {
            !self.dom.is_element(child) && self.dom.text(child).is_none_or(str::is_empty)
        })
    }

    fn is_root(&self) -> bool {
        self.dom.parent(self.id) == Some(self.dom.document())
    }

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }
}
