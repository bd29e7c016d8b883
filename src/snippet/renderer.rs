use std::collections::HashSet;

use log::{debug, trace};

use super::SnippetCollection;
use crate::dom::{ArenaDom, NodeId, SnapshotList};
use crate::error::{Error, Result};

/// Applies a [`SnippetCollection`] to a tree, depth-first.
///
/// Every element `id` may be seen only once per render; a second occurrence
/// aborts the render. Content injected next to an element by a snippet is
/// visited exactly once, with the same id checks.
pub struct SnippetRenderer<'a> {
    snippets: &'a SnippetCollection,
    seen: HashSet<String>,
}

impl<'a> SnippetRenderer<'a> {
    pub fn new(snippets: &'a SnippetCollection) -> Self {
        Self {
            snippets,
            seen: HashSet::new(),
        }
    }

    /// Apply all registered snippets below `context`.
    pub fn render(&mut self, dom: &mut ArenaDom, context: NodeId) -> Result<()> {
        debug!("Applying {} snippet(s)", self.snippets.len());
        self.seen.clear();
        let result = self.process(dom, context);
        debug!("Snippet rendering done, {} id(s) seen", self.seen.len());
        result
    }

    fn process(&mut self, dom: &mut ArenaDom, context: NodeId) -> Result<()> {
        let mut children = SnapshotList::new(dom, context);
        while children.has_next() {
            let node = children.get_next()?;
            if dom.is_element(node) {
                self.process_current(dom, node)?;
            }
        }
        Ok(())
    }

    fn process_current(&mut self, dom: &mut ArenaDom, element: NodeId) -> Result<()> {
        let parent = dom.parent(element);
        let prev = dom.prev_sibling(element);
        let next = dom.next_sibling(element);

        let mut current = element;
        if let Some(id) = dom.element_id(element).map(str::to_string) {
            if !self.seen.insert(id.clone()) {
                return Err(Error::DuplicateId(id));
            }
            match self.apply_snippets(dom, element, &id)? {
                Some(result) => current = result,
                None => {
                    // Nothing to descend into; still visit what was injected.
                    let start = match prev {
                        Some(prev) => dom.next_sibling(prev),
                        None => parent.and_then(|p| dom.first_child(p)),
                    };
                    return self.process_between(dom, start, next);
                }
            }
        }

        if dom.has_children(current) {
            self.process(dom, current)?;
        }

        let start = dom.next_sibling(current);
        self.process_between(dom, start, next)
    }

    /// Visit siblings from `start` up to, not including, `stop`.
    fn process_between(
        &mut self,
        dom: &mut ArenaDom,
        start: Option<NodeId>,
        stop: Option<NodeId>,
    ) -> Result<()> {
        let mut cursor = start;
        while let Some(node) = cursor {
            if Some(node) == stop {
                break;
            }
            let following = dom.next_sibling(node);
            if dom.is_element(node) {
                trace!("Visiting injected <{}>", name_of(dom, node));
                self.process_current(dom, node)?;
            }
            cursor = following;
        }
        Ok(())
    }

    /// Apply the snippets for `id` in order. `None` when a snippet left a
    /// non-element in the element's place.
    fn apply_snippets(
        &self,
        dom: &mut ArenaDom,
        element: NodeId,
        id: &str,
    ) -> Result<Option<NodeId>> {
        let mut current = element;
        for snippet in self.snippets.snippets_for(id) {
            trace!("Applying snippet to #{id}");
            let result = snippet.apply_to(dom, current)?;
            if result != current {
                if !dom.is_element(result) {
                    return Ok(None);
                }
                current = result;
            }
        }
        Ok(Some(current))
    }
}

fn name_of(dom: &ArenaDom, node: NodeId) -> &str {
    dom.element_name(node).map_or("?", |n| &**n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_xml, to_xml};
    use crate::snippet::{SimpleSnippet, Snippet, TextSnippet};

    /// Replaces the target with a text node.
    struct ToText(&'static str, &'static str);

    impl Snippet for ToText {
        fn target_id(&self) -> &str {
            self.0
        }

        fn apply_to(&self, dom: &mut ArenaDom, element: NodeId) -> Result<NodeId> {
            let text = dom.create_text(self.1);
            dom.replace(element, text);
            Ok(text)
        }
    }

    /// Inserts copies of `markup` after the target.
    struct After(&'static str, &'static str);

    impl Snippet for After {
        fn target_id(&self) -> &str {
            self.0
        }

        fn apply_to(&self, dom: &mut ArenaDom, element: NodeId) -> Result<NodeId> {
            let source = parse_xml(self.1)?;
            let root = source.document_element().unwrap_or(source.document());
            let copy = dom.import(&source, root);
            match dom.next_sibling(element) {
                Some(next) => dom.insert_before(next, copy),
                None => {
                    if let Some(parent) = dom.parent(element) {
                        dom.append(parent, copy);
                    }
                }
            }
            Ok(element)
        }
    }

    fn render(xml: &str, snippets: &SnippetCollection) -> Result<String> {
        let mut dom = parse_xml(xml)?;
        let root = dom.document_element().unwrap();
        SnippetRenderer::new(snippets).render(&mut dom, root)?;
        Ok(to_xml(&dom, dom.document()))
    }

    #[test]
    fn test_applies_in_registration_order() {
        let mut snippets = SnippetCollection::new();
        snippets.add(TextSnippet::new("a", "first"));
        snippets.add(SimpleSnippet::from_xml("a", "<b>second</b>").unwrap());

        let out = render(r#"<r><p id="a">x</p></r>"#, &snippets).unwrap();
        assert_eq!(out, r#"<r><p id="a">first<b>second</b></p></r>"#);
    }

    #[test]
    fn test_missing_id_is_noop() {
        let snippets = SnippetCollection::new();
        let src = r#"<r><p id="a">x</p><p>y</p></r>"#;
        assert_eq!(render(src, &snippets).unwrap(), src);
    }

    #[test]
    fn test_duplicate_id_fails_before_second_apply() {
        let mut dom = parse_xml(r#"<r><p id="a"/><div><p id="a"/></div></r>"#).unwrap();
        let root = dom.document_element().unwrap();
        let mut snippets = SnippetCollection::new();
        snippets.add(TextSnippet::new("a", "hit"));

        let err = SnippetRenderer::new(&snippets)
            .render(&mut dom, root)
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateId(ref id) if id == "a"));
        assert_eq!(
            to_xml(&dom, dom.document()),
            r#"<r><p id="a">hit</p><div><p id="a"/></div></r>"#
        );
    }

    #[test]
    fn test_seen_ids_reset_between_renders() {
        let snippets = SnippetCollection::new();
        let mut renderer = SnippetRenderer::new(&snippets);
        let mut dom = parse_xml(r#"<r><p id="a"/></r>"#).unwrap();
        let root = dom.document_element().unwrap();

        renderer.render(&mut dom, root).unwrap();
        renderer.render(&mut dom, root).unwrap();
    }

    #[test]
    fn test_replaced_element_is_descended() {
        let mut snippets = SnippetCollection::new();
        snippets.add(SimpleSnippet::from_xml("a", r#"<div id="a"><span id="b"/></div>"#).unwrap());
        snippets.add(TextSnippet::new("b", "inner"));

        let out = render(r#"<r><p id="a">old</p></r>"#, &snippets).unwrap();
        assert_eq!(out, r#"<r><div id="a"><span id="b">inner</span></div></r>"#);
    }

    #[test]
    fn test_non_element_result_stops_snippets() {
        let mut snippets = SnippetCollection::new();
        snippets.add(ToText("a", "gone"));
        snippets.add(TextSnippet::new("a", "never"));

        let out = render(r#"<r><p id="a"><i id="x"/></p><p id="b"/></r>"#, &snippets).unwrap();
        assert_eq!(out, r#"<r>gone<p id="b"/></r>"#);
    }

    #[test]
    fn test_injected_siblings_are_processed() {
        let mut snippets = SnippetCollection::new();
        snippets.add(After("a", r#"<p id="b"/>"#));
        snippets.add(TextSnippet::new("b", "injected"));

        let out = render(r#"<r><p id="a"/><p id="c"/></r>"#, &snippets).unwrap();
        assert_eq!(
            out,
            r#"<r><p id="a"/><p id="b">injected</p><p id="c"/></r>"#
        );
    }

    #[test]
    fn test_injected_after_last_child_is_processed() {
        let mut snippets = SnippetCollection::new();
        snippets.add(After("a", r#"<p id="b"/>"#));
        snippets.add(TextSnippet::new("b", "tail"));

        let out = render(r#"<r><p id="a"/></r>"#, &snippets).unwrap();
        assert_eq!(out, r#"<r><p id="a"/><p id="b">tail</p></r>"#);
    }

    #[test]
    fn test_injected_duplicate_id_fails() {
        let mut snippets = SnippetCollection::new();
        snippets.add(After("a", r#"<p id="c"/>"#));

        let err = render(r#"<r><p id="c"/><p id="a"/></r>"#, &snippets).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(ref id) if id == "c"));
    }
}
