use log::trace;

use super::Snippet;
use crate::dom::{ArenaDom, NodeId, parse_xml};
use crate::error::{Error, Result};

/// Markup content applied to a target element.
///
/// If the target and the content root carry the same `id`, the content
/// replaces the target. Otherwise the content is appended to the target;
/// fragment content is appended child by child.
#[derive(Debug)]
pub struct SimpleSnippet {
    target_id: String,
    dom: ArenaDom,
    content: NodeId,
}

impl SimpleSnippet {
    /// Wrap `content`, a node of `dom`.
    pub fn new(target_id: impl Into<String>, dom: ArenaDom, content: NodeId) -> Self {
        Self {
            target_id: target_id.into(),
            dom,
            content,
        }
    }

    /// Parse `xml` and use its root element as content.
    pub fn from_xml(target_id: impl Into<String>, xml: &str) -> Result<Self> {
        let dom = parse_xml(xml)?;
        let root = dom
            .document_element()
            .ok_or_else(|| Error::InvalidDocument("snippet has no root element".to_string()))?;
        Ok(Self::new(target_id, dom, root))
    }

    /// The private tree holding the content.
    pub fn content_dom(&self) -> &ArenaDom {
        &self.dom
    }

    pub fn content(&self) -> NodeId {
        self.content
    }

    fn should_replace(dom: &ArenaDom, target: NodeId, content: NodeId) -> bool {
        if !dom.is_element(content) {
            return false;
        }
        match (dom.element_id(target), dom.element_id(content)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl Snippet for SimpleSnippet {
    fn target_id(&self) -> &str {
        &self.target_id
    }

    fn apply_to(&self, dom: &mut ArenaDom, element: NodeId) -> Result<NodeId> {
        let content = dom.import(&self.dom, self.content);

        if Self::should_replace(dom, element, content) {
            trace!("Replacing #{}", self.target_id);
            dom.replace(element, content);
            return Ok(content);
        }

        trace!("Appending to #{}", self.target_id);
        dom.append(element, content);
        Ok(element)
    }
}

/// Replaces the target's content with plain text.
pub struct TextSnippet {
    target_id: String,
    text: String,
}

impl TextSnippet {
    pub fn new(target_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            text: text.into(),
        }
    }
}

impl Snippet for TextSnippet {
    fn target_id(&self) -> &str {
        &self.target_id
    }

    fn apply_to(&self, dom: &mut ArenaDom, element: NodeId) -> Result<NodeId> {
        dom.set_text_content(element, &self.text);
        Ok(element)
    }
}
