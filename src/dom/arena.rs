//! Arena-based mutable DOM.
//!
//! Every node lives in one contiguous vector and is addressed by a copyable
//! [`NodeId`]. Parent/child/sibling links are indices into that vector, so a
//! walker can keep holding ids while the tree around them is rewritten.
//! Detached nodes are never freed; their ids stay valid for the lifetime of
//! the arena.

use html5ever::{LocalName, Namespace, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    fn to_option(self) -> Option<NodeId> {
        if self.is_some() { Some(self) } else { None }
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Cached `id` attribute, kept in sync with `attrs`.
        id: Option<String>,
        /// Cached `class` tokens, kept in sync with `attrs`.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    /// Comment.
    Comment(String),
    /// Document type declaration.
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Ownerless container. Inserting it moves its children instead.
    Fragment,
}

/// Element attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Attribute in no namespace.
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.into(),
        }
    }
}

/// A node in the arena DOM.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
///
/// Cloning copies the whole arena; node ids stay valid in the copy.
#[derive(Debug, Clone)]
pub struct ArenaDom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl ArenaDom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document node ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// The first element child of the document node.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.document).find(|&c| self.is_element(c))
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new, detached element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let mut data = NodeData::Element {
            name,
            attrs,
            id: None,
            classes: Vec::new(),
        };
        refresh_cached_attrs(&mut data);
        self.alloc(Node::new(data))
    }

    /// Create an element in the same namespace as `like`.
    pub fn create_element_like(&mut self, like: NodeId, local: &str) -> NodeId {
        let ns = self
            .element_namespace(like)
            .cloned()
            .unwrap_or_else(|| ns!());
        self.create_element(QualName::new(None, ns, LocalName::from(local)), Vec::new())
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text.into())))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text.into())))
    }

    /// Create an empty document fragment.
    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(Node::new(NodeData::Fragment))
    }

    /// Create a doctype node.
    pub fn create_doctype(&mut self, name: String, public_id: String, system_id: String) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    /// Unlink a node from its parent and siblings. No-op for detached nodes.
    pub fn detach(&mut self, target: NodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };
        if parent.is_none() {
            return;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Append a child to a parent node.
    ///
    /// An attached child is moved; a fragment contributes its children.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if self.is_fragment(child) {
            for moved in self.child_ids(child) {
                self.append(parent, moved);
            }
            return;
        }
        self.detach(child);

        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
        }

        if last_child.is_some() {
            if let Some(last_node) = self.get_mut(last_child) {
                last_node.next_sibling = child;
            }
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `new_node` before `sibling`, under `sibling`'s parent.
    ///
    /// An attached node is moved; a fragment contributes its children.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        if new_node == sibling {
            return;
        }
        if self.is_fragment(new_node) {
            for moved in self.child_ids(new_node) {
                self.insert_before(sibling, moved);
            }
            return;
        }
        self.detach(new_node);

        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Put `new_node` where `old` is and detach `old`.
    pub fn replace(&mut self, old: NodeId, new_node: NodeId) {
        if old == new_node {
            return;
        }
        self.insert_before(old, new_node);
        self.detach(old);
    }

    /// Detach every child of `parent`.
    pub fn remove_children(&mut self, parent: NodeId) {
        for child in self.child_ids(parent) {
            self.detach(child);
        }
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child) {
            if let NodeData::Text(ref mut existing) = last.data {
                existing.push_str(text);
                return;
            }
        }

        let text_node = self.create_text(text);
        self.append(parent, text_node);
    }

    /// Deep copy of `node` inside this arena. The copy is detached.
    pub fn deep_clone(&mut self, node: NodeId) -> NodeId {
        let data = match self.get(node) {
            Some(n) => n.data.clone(),
            None => return NodeId::NONE,
        };
        let copy = self.alloc(Node::new(data));
        for child in self.child_ids(node) {
            let child_copy = self.deep_clone(child);
            self.append(copy, child_copy);
        }
        copy
    }

    /// Deep copy of `node` from another arena. The copy is detached.
    ///
    /// A document node is imported as a fragment.
    pub fn import(&mut self, source: &ArenaDom, node: NodeId) -> NodeId {
        let data = match source.get(node) {
            Some(n) => match &n.data {
                NodeData::Document => NodeData::Fragment,
                other => other.clone(),
            },
            None => return NodeId::NONE,
        };
        let copy = self.alloc(Node::new(data));
        for child in source.children(node) {
            let child_copy = self.import(source, child);
            self.append(copy, child_copy);
        }
        copy
    }

    /// Find a node by `id` attribute in document order.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.find(|node| matches!(&node.data, NodeData::Element { id: Some(v), .. } if v == id))
    }

    /// Get the number of nodes ever allocated.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the DOM is empty (only has document root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Owned list of the current children, for callers that mutate while looping.
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.to_option())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.to_option())
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.to_option())
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.first_child(id).is_some()
    }

    /// Find the first node matching a predicate (DFS from the document).
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                if predicate(node) {
                    return Some(id);
                }
                // Reverse so the stack pops left-to-right
                let mut children: Vec<_> = self.children(id).collect();
                children.reverse();
                stack.extend(children);
            }
        }
        None
    }

    /// Find element by tag name (first match).
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|node| {
            if let NodeData::Element { name, .. } = &node.data {
                name.local.as_ref() == tag
            } else {
                false
            }
        })
    }

    /// Element descendants of `context` in document order, `context` excluded.
    pub fn descendant_elements(&self, context: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(context).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            if self.is_element(id) {
                out.push(id);
            }
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: NodeId,
}

impl<'a> Iterator for ChildrenIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

fn refresh_cached_attrs(data: &mut NodeData) {
    if let NodeData::Element {
        attrs, id, classes, ..
    } = data
    {
        *id = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "id")
            .map(|a| a.value.clone());
        *classes = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "class")
            .map(|a| a.value.split_whitespace().map(|s| s.to_string()).collect())
            .unwrap_or_default();
    }
}

/// Element accessors.
impl ArenaDom {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get element's qualified name.
    pub fn element_qual_name(&self, id: NodeId) -> Option<&QualName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        })
    }

    /// Get element's namespace.
    pub fn element_namespace(&self, id: NodeId) -> Option<&Namespace> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        })
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    pub fn has_attr(&self, id: NodeId, attr_name: &str) -> bool {
        self.get_attr(id, attr_name).is_some()
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, id: NodeId, attr_name: &str, value: &str) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if let NodeData::Element { attrs, .. } = &mut node.data {
            match attrs.iter_mut().find(|a| a.name.local.as_ref() == attr_name) {
                Some(existing) => existing.value = value.to_string(),
                None => attrs.push(Attribute::new(attr_name, value)),
            }
        }
        refresh_cached_attrs(&mut node.data);
    }

    pub fn remove_attr(&mut self, id: NodeId, attr_name: &str) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if let NodeData::Element { attrs, .. } = &mut node.data {
            attrs.retain(|a| a.name.local.as_ref() != attr_name);
        }
        refresh_cached_attrs(&mut node.data);
    }

    /// Names of the element's attributes, in document order.
    pub fn attr_names(&self, id: NodeId) -> Vec<String> {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => {
                attrs.iter().map(|a| a.name.local.to_string()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: NodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    pub fn is_fragment(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Fragment))
    }

    /// Get the content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(s)) => out.push_str(s),
            Some(NodeData::Comment(_)) | Some(NodeData::Doctype { .. }) | None => {}
            Some(_) => {
                for child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Replace all children by a single text node (none for empty text).
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.get_mut(id)
            && let NodeData::Text(existing) = &mut node.data
        {
            *existing = text.to_string();
            return;
        }
        self.remove_children(id);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append(id, text_node);
        }
    }
}
