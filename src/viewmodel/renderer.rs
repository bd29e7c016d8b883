//! Binding of view models to `property` / `typeof` annotated markup.

use std::rc::Rc;

use log::{debug, trace};

use super::value::{ModelSequence, Value, ViewModel};
use crate::dom::{ArenaDom, NodeId, SnapshotList};
use crate::error::{BindingError, Error, Result};
use crate::select::{Selector, attribute_equals_css};

const PROPERTY: &str = "property";
const TYPEOF: &str = "typeof";
const TEXT_ACCESSOR: &str = "asString";

/// Depth-first renderer binding a stack of models to the tree.
///
/// The model stack, the stack of property names (for error paths) and the
/// per-level snapshot lists are reset on every [`render`](Self::render) call.
#[derive(Default)]
pub struct ViewModelRenderer {
    stack: Vec<Value>,
    names: Vec<String>,
    lists: Vec<SnapshotList>,
}

impl ViewModelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `model` to `context` and everything below it.
    pub fn render(&mut self, dom: &mut ArenaDom, context: NodeId, model: Value) -> Result<()> {
        debug!(
            "Rendering view model {model:?} into <{}>",
            dom.element_name(context).map_or("?", |n| &**n)
        );
        self.stack = vec![model];
        self.names.clear();
        self.lists.clear();

        let result = self.walk(dom, context);

        self.stack.clear();
        self.names.clear();
        self.lists.clear();
        match &result {
            Ok(()) => debug!("View model rendered"),
            Err(e) => debug!("View model rendering failed: {e}"),
        }
        result
    }

    fn walk(&mut self, dom: &mut ArenaDom, node: NodeId) -> Result<()> {
        if !dom.is_element(node) {
            return Ok(());
        }
        let Some(property) = dom.get_attr(node, PROPERTY).map(str::to_string) else {
            return self.walk_children(dom, node);
        };

        self.push_property(dom, node, &property)?;
        let result = self
            .apply_current(dom, node)
            .and_then(|anchor| self.walk_children(dom, anchor));
        self.pop();
        result
    }

    fn walk_children(&mut self, dom: &mut ArenaDom, parent: NodeId) -> Result<()> {
        if !dom.has_children(parent) {
            return Ok(());
        }
        self.lists.push(SnapshotList::new(dom, parent));
        let result = self.walk_pending(dom);
        self.lists.pop();
        result
    }

    fn walk_pending(&mut self, dom: &mut ArenaDom) -> Result<()> {
        loop {
            let child = match self.lists.last_mut() {
                Some(list) if list.has_next() => list.get_next()?,
                _ => return Ok(()),
            };
            self.walk(dom, child)?;
        }
    }

    /// Resolve `property` against the top model and push the result.
    fn push_property(&mut self, dom: &ArenaDom, node: NodeId, property: &str) -> Result<()> {
        let model = match self.stack.last() {
            Some(Value::Model(model)) => Rc::clone(model),
            other => {
                return Err(BindingError::NotAnObject {
                    property: property.to_string(),
                    kind: other.map_or("null", Value::kind),
                    path: self.path(),
                }
                .into());
            }
        };

        self.names.push(property.to_string());
        let current = dom.text_content(node);
        match lookup(model.as_ref(), property, property, &current) {
            Some(value) => {
                trace!("{} -> {value:?}", self.path());
                self.stack.push(value);
                Ok(())
            }
            None => {
                let path = self.path();
                self.names.pop();
                Err(BindingError::MissingAccessor { path }.into())
            }
        }
    }

    fn pop(&mut self) {
        self.stack.pop();
        self.names.pop();
    }

    fn path(&self) -> String {
        self.names.join(".")
    }

    /// Apply the top value to `node`, returning the node now in its place.
    fn apply_current(&mut self, dom: &mut ArenaDom, node: NodeId) -> Result<NodeId> {
        let value = self.stack.last().cloned().unwrap_or(Value::Null);
        match &value {
            Value::Flag(true) => Ok(node),
            Value::Flag(false) => self.remove(dom, node),
            Value::Text(text) => {
                dom.set_text_content(node, text);
                Ok(node)
            }
            Value::Model(model) => self.apply_model(dom, node, model.as_ref(), &value),
            Value::Sequence(sequence) => self.apply_sequence(dom, node, sequence.as_ref()),
            Value::Number(_) | Value::Null => Err(BindingError::UnsupportedType {
                kind: value.kind(),
                path: self.path(),
            }
            .into()),
        }
    }

    fn remove(&mut self, dom: &mut ArenaDom, node: NodeId) -> Result<NodeId> {
        if dom.document_element() == Some(node) {
            return Err(Error::RemoveRoot);
        }
        self.forget(node)?;
        dom.detach(node);
        Ok(dom.create_fragment())
    }

    /// Drop `node` from the snapshot of the level currently being walked.
    fn forget(&mut self, node: NodeId) -> Result<()> {
        if let Some(list) = self.lists.last_mut()
            && list.has_node(node)
        {
            list.remove_node(node)?;
        }
        Ok(())
    }

    fn apply_sequence(
        &mut self,
        dom: &mut ArenaDom,
        node: NodeId,
        sequence: &dyn ModelSequence,
    ) -> Result<NodeId> {
        let count = sequence
            .count()
            .ok_or_else(|| BindingError::NotCountable { path: self.path() })?;
        if count > 1 && dom.document_element() == Some(node) {
            return Err(Error::MultiplyRoot);
        }
        if count == 0 {
            return self.remove(dom, node);
        }

        let container = self.move_to_container(dom, node)?;
        for (pos, entry) in sequence.entries().enumerate() {
            let copy = dom.deep_clone(container);
            dom.insert_before(container, copy);
            let Some(template) = dom.first_child(copy) else {
                dom.detach(copy);
                break;
            };

            let selected = self.select_alternative(dom, template, &entry)?;
            for other in dom.child_ids(copy) {
                if other != selected {
                    dom.detach(other);
                }
            }

            self.stack.push(entry);
            self.names.push(pos.to_string());
            let result = self
                .apply_current(dom, selected)
                .and_then(|anchor| self.walk_children(dom, anchor));
            self.pop();
            result?;

            for produced in dom.child_ids(copy) {
                dom.insert_before(copy, produced);
            }
            dom.detach(copy);
        }

        dom.detach(container);
        Ok(dom.create_fragment())
    }

    fn apply_model(
        &mut self,
        dom: &mut ArenaDom,
        node: NodeId,
        model: &dyn ViewModel,
        value: &Value,
    ) -> Result<NodeId> {
        let container = self.move_to_container(dom, node)?;
        let template = dom.first_child(container).unwrap_or(node);
        let selected = self.select_alternative(dom, template, value)?;

        let current = dom.text_content(selected);
        match model
            .invoke(TEXT_ACCESSOR, &current)
            .or_else(|| model.invoke_dynamic(TEXT_ACCESSOR, &current))
        {
            None | Some(Value::Null) => {}
            Some(Value::Text(text)) => dom.set_text_content(selected, &text),
            Some(other) => {
                return Err(BindingError::InvalidTextValue {
                    kind: other.kind(),
                    path: self.path(),
                }
                .into());
            }
        }

        for attribute in dom.attr_names(selected) {
            self.bind_attribute(dom, selected, &attribute, model)?;
        }

        dom.insert_before(container, selected);
        dom.detach(container);
        Ok(selected)
    }

    fn bind_attribute(
        &self,
        dom: &mut ArenaDom,
        element: NodeId,
        attribute: &str,
        model: &dyn ViewModel,
    ) -> Result<()> {
        let current = dom.get_attr(element, attribute).unwrap_or_default().to_string();
        let operation = camelize(attribute);

        match lookup(model, &operation, attribute, &current) {
            None | Some(Value::Null) => {}
            Some(Value::Flag(false)) => {
                trace!("{}: removing attribute {attribute}", self.path());
                dom.remove_attr(element, attribute);
            }
            Some(Value::Text(text)) => dom.set_attr(element, attribute, &text),
            Some(other) => {
                return Err(BindingError::InvalidAttributeValue {
                    attribute: attribute.to_string(),
                    kind: other.kind(),
                    path: self.path(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Move `node` and every sibling bound to the same property into a
    /// temporary `container` element placed where `node` was.
    fn move_to_container(&mut self, dom: &mut ArenaDom, node: NodeId) -> Result<NodeId> {
        let parent = dom.parent(node).ok_or_else(|| {
            Error::InvalidDocument("bound element has no parent".to_string())
        })?;
        let property = dom.get_attr(node, PROPERTY).unwrap_or_default().to_string();

        let container = dom.create_element_like(node, "container");
        dom.insert_before(node, container);

        let alternatives =
            Selector::attribute_equals(PROPERTY, &property)?.select_children(dom, parent);
        trace!(
            "{}: {} alternative(s) for '{property}'",
            self.path(),
            alternatives.len()
        );
        for alternative in alternatives {
            dom.append(container, alternative);
            self.forget(alternative)?;
        }
        Ok(container)
    }

    /// Pick the template matching the value's type tag.
    fn select_alternative(&self, dom: &ArenaDom, template: NodeId, value: &Value) -> Result<NodeId> {
        let Some(wanted) = dom.get_attr(template, TYPEOF) else {
            return Ok(template);
        };
        let tag = match value {
            Value::Model(model) => model.type_of(),
            _ => None,
        }
        .ok_or_else(|| BindingError::MissingTypeTag { path: self.path() })?;

        if wanted == tag {
            return Ok(template);
        }

        let property = dom.get_attr(template, PROPERTY).unwrap_or_default();
        let css = format!(
            "{}{}",
            attribute_equals_css(PROPERTY, property),
            attribute_equals_css(TYPEOF, &tag)
        );
        Selector::parse(&css)?
            .select_following_siblings(dom, template)
            .first()
            .copied()
            .ok_or_else(|| BindingError::ContextNotFound { type_tag: tag }.into())
    }
}

/// Try `name`, then `get<Name>`, then the dynamic handler under `dynamic_name`.
fn lookup(model: &dyn ViewModel, name: &str, dynamic_name: &str, current: &str) -> Option<Value> {
    model
        .invoke(name, current)
        .or_else(|| model.invoke(&format!("get{}", ucfirst(name)), current))
        .or_else(|| model.invoke_dynamic(dynamic_name, current))
}

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `data-checked` -> `DataChecked`; names without a dash are kept.
fn camelize(attribute: &str) -> String {
    if attribute.contains('-') {
        attribute.split('-').map(ucfirst).collect()
    } else {
        attribute.to_string()
    }
}
