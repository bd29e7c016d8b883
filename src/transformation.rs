//! Selector-driven tree transformations.

use log::debug;

use crate::dom::{ArenaDom, NodeId};
use crate::error::Result;
use crate::select::Selector;

/// A change applied to every node a selector picks.
pub trait Transformation {
    fn selector(&self) -> &Selector;

    fn apply(&self, dom: &mut ArenaDom, node: NodeId) -> Result<()>;
}

/// Runs [`Transformation`]s over a context.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransformationProcessor;

impl TransformationProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Apply `transformation` to each selected node, in document order.
    ///
    /// The selection is taken before the first `apply`, so nodes added by
    /// the transformation are not visited.
    pub fn process(
        &self,
        dom: &mut ArenaDom,
        context: NodeId,
        transformation: &dyn Transformation,
    ) -> Result<()> {
        let selected = transformation.selector().select(dom, context);
        debug!(
            "Transformation '{}' selected {} node(s)",
            transformation.selector().as_str(),
            selected.len()
        );
        for node in selected {
            transformation.apply(dom, node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::dom::{parse_xml, to_xml};

    struct AddClass {
        selector: Selector,
        calls: RefCell<Vec<NodeId>>,
    }

    impl AddClass {
        fn new(css: &str) -> Self {
            Self {
                selector: Selector::parse(css).unwrap(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transformation for AddClass {
        fn selector(&self) -> &Selector {
            &self.selector
        }

        fn apply(&self, dom: &mut ArenaDom, node: NodeId) -> Result<()> {
            self.calls.borrow_mut().push(node);
            dom.set_attr(node, "class", "seen");
            Ok(())
        }
    }

    #[test]
    fn test_applies_to_each_selected_node() {
        let mut dom = parse_xml("<root><child/><other/><child/></root>").unwrap();
        let root = dom.document_element().unwrap();
        let transformation = AddClass::new("child");

        TransformationProcessor::new()
            .process(&mut dom, root, &transformation)
            .unwrap();

        assert_eq!(transformation.calls.borrow().len(), 2);
        assert_eq!(
            to_xml(&dom, dom.document()),
            r#"<root><child class="seen"/><other/><child class="seen"/></root>"#
        );
    }

    #[test]
    fn test_empty_selection_never_applies() {
        let mut dom = parse_xml("<root><child/></root>").unwrap();
        let root = dom.document_element().unwrap();
        let transformation = AddClass::new("missing");

        TransformationProcessor::new()
            .process(&mut dom, root, &transformation)
            .unwrap();

        assert!(transformation.calls.borrow().is_empty());
    }
}
