//! Snapshot of a node's children for traversal under mutation.
//!
//! Walking `first_child`/`next_sibling` links while the walk itself inserts,
//! moves and removes nodes either skips or revisits nodes. A [`SnapshotList`]
//! captures the child ids once, up front. Later structural changes to the
//! tree do not affect it; removals made by the walker that owns the list go
//! through [`SnapshotList::remove_node`], which keeps the cursor on the same
//! pending item.

use super::arena::{ArenaDom, NodeId};
use crate::error::SnapshotError;

#[derive(Debug, Clone, Default)]
pub struct SnapshotList {
    items: Vec<NodeId>,
    /// Number of items consumed; index of the next pending item.
    pos: usize,
}

impl SnapshotList {
    /// Snapshot the current children of `parent`.
    pub fn new(dom: &ArenaDom, parent: NodeId) -> Self {
        Self::from_nodes(dom.child_ids(parent))
    }

    pub fn from_nodes(items: Vec<NodeId>) -> Self {
        Self { items, pos: 0 }
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.items.len()
    }

    /// Consume the next pending item.
    pub fn get_next(&mut self) -> Result<NodeId, SnapshotError> {
        let item = *self.items.get(self.pos).ok_or(SnapshotError::Exhausted)?;
        self.pos += 1;
        Ok(item)
    }

    pub fn has_node(&self, node: NodeId) -> bool {
        self.items.contains(&node)
    }

    /// Remove `node` from the snapshot.
    ///
    /// Removing an already consumed item moves the cursor back by one, so the
    /// next pending item stays the same.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), SnapshotError> {
        let index = self
            .items
            .iter()
            .position(|&item| item == node)
            .ok_or(SnapshotError::NotFound)?;
        self.items.remove(index);
        if index < self.pos {
            self.pos -= 1;
        }
        Ok(())
    }

    /// Cursor position: how many items have been consumed.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Iterator for SnapshotList {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.get_next().ok()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn ids(n: u32) -> Vec<NodeId> {
        (1..=n).map(NodeId).collect()
    }

    #[test]
    fn test_snapshot_ignores_later_mutation() {
        let mut dom = crate::dom::parse_xml("<root><a/><b/></root>").unwrap();
        let root = dom.document_element().unwrap();
        let mut list = SnapshotList::new(&dom, root);

        let c = dom.create_element_like(root, "c");
        dom.append(root, c);
        let first = dom.first_child(root).unwrap();
        dom.detach(first);

        assert_eq!(list.len(), 2);
        assert_eq!(list.get_next().unwrap(), first);
        assert!(list.has_next());
        list.get_next().unwrap();
        assert!(!list.has_next());
    }

    #[test]
    fn test_exhausted() {
        let mut list = SnapshotList::from_nodes(ids(1));
        list.get_next().unwrap();
        assert_eq!(list.get_next(), Err(SnapshotError::Exhausted));
    }

    #[test]
    fn test_remove_missing_node() {
        let mut list = SnapshotList::from_nodes(ids(2));
        assert_eq!(list.remove_node(NodeId(9)), Err(SnapshotError::NotFound));
    }

    #[test]
    fn test_remove_consumed_node_shifts_cursor() {
        let items = ids(5);
        let mut list = SnapshotList::from_nodes(items.clone());
        for _ in 0..3 {
            list.get_next().unwrap();
        }
        assert_eq!(list.position(), 3);

        list.remove_node(items[1]).unwrap();

        assert_eq!(list.position(), 2);
        assert!(!list.has_node(items[1]));
        assert_eq!(list.get_next().unwrap(), items[3]);
        assert_eq!(list.get_next().unwrap(), items[4]);
        assert!(!list.has_next());
    }

    #[test]
    fn test_remove_current_node_keeps_next_pending() {
        let items = ids(3);
        let mut list = SnapshotList::from_nodes(items.clone());
        let current = list.get_next().unwrap();

        list.remove_node(current).unwrap();

        assert_eq!(list.get_next().unwrap(), items[1]);
    }

    #[test]
    fn test_remove_pending_node_is_skipped() {
        let items = ids(3);
        let mut list = SnapshotList::from_nodes(items.clone());
        list.get_next().unwrap();

        list.remove_node(items[1]).unwrap();

        assert_eq!(list.collect::<Vec<_>>(), vec![items[2]]);
    }

    proptest! {
        #[test]
        fn prop_removal_never_skips_or_repeats(
            len in 1u32..20,
            consumed in 0usize..20,
            removed in 0usize..20,
        ) {
            let items = ids(len);
            let consumed = consumed.min(items.len());
            let removed = removed % items.len();

            let mut list = SnapshotList::from_nodes(items.clone());
            for _ in 0..consumed {
                list.get_next().unwrap();
            }
            list.remove_node(items[removed]).unwrap();

            let rest: Vec<_> = list.collect();
            let expected: Vec<_> = items
                .iter()
                .enumerate()
                .skip(consumed)
                .filter(|(i, _)| *i != removed)
                .map(|(_, id)| *id)
                .collect();
            prop_assert_eq!(rest, expected);
        }
    }
}
