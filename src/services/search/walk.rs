use std::collections::VecDeque;

use crate::models::EntryId;
use crate::services::tree::TreeStore;

/// Pre-order walk: an entry, then each child subtree in sibling order.
pub struct PreOrder<'t> {
    tree: &'t TreeStore,
    stack: Vec<EntryId>,
}

impl<'t> PreOrder<'t> {
    pub fn new(tree: &'t TreeStore, start: EntryId) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl Iterator for PreOrder<'_> {
    type Item = EntryId;

    fn next(&mut self) -> Option<EntryId> {
        let id = self.stack.pop()?;
        if let Ok(children) = self.tree.children(id) {
            // Reversed so the first child is popped first.
            self.stack.extend(children.iter().rev());
        }
        Some(id)
    }
}

/// Level-order walk over a growable queue seeded with the start entry.
pub struct LevelOrder<'t> {
    tree: &'t TreeStore,
    queue: VecDeque<EntryId>,
}

impl<'t> LevelOrder<'t> {
    pub fn new(tree: &'t TreeStore, start: EntryId) -> Self {
        Self {
            tree,
            queue: VecDeque::from([start]),
        }
    }
}

impl Iterator for LevelOrder<'_> {
    type Item = EntryId;

    fn next(&mut self) -> Option<EntryId> {
        let id = self.queue.pop_front()?;
        if let Ok(children) = self.tree.children(id) {
            self.queue.extend(children.iter().copied());
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Result;
    use crate::models::EntryKind;

    fn names(tree: &TreeStore, ids: impl Iterator<Item = EntryId>) -> Vec<String> {
        ids.map(|id| tree.get(id).unwrap().name().to_string()).collect()
    }

    #[test]
    fn orders_differ_on_nested_tree() -> Result<()> {
        let mut tree = TreeStore::new("root")?;
        let root = tree.root();
        let a = tree.create(root, "a", EntryKind::Folder)?;
        let b = tree.create(root, "b", EntryKind::Folder)?;
        tree.create(a, "a1", EntryKind::File)?;
        tree.create(b, "b1", EntryKind::File)?;

        assert_eq!(
            names(&tree, PreOrder::new(&tree, root)),
            ["root", "a", "a1", "b", "b1"]
        );
        assert_eq!(
            names(&tree, LevelOrder::new(&tree, root)),
            ["root", "a", "b", "a1", "b1"]
        );
        Ok(())
    }

    #[test]
    fn level_order_has_no_fixed_capacity() -> Result<()> {
        let mut tree = TreeStore::new("root")?;
        let root = tree.root();
        for i in 0..1500 {
            tree.create(root, &format!("f{i:04}"), EntryKind::File)?;
        }
        assert_eq!(LevelOrder::new(&tree, root).count(), 1501);
        Ok(())
    }
}
