use crate::core::errors::{Error, Result};
use crate::models::EntryId;
use crate::services::tree::{TreeStore, PATH_SEPARATOR};

/// Parsed form of a `cd` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdTarget<'a> {
    Here,
    Parent,
    Root,
    /// A child name, or a multi-segment path resolved from the current folder.
    Path(&'a str),
}

impl<'a> CdTarget<'a> {
    pub fn parse(input: &'a str) -> Self {
        match input {
            "." | "./" => CdTarget::Here,
            ".." => CdTarget::Parent,
            "/" => CdTarget::Root,
            other => CdTarget::Path(other),
        }
    }
}

/// Tracks the current folder. It always names a live folder: the tree
/// refuses to remove it or its ancestors, and moves keep handles intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    current: EntryId,
}

impl Navigator {
    pub fn new(tree: &TreeStore) -> Self {
        Self {
            current: tree.root(),
        }
    }

    pub fn current(&self) -> EntryId {
        self.current
    }

    pub fn change_directory(&mut self, tree: &TreeStore, input: &str) -> Result<EntryId> {
        let target = match CdTarget::parse(input) {
            CdTarget::Here => self.current,
            CdTarget::Parent => tree
                .get(self.current)?
                .parent()
                .ok_or(Error::AlreadyAtRoot)?,
            CdTarget::Root => tree.root(),
            CdTarget::Path(path) if !path.contains(PATH_SEPARATOR) => {
                tree.find_child(self.current, path)?
            }
            CdTarget::Path(path) => tree.resolve(self.current, path)?,
        };

        let entry = tree.get(target)?;
        if entry.is_file() {
            return Err(Error::NotADirectory(entry.name().to_string()));
        }
        self.current = target;
        tracing::debug!(current = %target, "changed directory");
        Ok(target)
    }
}
