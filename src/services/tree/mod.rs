//! The tree store: owns every entry of one hierarchy and enforces the
//! structural invariants (one root, unique sibling names, files are leaves,
//! parent and children links agree, sibling order).
//!
//! Every mutating operation validates all of its preconditions before it
//! touches the arena, so a failed call leaves the tree exactly as it was.

mod arena;

use std::cmp::Ordering;

use serde::Serialize;

use crate::core::config::ExplorerConfig;
use crate::core::errors::{Error, Result};
use crate::models::{sibling_order, Entry, EntryId, EntryKind};
use arena::Arena;

pub const PATH_SEPARATOR: char = '/';

/// Constraints on entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRules {
    pub max_len: Option<usize>,
}

impl Default for NameRules {
    fn default() -> Self {
        Self {
            max_len: ExplorerConfig::default().max_name_len,
        }
    }
}

impl NameRules {
    pub fn unbounded() -> Self {
        Self { max_len: None }
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        let reject = |reason| {
            Err(Error::InvalidName {
                name: name.to_string(),
                reason,
            })
        };
        if name.is_empty() {
            return reject("name is empty");
        }
        if name == "." || name == ".." {
            return reject("name is reserved for navigation");
        }
        if name.contains(PATH_SEPARATOR) {
            return reject("name contains a path separator");
        }
        if name.chars().any(char::is_control) {
            return reject("name contains control characters");
        }
        if let Some(max) = self.max_len {
            if name.chars().count() > max {
                return reject("name is too long");
            }
        }
        Ok(())
    }
}

/// Summary of a successful `remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed {
    pub name: String,
    pub kind: EntryKind,
    /// Entries released, the removed entry included.
    pub released: usize,
}

/// Counts below (not including) a subtree's top entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub folders: usize,
    pub files: usize,
    pub depth: usize,
}

pub struct TreeStore {
    arena: Arena,
    root: EntryId,
    rules: NameRules,
}

impl TreeStore {
    pub fn new(root_name: &str) -> Result<Self> {
        Self::with_rules(root_name, NameRules::default())
    }

    pub fn from_config(config: &ExplorerConfig) -> Result<Self> {
        Self::with_rules(
            &config.root_name,
            NameRules {
                max_len: config.max_name_len,
            },
        )
    }

    pub fn with_rules(root_name: &str, rules: NameRules) -> Result<Self> {
        rules.validate(root_name)?;
        let mut arena = Arena::default();
        let root = arena.insert(Entry::new(root_name.to_string(), EntryKind::Folder, None))?;
        Ok(Self { arena, root, rules })
    }

    pub fn root(&self) -> EntryId {
        self.root
    }

    pub fn rules(&self) -> NameRules {
        self.rules
    }

    /// Number of live entries, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Always false: the root lives for as long as the store.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.arena.get(id).is_some()
    }

    pub fn get(&self, id: EntryId) -> Result<&Entry> {
        self.arena
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("entry {id}")))
    }

    pub fn children(&self, id: EntryId) -> Result<&[EntryId]> {
        Ok(self.get(id)?.children())
    }

    pub fn child_count(&self, id: EntryId) -> Result<usize> {
        Ok(self.children(id)?.len())
    }

    /// Creates `name` under `parent`, placed by sibling order.
    pub fn create(&mut self, parent: EntryId, name: &str, kind: EntryKind) -> Result<EntryId> {
        let parent_entry = self.get(parent)?;
        if parent_entry.is_file() {
            return Err(Error::NotADirectory(parent_entry.name().to_string()));
        }
        self.rules.validate(name)?;
        if self.lookup_child(parent, name).is_some() {
            return Err(Error::NameCollision(name.to_string()));
        }

        let id = self
            .arena
            .insert(Entry::new(name.to_string(), kind, Some(parent)))?;
        self.link(parent, id);
        tracing::debug!(%id, name, %kind, "created entry");
        Ok(id)
    }

    /// Exact-name lookup among the direct children of `parent`.
    pub fn find_child(&self, parent: EntryId, name: &str) -> Result<EntryId> {
        self.get(parent)?;
        self.lookup_child(parent, name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Unlinks `id` and releases it with its whole subtree.
    ///
    /// `current` is the navigator's location; neither it nor any of its
    /// ancestors may be removed.
    pub fn remove(&mut self, id: EntryId, current: EntryId) -> Result<Removed> {
        let entry = self.get(id)?;
        if id == self.root {
            return Err(Error::CannotDeleteRoot);
        }
        if id == current {
            return Err(Error::CannotDeleteCurrent);
        }
        if self.is_ancestor(id, current) {
            return Err(Error::CannotDeleteAncestorOfCurrent(entry.name().to_string()));
        }

        let name = entry.name().to_string();
        let kind = entry.kind();
        self.unlink(id);
        let released = self.release_subtree(id);
        tracing::debug!(%id, name = %name, released, "removed entry");
        Ok(Removed {
            name,
            kind,
            released,
        })
    }

    /// Reparents `source` under `destination`. The entry keeps its handle
    /// and metadata; only its parent link and position change.
    pub fn move_entry(&mut self, source: EntryId, destination: EntryId) -> Result<()> {
        let src = self.get(source)?;
        let dest = self.get(destination)?;
        if source == self.root {
            return Err(Error::CannotMoveRoot);
        }
        if dest.is_file() {
            return Err(Error::DestinationNotDirectory(dest.name().to_string()));
        }
        if src.is_folder() && self.ancestors(destination).any(|a| a == source) {
            return Err(Error::CyclicMove(src.name().to_string()));
        }
        if self.lookup_child(destination, src.name()).is_some() {
            return Err(Error::NameCollision(src.name().to_string()));
        }

        self.unlink(source);
        self.link(destination, source);
        tracing::debug!(%source, %destination, "moved entry");
        Ok(())
    }

    /// Absolute path of `id`: `/` for the root, `/a/b` below it. The root's
    /// own name is not part of any path.
    pub fn full_path(&self, id: EntryId) -> Result<String> {
        self.get(id)?;
        let mut names: Vec<&str> = self
            .ancestors(id)
            .filter(|&a| a != self.root)
            .filter_map(|a| self.arena.get(a).map(Entry::name))
            .collect();
        if names.is_empty() {
            return Ok(PATH_SEPARATOR.to_string());
        }
        names.reverse();

        let mut path = String::new();
        for name in names {
            path.push(PATH_SEPARATOR);
            path.push_str(name);
        }
        Ok(path)
    }

    /// Resolves `path` to an entry. Absolute paths start at the root,
    /// relative ones at `from`. `.` and empty segments are skipped, `..`
    /// steps to the parent.
    pub fn resolve(&self, from: EntryId, path: &str) -> Result<EntryId> {
        let mut current = if path.starts_with(PATH_SEPARATOR) {
            self.root
        } else {
            self.get(from)?;
            from
        };

        for segment in path.split(PATH_SEPARATOR) {
            match segment {
                "" | "." => continue,
                ".." => {
                    current = self.get(current)?.parent().ok_or(Error::AlreadyAtRoot)?;
                }
                name => {
                    let entry = self.get(current)?;
                    if entry.is_file() {
                        return Err(Error::NotADirectory(entry.name().to_string()));
                    }
                    current = self.find_child(current, name)?;
                }
            }
        }
        Ok(current)
    }

    /// `id` followed by its parent chain up to the root.
    pub fn ancestors(&self, id: EntryId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// True if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: EntryId, id: EntryId) -> bool {
        self.ancestors(id).skip(1).any(|a| a == ancestor)
    }

    pub fn stats(&self, id: EntryId) -> Result<TreeStats> {
        self.get(id)?;
        let mut stats = TreeStats::default();
        let mut pending = vec![(id, 0usize)];
        while let Some((next, depth)) = pending.pop() {
            let Some(entry) = self.arena.get(next) else {
                continue;
            };
            if next != id {
                match entry.kind() {
                    EntryKind::Folder => stats.folders += 1,
                    EntryKind::File => stats.files += 1,
                }
                stats.depth = stats.depth.max(depth);
            }
            pending.extend(entry.children().iter().map(|&c| (c, depth + 1)));
        }
        Ok(stats)
    }

    fn lookup_child(&self, parent: EntryId, name: &str) -> Option<EntryId> {
        self.arena
            .get(parent)?
            .children()
            .iter()
            .copied()
            .find(|&c| self.arena.get(c).is_some_and(|e| e.name() == name))
    }

    fn link(&mut self, parent: EntryId, child: EntryId) {
        let position = {
            let (Some(entry), Some(parent_entry)) = (self.arena.get(child), self.arena.get(parent))
            else {
                return;
            };
            let key = entry.order_key();
            parent_entry.children().partition_point(|&sibling| {
                self.arena
                    .get(sibling)
                    .is_some_and(|s| sibling_order(s.order_key(), key) == Ordering::Less)
            })
        };

        if let Some(entry) = self.arena.get_mut(child) {
            entry.set_parent(parent);
        }
        if let Some(parent_entry) = self.arena.get_mut(parent) {
            parent_entry.children_mut().insert(position, child);
        }
    }

    fn unlink(&mut self, child: EntryId) {
        let Some(parent) = self.arena.get(child).and_then(Entry::parent) else {
            return;
        };
        if let Some(parent_entry) = self.arena.get_mut(parent) {
            parent_entry.children_mut().retain(|&c| c != child);
        }
    }

    fn release_subtree(&mut self, id: EntryId) -> usize {
        let mut pending = vec![id];
        let mut released = 0;
        while let Some(next) = pending.pop() {
            if let Some(entry) = self.arena.release(next) {
                pending.extend_from_slice(entry.children());
                released += 1;
            }
        }
        released
    }
}

pub struct Ancestors<'t> {
    tree: &'t TreeStore,
    next: Option<EntryId>,
}

impl Iterator for Ancestors<'_> {
    type Item = EntryId;

    fn next(&mut self) -> Option<EntryId> {
        let current = self.next?;
        self.next = self.tree.arena.get(current).and_then(Entry::parent);
        Some(current)
    }
}
