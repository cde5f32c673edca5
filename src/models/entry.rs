//! Entry types shared by the tree store, navigator and search engine.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Handle to an entry slot in a tree's arena.
///
/// The generation makes handles to released entries stale instead of
/// silently aliasing whatever entry reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl EntryId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Folder => "folder",
            EntryKind::File => "file",
        }
    }

    pub fn is_folder(self) -> bool {
        matches!(self, EntryKind::Folder)
    }

    pub fn is_file(self) -> bool {
        matches!(self, EntryKind::File)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "folder" | "dir" | "directory" => Ok(EntryKind::Folder),
            "file" => Ok(EntryKind::File),
            other => Err(format!("unknown entry kind '{other}'")),
        }
    }
}

/// Display and iteration order of siblings: folders before files, then
/// names in ascending byte order (case-sensitive).
pub fn sibling_order(a: (EntryKind, &str), b: (EntryKind, &str)) -> Ordering {
    let rank = |kind: EntryKind| if kind.is_folder() { 0 } else { 1 };
    rank(a.0).cmp(&rank(b.0)).then_with(|| a.1.cmp(b.1))
}

/// One file or folder. Links are arena handles; the parent owns its
/// children list, the child only names its parent.
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    kind: EntryKind,
    parent: Option<EntryId>,
    children: Vec<EntryId>,
    created_at: OffsetDateTime,
}

impl Entry {
    pub(crate) fn new(name: String, kind: EntryKind, parent: Option<EntryId>) -> Self {
        Self {
            name,
            kind,
            parent,
            children: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    /// `None` only for the root.
    pub fn parent(&self) -> Option<EntryId> {
        self.parent
    }

    /// Children in sibling order. Always empty for files.
    pub fn children(&self) -> &[EntryId] {
        &self.children
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub(crate) fn order_key(&self) -> (EntryKind, &str) {
        (self.kind, &self.name)
    }

    pub(crate) fn set_parent(&mut self, parent: EntryId) {
        self.parent = Some(parent);
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<EntryId> {
        &mut self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folders_sort_before_files() {
        assert_eq!(
            sibling_order((EntryKind::Folder, "zeta"), (EntryKind::File, "alpha")),
            Ordering::Less
        );
        assert_eq!(
            sibling_order((EntryKind::File, "alpha"), (EntryKind::Folder, "zeta")),
            Ordering::Greater
        );
    }

    #[test]
    fn same_kind_sorts_by_name_case_sensitively() {
        assert_eq!(
            sibling_order((EntryKind::File, "B.txt"), (EntryKind::File, "a.txt")),
            Ordering::Less
        );
        assert_eq!(
            sibling_order((EntryKind::Folder, "docs"), (EntryKind::Folder, "docs")),
            Ordering::Equal
        );
    }

    #[test]
    fn kind_parses_aliases() {
        assert_eq!("dir".parse::<EntryKind>(), Ok(EntryKind::Folder));
        assert_eq!("file".parse::<EntryKind>(), Ok(EntryKind::File));
        assert!("link".parse::<EntryKind>().is_err());
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&EntryKind::Folder).unwrap();
        assert_eq!(json, "\"folder\"");
    }
}
