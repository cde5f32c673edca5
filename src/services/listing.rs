use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use crate::core::errors::{Error, Result};
use crate::models::{EntryId, EntryKind};
use crate::services::tree::TreeStore;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct EntryDto {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub children: usize,
    pub created: String,
}

pub struct ListParams<'a> {
    pub limit: usize,
    pub cursor: Option<&'a str>,
}

impl Default for ListParams<'_> {
    fn default() -> Self {
        Self {
            limit: usize::MAX,
            cursor: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResult {
    pub entries: Vec<EntryDto>,
    pub next_cursor: Option<String>,
}

/// One entry of a subtree snapshot. Rows come in pre-order; `depth` is
/// relative to the snapshot's top entry.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TreeRowDto {
    pub name: String,
    pub kind: EntryKind,
    pub depth: usize,
    pub children: usize,
}

pub fn describe(tree: &TreeStore, id: EntryId) -> Result<EntryDto> {
    let entry = tree.get(id)?;
    Ok(EntryDto {
        name: entry.name().to_string(),
        path: tree.full_path(id)?,
        kind: entry.kind(),
        children: entry.children().len(),
        created: entry
            .created_at()
            .format(&Rfc3339)
            .map_err(|e| Error::Other(format!("failed to format timestamp: {e}")))?,
    })
}

/// Lists the children of `folder` in sibling order. The cursor is the
/// offset of the first entry to return.
pub fn list_dir(tree: &TreeStore, folder: EntryId, params: ListParams<'_>) -> Result<ListResult> {
    let entry = tree.get(folder)?;
    if entry.is_file() {
        return Err(Error::NotADirectory(entry.name().to_string()));
    }
    let children = entry.children();

    let total = children.len();
    let offset = match params.cursor {
        Some(cursor) => cursor
            .parse::<usize>()
            .map_err(|_| Error::Usage(format!("invalid cursor '{cursor}'")))?,
        None => 0,
    }
    .min(total);
    let end = offset.saturating_add(params.limit).min(total);

    let entries = children[offset..end]
        .iter()
        .map(|&child| describe(tree, child))
        .collect::<Result<Vec<_>>>()?;

    let next_cursor = if end < total {
        Some(end.to_string())
    } else {
        None
    };

    Ok(ListResult {
        entries,
        next_cursor,
    })
}

/// Flat pre-order copy of the subtree under `id`. Built with an explicit
/// stack, so arbitrarily deep trees never grow the call stack.
pub fn snapshot(tree: &TreeStore, id: EntryId) -> Result<Vec<TreeRowDto>> {
    let mut rows = Vec::new();
    let mut pending = vec![(id, 0usize)];
    while let Some((next, depth)) = pending.pop() {
        let entry = tree.get(next)?;
        rows.push(TreeRowDto {
            name: entry.name().to_string(),
            kind: entry.kind(),
            depth,
            children: entry.children().len(),
        });
        pending.extend(entry.children().iter().rev().map(|&c| (c, depth + 1)));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Result<TreeStore> {
        let mut tree = TreeStore::new("root")?;
        let root = tree.root();
        let docs = tree.create(root, "docs", EntryKind::Folder)?;
        tree.create(docs, "a.txt", EntryKind::File)?;
        tree.create(root, "src", EntryKind::Folder)?;
        tree.create(root, "readme.md", EntryKind::File)?;
        tree.create(root, "LICENSE", EntryKind::File)?;
        Ok(tree)
    }

    #[test]
    fn lists_in_sibling_order_with_paging() -> Result<()> {
        let tree = sample()?;
        let first = list_dir(
            &tree,
            tree.root(),
            ListParams {
                limit: 3,
                cursor: None,
            },
        )?;
        let names: Vec<_> = first.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["docs", "src", "LICENSE"]);
        assert_eq!(first.entries[0].children, 1);
        assert_eq!(first.entries[0].path, "/docs");
        assert_eq!(first.next_cursor.as_deref(), Some("3"));

        let rest = list_dir(
            &tree,
            tree.root(),
            ListParams {
                limit: 3,
                cursor: first.next_cursor.as_deref(),
            },
        )?;
        assert_eq!(rest.entries.len(), 1);
        assert_eq!(rest.entries[0].name, "readme.md");
        assert!(rest.next_cursor.is_none());
        Ok(())
    }

    #[test]
    fn listing_a_file_fails() -> Result<()> {
        let tree = sample()?;
        let readme = tree.find_child(tree.root(), "readme.md")?;
        let result = list_dir(&tree, readme, ListParams::default());
        assert!(matches!(result, Err(Error::NotADirectory(_))));
        Ok(())
    }

    #[test]
    fn cursor_past_end_yields_empty_page() -> Result<()> {
        let tree = sample()?;
        let page = list_dir(
            &tree,
            tree.root(),
            ListParams {
                limit: 10,
                cursor: Some("99"),
            },
        )?;
        assert!(page.entries.is_empty());
        assert!(page.next_cursor.is_none());
        Ok(())
    }

    #[test]
    fn snapshot_rows_follow_pre_order() -> Result<()> {
        let tree = sample()?;
        let rows = snapshot(&tree, tree.root())?;
        let shape: Vec<_> = rows.iter().map(|r| (r.name.as_str(), r.depth)).collect();
        assert_eq!(
            shape,
            [
                ("root", 0),
                ("docs", 1),
                ("a.txt", 2),
                ("src", 1),
                ("LICENSE", 1),
                ("readme.md", 1)
            ]
        );

        let json = serde_json::to_value(&rows)?;
        assert_eq!(json[0]["children"], 4);
        assert_eq!(json[2]["kind"], "file");
        Ok(())
    }

    #[test]
    fn cursor_must_be_an_offset() -> Result<()> {
        let tree = sample()?;
        let result = list_dir(
            &tree,
            tree.root(),
            ListParams {
                limit: 2,
                cursor: Some("abc"),
            },
        );
        assert!(matches!(result, Err(Error::Usage(_))));
        Ok(())
    }
}
