//! Substring search over entry names, in depth-first (pre-order) or
//! breadth-first (level-order) result order.
//!
//! Both traversals are lazy iterators borrowing the tree, so the tree cannot
//! change while a search is in flight. Folders are tested like files and
//! their children are always visited, matching or not.

pub mod walk;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::models::{EntryId, EntryKind};
use crate::services::tree::TreeStore;
use walk::{LevelOrder, PreOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOrder {
    #[default]
    #[serde(rename = "dfs")]
    DepthFirst,
    #[serde(rename = "bfs")]
    BreadthFirst,
}

impl FromStr for SearchOrder {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "dfs" | "depth" => Ok(SearchOrder::DepthFirst),
            "bfs" | "breadth" => Ok(SearchOrder::BreadthFirst),
            other => Err(format!("unknown search order '{other}'")),
        }
    }
}

/// Where a search starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    Root,
    Current,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    #[serde(alias = "q")]
    pub query: String,
    pub order: SearchOrder,
    pub scope: SearchScope,
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    pub fn scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    #[serde(skip)]
    pub id: EntryId,
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
}

/// Adapts an entry walk into the hits whose name contains `query`.
pub struct Matches<'a, W> {
    tree: &'a TreeStore,
    walk: W,
    query: &'a str,
}

impl<W: Iterator<Item = EntryId>> Iterator for Matches<'_, W> {
    type Item = SearchHit;

    fn next(&mut self) -> Option<SearchHit> {
        for id in self.walk.by_ref() {
            let Ok(entry) = self.tree.get(id) else {
                continue;
            };
            if !entry.name().contains(self.query) {
                continue;
            }
            let Ok(path) = self.tree.full_path(id) else {
                continue;
            };
            return Some(SearchHit {
                id,
                path,
                name: entry.name().to_string(),
                kind: entry.kind(),
            });
        }
        None
    }
}

pub fn depth_first<'a>(
    tree: &'a TreeStore,
    start: EntryId,
    query: &'a str,
) -> Result<Matches<'a, PreOrder<'a>>> {
    tree.get(start)?;
    Ok(Matches {
        tree,
        walk: PreOrder::new(tree, start),
        query,
    })
}

pub fn breadth_first<'a>(
    tree: &'a TreeStore,
    start: EntryId,
    query: &'a str,
) -> Result<Matches<'a, LevelOrder<'a>>> {
    tree.get(start)?;
    Ok(Matches {
        tree,
        walk: LevelOrder::new(tree, start),
        query,
    })
}

/// Runs `query` from `start` in the given order, keeping at most `limit` hits.
pub fn collect(
    tree: &TreeStore,
    start: EntryId,
    query: &str,
    order: SearchOrder,
    limit: Option<usize>,
) -> Result<Vec<SearchHit>> {
    let limit = limit.unwrap_or(usize::MAX);
    let hits: Vec<SearchHit> = match order {
        SearchOrder::DepthFirst => depth_first(tree, start, query)?.take(limit).collect(),
        SearchOrder::BreadthFirst => breadth_first(tree, start, query)?.take(limit).collect(),
    };
    tracing::debug!(query, ?order, hits = hits.len(), "search finished");
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Result<TreeStore> {
        let mut tree = TreeStore::new("root")?;
        let root = tree.root();
        let docs = tree.create(root, "docs", EntryKind::Folder)?;
        tree.create(docs, "a.txt", EntryKind::File)?;
        tree.create(docs, "b.txt", EntryKind::File)?;
        let notes = tree.create(docs, "notes", EntryKind::Folder)?;
        tree.create(notes, "data.csv", EntryKind::File)?;
        tree.create(root, "readme.md", EntryKind::File)?;
        tree.create(root, "data", EntryKind::Folder)?;
        Ok(tree)
    }

    fn paths(hits: impl IntoIterator<Item = SearchHit>) -> Vec<String> {
        hits.into_iter().map(|hit| hit.path).collect()
    }

    #[test]
    fn finds_file_by_substring() -> Result<()> {
        let tree = sample()?;
        let hits: Vec<_> = depth_first(&tree, tree.root(), "a.t")?.collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "/docs/a.txt");
        assert_eq!(hits[0].kind, EntryKind::File);
        Ok(())
    }

    #[test]
    fn matching_folders_are_reported_and_descended() -> Result<()> {
        let tree = sample()?;
        assert_eq!(
            paths(depth_first(&tree, tree.root(), "data")?),
            ["/data", "/docs/notes/data.csv"]
        );
        Ok(())
    }

    #[test]
    fn dfs_is_pre_order_and_bfs_is_level_order() -> Result<()> {
        let tree = sample()?;
        let root = tree.root();
        assert_eq!(
            paths(depth_first(&tree, root, "a")?),
            ["/data", "/docs/notes/data.csv", "/docs/a.txt", "/readme.md"]
        );
        assert_eq!(
            paths(breadth_first(&tree, root, "a")?),
            ["/data", "/readme.md", "/docs/a.txt", "/docs/notes/data.csv"]
        );
        Ok(())
    }

    #[test]
    fn empty_query_matches_everything() -> Result<()> {
        let tree = sample()?;
        assert_eq!(depth_first(&tree, tree.root(), "")?.count(), tree.len());
        Ok(())
    }

    #[test]
    fn match_is_case_sensitive() -> Result<()> {
        let tree = sample()?;
        assert_eq!(depth_first(&tree, tree.root(), "README")?.count(), 0);
        Ok(())
    }

    #[test]
    fn collect_honours_limit_and_start() -> Result<()> {
        let tree = sample()?;
        let docs = tree.find_child(tree.root(), "docs")?;

        let hits = collect(&tree, tree.root(), "", SearchOrder::BreadthFirst, Some(2))?;
        assert_eq!(paths(hits), ["/", "/data"]);

        let hits = collect(&tree, docs, "data", SearchOrder::DepthFirst, None)?;
        assert_eq!(paths(hits), ["/docs/notes/data.csv"]);
        Ok(())
    }

    #[test]
    fn order_parses_short_names() {
        assert_eq!("bfs".parse::<SearchOrder>(), Ok(SearchOrder::BreadthFirst));
        assert_eq!("dfs".parse::<SearchOrder>(), Ok(SearchOrder::DepthFirst));
        assert!("random".parse::<SearchOrder>().is_err());
    }
}
