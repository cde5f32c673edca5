//! Text rendering of trees, search hits and listings. Read-only: nothing
//! here mutates the session.

use std::fmt::Write;

use crate::core::errors::Result;
use crate::models::{EntryId, EntryKind};
use crate::services::listing::ListResult;
use crate::services::search::SearchHit;
use crate::services::tree::{TreeStats, TreeStore};
use crate::ui::theme::Theme;

struct Frame {
    id: EntryId,
    prefix_len: usize,
    is_last: Option<bool>,
}

pub struct Renderer {
    theme: Theme,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn icon(&self, kind: EntryKind) -> &'static str {
        match kind {
            EntryKind::Folder => self.theme.folder_icon,
            EntryKind::File => self.theme.file_icon,
        }
    }

    /// Draws the subtree under `top`, marking `current` when it is a folder
    /// inside it. Walks with an explicit stack and one shared prefix buffer,
    /// so depth is bounded by memory rather than the call stack.
    pub fn tree(&self, tree: &TreeStore, top: EntryId, current: EntryId) -> Result<String> {
        let mut out = String::new();
        let mut prefix = String::new();
        let mut pending = vec![Frame {
            id: top,
            prefix_len: 0,
            is_last: None,
        }];

        while let Some(frame) = pending.pop() {
            // Everything visited since this frame was pushed lies under its
            // parent, so the parent's prefix is still intact below prefix_len.
            prefix.truncate(frame.prefix_len);
            let entry = tree.get(frame.id)?;
            let connector = match frame.is_last {
                None => "",
                Some(true) => self.theme.last_branch,
                Some(false) => self.theme.branch,
            };
            let marker = if frame.id == current && entry.is_folder() {
                self.theme.current_marker
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "{prefix}{connector}{} {}{marker}",
                self.icon(entry.kind()),
                entry.name()
            );

            match frame.is_last {
                None => {}
                Some(true) => prefix.push_str(self.theme.blank),
                Some(false) => prefix.push_str(self.theme.pipe),
            }
            let children = entry.children();
            let prefix_len = prefix.len();
            pending.extend(children.iter().enumerate().rev().map(|(i, &child)| Frame {
                id: child,
                prefix_len,
                is_last: Some(i + 1 == children.len()),
            }));
        }
        Ok(out)
    }

    pub fn hits(&self, query: &str, hits: &[SearchHit]) -> String {
        if hits.is_empty() {
            return format!("No entries matching '{query}'.\n");
        }
        let mut out = String::new();
        for hit in hits {
            let _ = writeln!(out, "  {} {}", self.icon(hit.kind), hit.path);
        }
        let _ = writeln!(out, "{} match(es) for '{query}'.", hits.len());
        out
    }

    pub fn listing(&self, listing: &ListResult) -> String {
        if listing.entries.is_empty() {
            return "(empty)\n".to_string();
        }
        let mut out = String::new();
        for entry in &listing.entries {
            let suffix = match entry.kind {
                EntryKind::Folder => format!("/  ({} item(s))", entry.children),
                EntryKind::File => String::new(),
            };
            let _ = writeln!(out, "  {} {}{suffix}", self.icon(entry.kind), entry.name);
        }
        if let Some(cursor) = &listing.next_cursor {
            let _ = writeln!(out, "  ... more (ls <limit> {cursor})");
        }
        out
    }

    pub fn stats(&self, stats: &TreeStats) -> String {
        format!(
            "{} folder(s), {} file(s), depth {}\n",
            stats.folders, stats.files, stats.depth
        )
    }

    pub fn success(&self, message: &str) -> String {
        format!("{} {message}\n", self.theme.ok)
    }

    pub fn failure(&self, message: &str) -> String {
        format!("{} {message}\n", self.theme.error)
    }

    pub fn banner(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "========================================");
        let _ = writeln!(out, "   TREEX - in-memory file explorer");
        let _ = writeln!(out, "========================================");
        let _ = writeln!(out, "Type 'help' for commands, 'exit' to quit.");
        out
    }
}
