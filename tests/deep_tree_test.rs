use std::thread;

use anyhow::Result;
use treex::services::listing;
use treex::ui::{Renderer, Theme};
use treex::{EntryId, EntryKind, TreeStore};

fn chain(depth: usize) -> Result<(TreeStore, EntryId)> {
    let mut tree = TreeStore::new("root")?;
    let mut bottom = tree.root();
    for _ in 0..depth {
        bottom = tree.create(bottom, "d", EntryKind::Folder)?;
    }
    Ok((tree, bottom))
}

fn on_small_stack<T: Send + 'static>(
    stack_size: usize,
    work: impl FnOnce() -> Result<T> + Send + 'static,
) -> Result<T> {
    thread::Builder::new()
        .stack_size(stack_size)
        .spawn(work)?
        .join()
        .map_err(|_| anyhow::anyhow!("worker panicked"))?
}

#[test]
fn snapshot_of_very_deep_tree_fits_small_stack() -> Result<()> {
    let rows = on_small_stack(2 * 1024 * 1024, || {
        let (tree, _) = chain(10_000)?;
        let rows = listing::snapshot(&tree, tree.root())?;
        let json = serde_json::to_string(&rows)?;
        assert!(json.starts_with(r#"[{"name":"root""#));
        Ok(rows)
    })?;

    assert_eq!(rows.len(), 10_001);
    assert_eq!(rows.last().map(|r| r.depth), Some(10_000));
    assert_eq!(rows.last().map(|r| r.children), Some(0));
    Ok(())
}

#[test]
fn rendering_very_deep_tree_fits_small_stack() -> Result<()> {
    let text = on_small_stack(256 * 1024, || {
        let (tree, bottom) = chain(3_000)?;
        Ok(Renderer::new(Theme::PLAIN).tree(&tree, tree.root(), bottom)?)
    })?;

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3_001);
    assert_eq!(lines[1], "`-- [D] d");
    let last = format!("{}`-- [D] d [Current]", "    ".repeat(2_999));
    assert_eq!(lines[3_000], last);
    Ok(())
}
