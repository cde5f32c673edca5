//! One explorer session: a tree, the navigator's location inside it, and the
//! settings both were built from. Callers pass the session explicitly; there
//! is no process-wide state.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::config::ExplorerConfig;
use crate::core::errors::{Error, Result};
use crate::models::{EntryId, EntryKind};
use crate::services::listing::{self, EntryDto, ListParams, ListResult};
use crate::services::navigator::Navigator;
use crate::services::search::{self, SearchHit, SearchRequest, SearchScope};
use crate::services::tree::{Removed, TreeStats, TreeStore};

pub struct Session {
    tree: TreeStore,
    navigator: Navigator,
    config: ExplorerConfig,
}

impl Session {
    /// Fails only if the configured root cannot be created.
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        let tree = TreeStore::from_config(&config)?;
        let navigator = Navigator::new(&tree);
        tracing::info!(root = %config.root_name, "session started");
        Ok(Self {
            tree,
            navigator,
            config,
        })
    }

    pub fn tree(&self) -> &TreeStore {
        &self.tree
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn current(&self) -> EntryId {
        self.navigator.current()
    }

    pub fn current_path(&self) -> Result<String> {
        self.tree.full_path(self.current())
    }

    /// Resolves `path` relative to the current folder.
    pub fn resolve(&self, path: &str) -> Result<EntryId> {
        self.tree.resolve(self.current(), path)
    }

    pub fn create(&mut self, name: &str, kind: EntryKind) -> Result<EntryId> {
        self.tree
            .create(self.navigator.current(), name, kind)
            .inspect_err(|e| tracing::debug!(name, error = %e, "create rejected"))
    }

    pub fn create_folder(&mut self, name: &str) -> Result<EntryId> {
        self.create(name, EntryKind::Folder)
    }

    pub fn create_file(&mut self, name: &str) -> Result<EntryId> {
        self.create(name, EntryKind::File)
    }

    pub fn remove(&mut self, path: &str) -> Result<Removed> {
        let target = self.resolve(path)?;
        self.tree
            .remove(target, self.navigator.current())
            .inspect_err(|e| tracing::debug!(path, error = %e, "remove rejected"))
    }

    /// Moves `source` into the folder `destination`; returns the destination.
    pub fn move_entry(&mut self, source: &str, destination: &str) -> Result<EntryId> {
        let source_id = self.resolve(source)?;
        let destination_id = match self.resolve(destination) {
            Ok(id) => id,
            // A file where a folder was expected reads better as a destination problem.
            Err(Error::NotADirectory(name)) => return Err(Error::DestinationNotDirectory(name)),
            Err(e) => return Err(e),
        };
        self.tree
            .move_entry(source_id, destination_id)
            .inspect_err(|e| tracing::debug!(source, destination, error = %e, "move rejected"))?;
        Ok(destination_id)
    }

    pub fn change_directory(&mut self, target: &str) -> Result<EntryId> {
        self.navigator
            .change_directory(&self.tree, target)
            .inspect_err(|e| tracing::debug!(path = target, error = %e, "cd rejected"))
    }

    pub fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let start = match request.scope {
            SearchScope::Root => self.tree.root(),
            SearchScope::Current => self.current(),
        };
        let limit = request.limit.or(self.config.search_limit);
        search::collect(&self.tree, start, &request.query, request.order, limit)
    }

    /// Lists `path` (the current folder when `None`).
    pub fn list(&self, path: Option<&str>, params: ListParams<'_>) -> Result<ListResult> {
        let folder = match path {
            Some(path) => self.resolve(path)?,
            None => self.current(),
        };
        listing::list_dir(&self.tree, folder, params)
    }

    pub fn describe(&self, path: Option<&str>) -> Result<EntryDto> {
        let id = match path {
            Some(path) => self.resolve(path)?,
            None => self.current(),
        };
        listing::describe(&self.tree, id)
    }

    pub fn stats(&self) -> Result<TreeStats> {
        self.tree.stats(self.tree.root())
    }
}

/// A session shared between callers. One lock guards every operation, so
/// each one observes and leaves the tree in a consistent state.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Session>> {
        self.inner
            .lock()
            .map_err(|_| Error::Other("session lock poisoned".to_string()))
    }
}
