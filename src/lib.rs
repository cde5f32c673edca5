//! In-memory hierarchical file explorer.
//!
//! The tree store, navigator and search engine form the core; the session
//! ties them together, and the shell, renderer and HTTP API sit on top.

pub mod api;
pub mod core;
pub mod models;
pub mod services;
pub mod session;
pub mod shell;
pub mod ui;

pub use crate::core::config::ExplorerConfig;
pub use crate::core::errors::{Error, Result};
pub use crate::models::{Entry, EntryId, EntryKind};
pub use crate::services::search::{SearchHit, SearchOrder, SearchRequest, SearchScope};
pub use crate::services::tree::TreeStore;
pub use crate::session::{Session, SharedSession};
