pub mod entry;

pub use entry::{sibling_order, Entry, EntryId, EntryKind};
