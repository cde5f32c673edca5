use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("'{0}' is not a directory")]
    NotADirectory(String),
    #[error("a file or folder named '{0}' already exists")]
    NameCollision(String),
    #[error("'{0}' not found")]
    NotFound(String),
    #[error("cannot delete the root directory")]
    CannotDeleteRoot,
    #[error("cannot delete the current directory, navigate to its parent first")]
    CannotDeleteCurrent,
    #[error("cannot delete '{0}': it is an ancestor of the current directory")]
    CannotDeleteAncestorOfCurrent(String),
    #[error("cannot move the root directory")]
    CannotMoveRoot,
    #[error("destination '{0}' is not a directory")]
    DestinationNotDirectory(String),
    #[error("cannot move '{0}' into itself or one of its descendants")]
    CyclicMove(String),
    #[error("already at the root directory")]
    AlreadyAtRoot,
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("entry limit reached ({0} slots allocated)")]
    CapacityExceeded(usize),
    #[error("usage: {0}")]
    Usage(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("other error: {0}")]
    Other(String),
}

impl Error {
    /// Stable machine-readable kind, used by the HTTP API.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotADirectory(_) => "not_a_directory",
            Error::NameCollision(_) => "name_collision",
            Error::NotFound(_) => "not_found",
            Error::CannotDeleteRoot => "cannot_delete_root",
            Error::CannotDeleteCurrent => "cannot_delete_current",
            Error::CannotDeleteAncestorOfCurrent(_) => "cannot_delete_ancestor_of_current",
            Error::CannotMoveRoot => "cannot_move_root",
            Error::DestinationNotDirectory(_) => "destination_not_directory",
            Error::CyclicMove(_) => "cyclic_move",
            Error::AlreadyAtRoot => "already_at_root",
            Error::InvalidName { .. } => "invalid_name",
            Error::CapacityExceeded(_) => "capacity_exceeded",
            Error::Usage(_) => "usage",
            Error::Io(_) => "io",
            Error::Config(_) => "config",
            Error::Other(_) => "other",
        }
    }
}
