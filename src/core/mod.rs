pub mod config;
pub mod errors;
pub mod telemetry;

pub use config::ExplorerConfig;
pub use errors::{Error, Result};
