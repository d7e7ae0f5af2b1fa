//! Errors that stop a harvest before or while it runs.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::download::EngineError;

/// Startup and engine failures. Per-item failures are logged, never returned.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The configuration did not validate.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The API client could not be built.
    #[error("failed to initialize API client: {0}")]
    Api(#[source] ApiError),

    /// The output directory could not be created.
    #[error("failed to create output directory '{path}': {source}")]
    OutputDir {
        /// Directory path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The download engine rejected its settings or lost its semaphore.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
