// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player errors.

use shapeplay_graph::{DocumentError, SessionError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can stop the player
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// The config file is not valid RON
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),
    /// The config could not be serialized
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] ron::Error),
    /// The config was written by a newer player
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
    /// The graph document failed to load or save
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// The play session refused a request
    #[error(transparent)]
    Session(#[from] SessionError),
    /// No node has the configured play target name
    #[error("No game, scene or object named '{0}'")]
    TargetNotFound(String),
    /// The JSON report could not be written
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

impl PlayerError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
