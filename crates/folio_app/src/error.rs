//! Error types for folio_app

use folio_motion::MotionError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or running a page
#[derive(Error, Debug)]
pub enum FolioError {
    /// Config file could not be read
    #[error("failed to read {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`PageConfig`](crate::PageConfig)
    #[error("failed to parse {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config values out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A region failed to mount
    #[error(transparent)]
    Motion(#[from] MotionError),

    /// The page is already loading or showing its content
    #[error("page is already mounted")]
    AlreadyMounted,

    /// The page was navigated away from
    #[error("page is closed")]
    Closed,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for FolioError {
    fn from(err: anyhow::Error) -> Self {
        FolioError::Other(err.to_string())
    }
}

/// Result type for folio_app operations
pub type Result<T> = std::result::Result<T, FolioError>;
