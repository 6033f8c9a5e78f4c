use std::num::ParseFloatError;
use std::path::PathBuf;

use terragen_core::TerrainError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: value #{index} ({token:?}) is not a number", path.display())]
    Parse {
        path: PathBuf,
        index: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("{}: dump holds {actual} values, expected {expected}", path.display())]
    LengthMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}
