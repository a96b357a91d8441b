//! Error types for the graph data model and storage contract.

use thiserror::Error;

/// Result type for `ikg-core` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the storage contract (§4.1) and shared by every
/// crate that depends on `ikg-core`.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying storage backend failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A node referenced by id does not exist.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// An edge referenced by id does not exist.
    #[error("edge not found: {0}")]
    EdgeNotFound(String),

    /// A batch write was rejected because one of its entries was invalid.
    #[error("invalid write: {0}")]
    InvalidWrite(String),
}

impl Error {
    /// Build a [`Error::Storage`] from any displayable backend failure.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
