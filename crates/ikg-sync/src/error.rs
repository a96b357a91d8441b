//! Error types for adapter discovery and sync reconciliation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] ikg_core::Error),

    /// An adapter's `discover` call raised an exception rather than reporting
    /// per-resource errors. Aborts the cycle; the sync record is finalized
    /// as `failed` rather than propagated further.
    #[error("adapter error for provider {provider}: {message}")]
    Adapter { provider: String, message: String },
}
