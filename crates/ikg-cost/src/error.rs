//! Error types for cost attribution.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] ikg_core::Error),
}
