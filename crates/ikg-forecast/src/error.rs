//! Error type for the forecast crate.
//!
//! Per `spec.md` §7, insufficient forecast data is not an error: it is
//! encoded in the returned forecast (flat at last value, zero confidence).
//! This `Error` only covers the one operational failure mode this crate
//! has, reading the graph for top cost drivers.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] ikg_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
