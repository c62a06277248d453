//! Core error type.
//!
//! Sub-crates define their own error enums and convert `HsError` into them
//! via `From` impls.

use thiserror::Error;

use crate::OrderId;

/// The error type for `hs-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HsError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0} does not encode a (patient, order kind) pair")]
    InvalidOrderId(OrderId),
}

/// Shorthand result type for all `hs-*` crates.
pub type HsResult<T> = Result<T, HsError>;
