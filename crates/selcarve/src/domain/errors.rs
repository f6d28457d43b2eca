//! Domain-specific errors.

use thiserror::Error;

/// Error returned when parsing a [`crate::domain::model::Region`] from
/// `BEGIN..END` syntax fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseRegionError {
    #[error("expected a range in BEGIN..END form, got '{0}'")]
    InvalidFormat(String),
    #[error("invalid character offset '{0}'")]
    InvalidOffset(String),
}
