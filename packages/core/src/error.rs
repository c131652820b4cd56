//! Errors raised while shaping a resource.

use thiserror::Error;

/// A resource could not be turned into an [`AttributeMap`](crate::AttributeMap).
///
/// These are programming errors in a transformer, not user input problems;
/// integrations report them as a 500 error envelope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// The transformer lists an include it has no implementation for.
    #[error("transformer declares include {0:?} but does not implement it")]
    UnknownInclude(String),
}
