//! Error types for commented trees and the dumper.

use thiserror::Error;

/// Result type alias for commented-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or dumping a commented tree.
///
/// Missing keys are never errors: reads vivify and comment lookups return
/// `None`. The only runtime failure during a dump is an unsupported value
/// reaching the renderer while `exception_on_invalid_type` is set.
/// Wrapping fails for scalars and for mappings whose keys cannot address a
/// slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A value the flow renderer has no literal form for.
    #[error("unable to dump value of unsupported type `{kind}`")]
    UnsupportedType { kind: &'static str },

    /// A scalar was given where a sequence or mapping is required.
    #[error("expected a sequence or mapping, found {kind}")]
    NotAContainer { kind: &'static str },

    /// A mapping key that is not a scalar, so it cannot address a slot.
    #[error("mapping key of type {kind} cannot address a slot")]
    UnsupportedKey { kind: &'static str },

    /// `push` on a tree whose largest integer key is already `i64::MAX`.
    #[error("no integer key is left after {last}")]
    IndexOverflow { last: i64 },
}
