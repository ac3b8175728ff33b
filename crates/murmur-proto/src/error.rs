//! Parse errors.

use thiserror::Error;

/// Reasons a protocol line carries nothing to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line is empty once the terminator is stripped.
    #[error("empty line")]
    Empty,

    /// The line has a sender prefix but no command token.
    #[error("missing command")]
    MissingCommand,
}
