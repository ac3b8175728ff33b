//! Murmur wire protocol.
//!
//! Line-oriented chat protocol primitives shared by the dispatcher and the
//! client binary:
//!
//! - [`Message`]: zero-copy view of one inbound protocol line
//! - [`Command`]: typed builder for one outbound protocol line
//!
//! # Line grammar
//!
//! ```text
//! [':' sender ['!' suffix] ' '] command {' ' param} [' ' ':' trailing]
//! ```
//!
//! The trailing segment is kept verbatim, embedded whitespace included.
//! A carriage return before the newline is not part of the line.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod error;
mod message;

pub use command::Command;
pub use error::ParseError;
pub use message::Message;

/// Marks the start of a sender prefix at the beginning of a line.
pub const PREFIX_MARKER: char = ':';

/// Marks the parameter that starts the free-text trailing segment.
pub const TRAILING_MARKER: char = ':';

/// Separates a sender's nickname from the rest of its identity.
pub const IDENTITY_DELIMITER: char = '!';

/// First character of every room (channel) name.
pub const ROOM_MARKER: char = '#';

/// Maximum length of one protocol line in bytes, line feed excluded.
pub const MAX_LINE_LEN: usize = 4096;

/// Returns true if `target` names a room rather than a single identity.
pub fn is_room(target: &str) -> bool {
    target.starts_with(ROOM_MARKER)
}
