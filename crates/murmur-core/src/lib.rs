//! Murmur core
//!
//! Sans-IO state machine for a relay between an operator's terminal, a
//! line-oriented chat server, and an external secure messaging module.
//!
//! # Architecture
//!
//! ```text
//! remote line ──► Message::parse ──┐
//!                                  ├──► Dispatcher ──► Vec<Action>
//! local line ──► LocalCommand ─────┘        │
//!                                           ├── Directory (rooms, users)
//!                                           └── SecureMessaging (adapter)
//! ```
//!
//! # Components
//!
//! - [`Dispatcher`]: Top-level state machine, one event at a time
//! - [`Directory`]: Rooms we are in and the users present in each
//! - [`SecureMessaging`]: Contract with the external messaging module
//! - [`Keepalive`]: Probe and timeout decisions for a silent remote
//! - [`render_line`]: Local display format

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
pub mod adapter;
pub mod directory;
mod dispatcher;
pub mod env;
pub mod format;
mod keepalive;
mod local;

pub use action::Action;
pub use adapter::{Callbacks, SecureMessaging};
pub use directory::{Directory, Room, User};
pub use dispatcher::{DEFAULT_PART_REASON, DispatchEvent, Dispatcher, DispatcherConfig};
pub use env::Environment;
pub use format::render_line;
pub use keepalive::{
    DEFAULT_PROBE_INTERVAL, DEFAULT_TIMEOUT, Keepalive, KeepaliveAction, KeepaliveConfig,
};
pub use local::{COMMAND_MARKER, LocalCommand};
