//! Test harness for the murmur dispatcher.
//!
//! - [`RecordingAdapter`]: secure messaging double that logs every call and
//!   checks each handle is released exactly once
//! - [`ManualEnv`]: environment whose clock only moves when told to
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation of room and user
//! membership. Operations are applied to both the model and a real
//! dispatcher, and their observable directories are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod manual_env;
pub mod model;
pub mod recording;

pub use manual_env::{ManualEnv, ManualInstant};
pub use model::{
    DECLINED_ROOM, DECLINED_USER, ModelDirectory, ModelRelay, Operation, SELF_NICK, observe,
};
pub use recording::{AdapterCall, HandleId, RecordingAdapter, RoomHandle, UserHandle};
