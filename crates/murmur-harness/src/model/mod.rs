//! Reference model for model-based testing.
//!
//! The model captures room and user membership without any adapter
//! machinery. It serves as the oracle against which the real dispatcher is
//! verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Deterministic: Same inputs produce same outputs

mod operation;
mod relay;

pub use operation::{
    DECLINED_ROOM, DECLINED_USER, ModelRoom, ModelUser, Operation, ROOM_COUNT, SELF_NICK,
    USER_COUNT, room_name, user_name,
};
pub use relay::{ModelDirectory, ModelRelay, observe};
