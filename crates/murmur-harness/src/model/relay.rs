//! Model relay - the reference membership implementation.

use std::collections::{BTreeMap, BTreeSet};

use murmur_core::{Dispatcher, Environment};

use super::operation::{DECLINED_ROOM, DECLINED_USER, Operation, room_name, user_name};
use crate::RecordingAdapter;

/// Room name to the set of users present, for oracle comparison.
pub type ModelDirectory = BTreeMap<String, BTreeSet<String>>;

/// Reference implementation of room and user membership.
#[derive(Debug, Clone, Default)]
pub struct ModelRelay {
    rooms: ModelDirectory,
}

impl ModelRelay {
    /// Create a model with no rooms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current membership.
    pub fn directory(&self) -> &ModelDirectory {
        &self.rooms
    }

    /// Number of adapter handles a correct dispatcher holds right now.
    pub fn live_handles(&self) -> usize {
        self.rooms.len() + self.rooms.values().map(BTreeSet::len).sum::<usize>()
    }

    /// Apply an operation.
    pub fn apply(&mut self, op: &Operation) {
        match *op {
            Operation::SelfJoin { room } => {
                let room = room_name(room);
                if room != DECLINED_ROOM {
                    self.rooms.entry(room).or_default();
                }
            },
            Operation::SelfPart { room } => {
                self.rooms.remove(&room_name(room));
            },
            Operation::UserJoin { user, room } | Operation::ScopedMessage { user, room } => {
                let user = user_name(user);
                if let Some(users) = self.rooms.get_mut(&room_name(room)) {
                    if user != DECLINED_USER {
                        users.insert(user);
                    }
                }
            },
            Operation::UserPart { user, room } => {
                if let Some(users) = self.rooms.get_mut(&room_name(room)) {
                    users.remove(&user_name(user));
                }
            },
            Operation::RoomMessage { .. }
            | Operation::Rekey { .. }
            | Operation::Malformed { .. } => {},
        }
    }
}

/// Extract the real dispatcher's membership in model form.
pub fn observe<E: Environment>(dispatcher: &Dispatcher<RecordingAdapter, E>) -> ModelDirectory {
    dispatcher
        .directory()
        .rooms()
        .map(|room| {
            let users = room.users().map(|user| user.name().to_owned()).collect();
            (room.name().to_owned(), users)
        })
        .collect()
}
