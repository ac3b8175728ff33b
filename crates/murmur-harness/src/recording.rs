//! Recording secure messaging double.
//!
//! Hands out numbered handles (the first one is `1`), logs every call, and
//! keeps the set of handles not yet released. Handles are not `Clone`, so the
//! only way to release one twice would be a bug in the double itself.

use std::collections::{BTreeSet, HashSet};

use murmur_core::{Callbacks, SecureMessaging};

/// Numeric identity of a handle.
pub type HandleId = u64;

/// Room session handle.
#[derive(Debug, PartialEq, Eq)]
pub struct RoomHandle {
    /// Handle number.
    pub id: HandleId,
    /// Room the session belongs to.
    pub name: String,
}

/// Per-room user session handle.
#[derive(Debug, PartialEq, Eq)]
pub struct UserHandle {
    /// Handle number.
    pub id: HandleId,
    /// User the session belongs to.
    pub name: String,
}

/// One call made to the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCall {
    /// `join_room`, with the handle granted if any.
    JoinRoom {
        /// Requested room.
        room: String,
        /// Granted handle.
        granted: Option<HandleId>,
    },
    /// `leave_room`.
    LeaveRoom {
        /// Released room handle.
        room: HandleId,
    },
    /// `rekey_room`.
    RekeyRoom {
        /// Room handle.
        room: HandleId,
    },
    /// `user_joined`, with the handle granted if any.
    UserJoined {
        /// Room handle.
        room: HandleId,
        /// Joining user.
        user: String,
        /// Granted handle.
        granted: Option<HandleId>,
    },
    /// `user_left`.
    UserLeft {
        /// Room handle.
        room: HandleId,
        /// Released user handle.
        user: HandleId,
    },
    /// `receive`.
    Receive {
        /// Room handle.
        room: HandleId,
        /// Delivered text.
        text: String,
    },
    /// `receive_user`, with the handle granted if any.
    ReceiveUser {
        /// Room handle.
        room: HandleId,
        /// Existing user handle.
        user: Option<HandleId>,
        /// Sender name.
        user_name: String,
        /// Delivered text.
        text: String,
        /// Granted handle for a previously unknown sender.
        granted: Option<HandleId>,
    },
    /// `send`.
    Send {
        /// Room handle.
        room: HandleId,
        /// Outgoing text.
        text: String,
    },
}

/// Secure messaging double.
///
/// - `send` emits the text unchanged through `send_room`
/// - `receive` displays the text attributed to `*`
/// - `receive_user` displays the text if the sender is known or accepted
/// - Rooms and users can be configured to be declined
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    next_id: HandleId,
    calls: Vec<AdapterCall>,
    live: BTreeSet<HandleId>,
    double_releases: Vec<HandleId>,
    declined_rooms: HashSet<String>,
    declined_users: HashSet<String>,
}

impl RecordingAdapter {
    /// Create a double that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decline every future `join_room` for `room`.
    #[must_use]
    pub fn declining_room(mut self, room: &str) -> Self {
        self.declined_rooms.insert(room.to_owned());
        self
    }

    /// Decline every future registration of `user`, in any room.
    #[must_use]
    pub fn declining_user(mut self, user: &str) -> Self {
        self.declined_users.insert(user.to_owned());
        self
    }

    /// Every call so far, oldest first.
    pub fn calls(&self) -> &[AdapterCall] {
        &self.calls
    }

    /// Handles granted and not yet released.
    pub fn live_handles(&self) -> &BTreeSet<HandleId> {
        &self.live
    }

    /// Check if `id` was granted and not yet released.
    pub fn is_live(&self, id: HandleId) -> bool {
        self.live.contains(&id)
    }

    /// Handles released more than once. Always empty for a correct caller.
    pub fn double_releases(&self) -> &[HandleId] {
        &self.double_releases
    }

    /// Number of times `id` was released.
    pub fn releases_of(&self, id: HandleId) -> usize {
        self.calls
            .iter()
            .filter(|call| match call {
                AdapterCall::LeaveRoom { room } => *room == id,
                AdapterCall::UserLeft { user, .. } => *user == id,
                _ => false,
            })
            .count()
    }

    fn grant(&mut self) -> HandleId {
        self.next_id += 1;
        self.live.insert(self.next_id);
        self.next_id
    }

    fn release(&mut self, id: HandleId) {
        if !self.live.remove(&id) {
            self.double_releases.push(id);
        }
    }

    fn register_user(&mut self, user: &str) -> Option<UserHandle> {
        if self.declined_users.contains(user) {
            return None;
        }
        Some(UserHandle { id: self.grant(), name: user.to_owned() })
    }
}

impl SecureMessaging for RecordingAdapter {
    type Room = RoomHandle;
    type User = UserHandle;

    fn join_room(&mut self, room: &str, _callbacks: &mut dyn Callbacks) -> Option<RoomHandle> {
        let handle = if self.declined_rooms.contains(room) {
            None
        } else {
            Some(RoomHandle { id: self.grant(), name: room.to_owned() })
        };
        self.calls.push(AdapterCall::JoinRoom {
            room: room.to_owned(),
            granted: handle.as_ref().map(|h| h.id),
        });
        handle
    }

    fn leave_room(&mut self, room: RoomHandle, _callbacks: &mut dyn Callbacks) {
        self.calls.push(AdapterCall::LeaveRoom { room: room.id });
        self.release(room.id);
    }

    fn rekey_room(&mut self, room: &mut RoomHandle, _callbacks: &mut dyn Callbacks) {
        self.calls.push(AdapterCall::RekeyRoom { room: room.id });
    }

    fn user_joined(
        &mut self,
        room: &mut RoomHandle,
        user: &str,
        _callbacks: &mut dyn Callbacks,
    ) -> Option<UserHandle> {
        let handle = self.register_user(user);
        self.calls.push(AdapterCall::UserJoined {
            room: room.id,
            user: user.to_owned(),
            granted: handle.as_ref().map(|h| h.id),
        });
        handle
    }

    fn user_left(
        &mut self,
        room: &mut RoomHandle,
        user: UserHandle,
        _callbacks: &mut dyn Callbacks,
    ) {
        self.calls.push(AdapterCall::UserLeft { room: room.id, user: user.id });
        self.release(user.id);
    }

    fn receive(&mut self, room: &mut RoomHandle, text: &str, callbacks: &mut dyn Callbacks) {
        self.calls.push(AdapterCall::Receive { room: room.id, text: text.to_owned() });
        callbacks.receive_user(&room.name, "*", text);
    }

    fn receive_user(
        &mut self,
        room: &mut RoomHandle,
        user: Option<&mut UserHandle>,
        user_name: &str,
        text: &str,
        callbacks: &mut dyn Callbacks,
    ) -> Option<UserHandle> {
        let existing = user.map(|u| u.id);
        let granted = match existing {
            Some(_) => None,
            None => self.register_user(user_name),
        };
        self.calls.push(AdapterCall::ReceiveUser {
            room: room.id,
            user: existing,
            user_name: user_name.to_owned(),
            text: text.to_owned(),
            granted: granted.as_ref().map(|h| h.id),
        });

        if existing.is_some() || granted.is_some() {
            callbacks.receive_user(&room.name, user_name, text);
        }
        granted
    }

    fn send(&mut self, room: &mut RoomHandle, text: &str, callbacks: &mut dyn Callbacks) {
        self.calls.push(AdapterCall::Send { room: room.id, text: text.to_owned() });
        callbacks.send_room(&room.name, text);
    }
}
