//! Cleartext messaging module.
//!
//! Stands in for a real secure messaging module so the client can run
//! against any server. Room text goes out unchanged and incoming text is
//! shown as-is. Handles are just names.

use murmur_core::{Callbacks, SecureMessaging};

/// Sender shown for room text whose author the module cannot tell.
pub const UNATTRIBUTED: &str = "*";

/// Messaging module that applies no protection.
#[derive(Debug, Default, Clone, Copy)]
pub struct CleartextAdapter;

impl CleartextAdapter {
    /// Create the module.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SecureMessaging for CleartextAdapter {
    type Room = String;
    type User = String;

    fn join_room(&mut self, room: &str, _callbacks: &mut dyn Callbacks) -> Option<String> {
        tracing::info!(room, "cleartext session opened");
        Some(room.to_owned())
    }

    fn leave_room(&mut self, room: String, _callbacks: &mut dyn Callbacks) {
        tracing::debug!(%room, "cleartext session closed");
    }

    fn rekey_room(&mut self, room: &mut String, _callbacks: &mut dyn Callbacks) {
        tracing::info!(%room, "rekey requested; cleartext sessions hold no keys");
    }

    fn user_joined(
        &mut self,
        room: &mut String,
        user: &str,
        _callbacks: &mut dyn Callbacks,
    ) -> Option<String> {
        tracing::debug!(%room, user, "user registered");
        Some(user.to_owned())
    }

    fn user_left(&mut self, room: &mut String, user: String, _callbacks: &mut dyn Callbacks) {
        tracing::debug!(%room, %user, "user released");
    }

    fn receive(&mut self, room: &mut String, text: &str, callbacks: &mut dyn Callbacks) {
        callbacks.receive_user(room, UNATTRIBUTED, text);
    }

    fn receive_user(
        &mut self,
        room: &mut String,
        user: Option<&mut String>,
        user_name: &str,
        text: &str,
        callbacks: &mut dyn Callbacks,
    ) -> Option<String> {
        callbacks.receive_user(room, user_name, text);
        match user {
            Some(_) => None,
            None => Some(user_name.to_owned()),
        }
    }

    fn send(&mut self, room: &mut String, text: &str, callbacks: &mut dyn Callbacks) {
        callbacks.send_room(room, text);
    }
}
