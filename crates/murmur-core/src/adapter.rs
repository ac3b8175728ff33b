//! Secure messaging adapter contract.
//!
//! The relay never touches key material. Everything cryptographic lives
//! behind [`SecureMessaging`], an opaque module that hands out session
//! handles and talks back through [`Callbacks`].
//!
//! # Handles
//!
//! Handles are owned by the directory entry that received them. Release
//! operations take the handle by value, so a handle can be given back to the
//! adapter at most once. Every other operation borrows it.
//!
//! # Callbacks
//!
//! Every operation receives the dispatcher's callbacks for the duration of
//! the call. The adapter may invoke them any number of times before
//! returning and must not keep them afterwards. All calls are synchronous.

/// Callbacks the secure messaging module uses to reach the wire and the
/// operator.
pub trait Callbacks {
    /// Emit `message` to everyone in `room`.
    fn send_room(&mut self, room: &str, message: &str);

    /// Emit `message` privately to `user`, scoped to `room`.
    fn send_user(&mut self, room: &str, user: &str, message: &str);

    /// Render a message from `user` in `room` for local display.
    fn receive_user(&mut self, room: &str, user: &str, message: &str);
}

/// External secure multi-party messaging module.
///
/// Returning `None` from a constructor means the module declined; the caller
/// records nothing and reports nothing to the wire.
pub trait SecureMessaging {
    /// Room-level session handle.
    type Room;

    /// Per-room user session handle.
    type User;

    /// Create a room-level session for `room`.
    fn join_room(&mut self, room: &str, callbacks: &mut dyn Callbacks) -> Option<Self::Room>;

    /// Release a room-level session.
    fn leave_room(&mut self, room: Self::Room, callbacks: &mut dyn Callbacks);

    /// Refresh the room's shared key material.
    fn rekey_room(&mut self, room: &mut Self::Room, callbacks: &mut dyn Callbacks);

    /// Register a newly observed remote identity in a room.
    fn user_joined(
        &mut self,
        room: &mut Self::Room,
        user: &str,
        callbacks: &mut dyn Callbacks,
    ) -> Option<Self::User>;

    /// Release a per-user session.
    fn user_left(&mut self, room: &mut Self::Room, user: Self::User, callbacks: &mut dyn Callbacks);

    /// Deliver inbound room-broadcast text.
    fn receive(&mut self, room: &mut Self::Room, text: &str, callbacks: &mut dyn Callbacks);

    /// Deliver inbound text attributed to `user_name`.
    ///
    /// With `user == None` the sender is not yet registered in the room and a
    /// returned handle registers them, exactly as [`Self::user_joined`] would.
    /// For a registered sender the return value is ignored.
    fn receive_user(
        &mut self,
        room: &mut Self::Room,
        user: Option<&mut Self::User>,
        user_name: &str,
        text: &str,
        callbacks: &mut dyn Callbacks,
    ) -> Option<Self::User>;

    /// Transmit outgoing room text.
    fn send(&mut self, room: &mut Self::Room, text: &str, callbacks: &mut dyn Callbacks);
}
