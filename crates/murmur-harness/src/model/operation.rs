//! Operations for model-based testing.
//!
//! Operations are generated randomly and turned into the protocol or
//! operator lines that would cause them.

use arbitrary::Arbitrary;

/// Room index; mapped onto a small set of room names.
pub type ModelRoom = u8;

/// User index; mapped onto a small set of nicknames.
pub type ModelUser = u8;

/// Number of distinct room names.
pub const ROOM_COUNT: u8 = 4;

/// Number of distinct remote nicknames.
pub const USER_COUNT: u8 = 4;

/// Our nickname.
pub const SELF_NICK: &str = "me";

/// Room the adapter is configured to decline.
pub const DECLINED_ROOM: &str = "#r3";

/// User the adapter is configured to decline.
pub const DECLINED_USER: &str = "u3";

/// Name of room `index`.
pub fn room_name(index: ModelRoom) -> String {
    format!("#r{}", index % ROOM_COUNT)
}

/// Nickname of user `index`.
pub fn user_name(index: ModelUser) -> String {
    format!("u{}", index % USER_COUNT)
}

/// Something that can happen to the relay.
#[derive(Debug, Clone, Copy, Arbitrary)]
pub enum Operation {
    /// Server confirms we joined a room.
    SelfJoin {
        /// Room joined.
        room: ModelRoom,
    },
    /// Server confirms we left a room.
    SelfPart {
        /// Room left.
        room: ModelRoom,
    },
    /// Someone else joined a room.
    UserJoin {
        /// Joining user.
        user: ModelUser,
        /// Room joined.
        room: ModelRoom,
    },
    /// Someone else left a room.
    UserPart {
        /// Leaving user.
        user: ModelUser,
        /// Room left.
        room: ModelRoom,
    },
    /// Someone sent us a message scoped to a room.
    ScopedMessage {
        /// Sender.
        user: ModelUser,
        /// Room the message is scoped to.
        room: ModelRoom,
    },
    /// Someone broadcast to a room.
    RoomMessage {
        /// Sender.
        user: ModelUser,
        /// Room broadcast to.
        room: ModelRoom,
    },
    /// Operator asked for a rekey.
    Rekey {
        /// Room to rekey.
        room: ModelRoom,
    },
    /// Garbage from the server.
    Malformed {
        /// Nickname in the bare prefix.
        user: ModelUser,
    },
}

impl Operation {
    /// Whether the line comes from the operator rather than the server.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Rekey { .. })
    }

    /// The input line that triggers this operation.
    pub fn line(&self) -> String {
        match *self {
            Self::SelfJoin { room } => format!(":{SELF_NICK}!me@host JOIN :{}", room_name(room)),
            Self::SelfPart { room } => {
                format!(":{SELF_NICK}!me@host PART {} :bye", room_name(room))
            },
            Self::UserJoin { user, room } => {
                format!(":{}!x@host JOIN {}", user_name(user), room_name(room))
            },
            Self::UserPart { user, room } => {
                format!(":{}!x@host PART {}", user_name(user), room_name(room))
            },
            Self::ScopedMessage { user, room } => {
                let (user, room) = (user_name(user), room_name(room));
                format!(":{user}!x@host PRIVMSG {SELF_NICK} :{room} hello")
            },
            Self::RoomMessage { user, room } => {
                format!(":{}!x@host PRIVMSG {} :ciphertext", user_name(user), room_name(room))
            },
            Self::Rekey { room } => format!(":r {}", room_name(room)),
            Self::Malformed { user } => format!(":{}!x@host", user_name(user)),
        }
    }
}
