//! Outbound protocol lines.

use std::fmt;

/// One outbound protocol line, without its `\r\n` terminator.
///
/// The `Display` impl renders the exact wire text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Connection password, sent before registration.
    Pass {
        /// Password or authentication token.
        token: &'a str,
    },

    /// Set or change our nickname.
    Nick {
        /// Requested nickname.
        nick: &'a str,
    },

    /// Registration line sent once after connecting.
    User {
        /// Our nickname, reused as user and real name.
        nick: &'a str,
        /// Server host name we dialed.
        host: &'a str,
    },

    /// Request to join a room.
    Join {
        /// Room to join.
        target: &'a str,
    },

    /// Request to leave a room.
    Part {
        /// Room to leave.
        target: &'a str,
        /// Parting message.
        reason: &'a str,
    },

    /// Text to a room or a single identity.
    Privmsg {
        /// Recipient room or nickname.
        target: &'a str,
        /// Message body.
        text: &'a str,
    },

    /// Keepalive probe.
    Ping {
        /// Server we expect the answer from.
        server: &'a str,
    },

    /// Answer to a server probe.
    Pong {
        /// Token echoed from the probe.
        text: &'a str,
    },

    /// Operator-supplied line passed through untouched.
    Raw(&'a str),
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass { token } => write!(f, "PASS {token}"),
            Self::Nick { nick } => write!(f, "NICK {nick}"),
            Self::User { nick, host } => write!(f, "USER {nick} localhost {host} :{nick}"),
            Self::Join { target } => write!(f, "JOIN {target}"),
            Self::Part { target, reason } => write!(f, "PART {target} :{reason}"),
            Self::Privmsg { target, text } => write!(f, "PRIVMSG {target} :{text}"),
            Self::Ping { server } => write!(f, "PING {server}"),
            Self::Pong { text } => write!(f, "PONG {text}"),
            Self::Raw(line) => f.write_str(line),
        }
    }
}
