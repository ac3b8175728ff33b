//! Client error types.

use std::io;

use thiserror::Error;

/// Errors that end or interrupt a relay session.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not reach the server.
    #[error("cannot connect to {addr}: {source}")]
    Connect {
        /// Address we dialed.
        addr: String,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },

    /// Reading or writing a stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The server closed the connection.
    #[error("remote host closed connection")]
    RemoteClosed,

    /// Operator input reached end of stream.
    #[error("broken pipe")]
    InputClosed,

    /// A line exceeded the length limit and was discarded.
    #[error("line exceeds {max} bytes")]
    LineTooLong {
        /// Length limit in bytes.
        max: usize,
    },

    /// The server stayed silent past the keepalive timeout.
    #[error("shutting down: {reason}")]
    KeepaliveExpired {
        /// Diagnostic from the dispatcher.
        reason: String,
    },
}

impl ClientError {
    /// Returns true if the session cannot continue.
    ///
    /// An overlong line is dropped and reading resumes at the next line.
    /// Everything else ends the process.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::LineTooLong { .. } => false,

            Self::Connect { .. }
            | Self::Io(_)
            | Self::RemoteClosed
            | Self::InputClosed
            | Self::KeepaliveExpired { .. } => true,
        }
    }
}
