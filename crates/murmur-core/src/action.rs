//! Actions produced by the dispatcher for the driver to execute.

/// Side effect requested by the dispatcher.
///
/// The dispatcher performs no I/O. The driver executes actions in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write one protocol line to the remote, without terminator.
    Send(String),

    /// Render one line for the operator.
    Display {
        /// Label the line is filed under (room, nickname, or empty).
        target: String,
        /// Rendered text.
        text: String,
    },

    /// Terminate the session. Nothing can be recovered.
    Shutdown {
        /// Diagnostic for the operator.
        reason: String,
    },
}

impl Action {
    /// Build a display action.
    pub fn display(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Display { target: target.into(), text: text.into() }
    }
}
