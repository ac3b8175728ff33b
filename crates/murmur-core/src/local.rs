//! Operator input grammar.
//!
//! A line starting with [`COMMAND_MARKER`], one command character, and
//! whitespace or the end of the line is a local command. Any other marked line is a raw protocol
//! line. Everything else is text for the selected target.

/// Introduces a local command.
pub const COMMAND_MARKER: char = ':';

/// One line of operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand<'a> {
    /// `:j <target>`: join a room.
    Join {
        /// Room to join.
        target: &'a str,
    },

    /// `:l [target [reason]]`: leave a room.
    Part {
        /// Room to leave; the selected target when absent.
        target: Option<&'a str>,
        /// Parting message; a fixed text when absent.
        reason: Option<&'a str>,
    },

    /// `:m <target> <text>`: message a target without selecting it.
    Message {
        /// Recipient room or nickname.
        target: &'a str,
        /// Message body.
        text: &'a str,
    },

    /// `:r [target]`: refresh a room's keys.
    Rekey {
        /// Room to rekey; the selected target when absent.
        target: Option<&'a str>,
    },

    /// `:s <target>`: select a target. An empty target clears the selection.
    Switch {
        /// New selected target.
        target: &'a str,
    },

    /// Any other marked line, sent with the marker removed.
    Raw(&'a str),

    /// Unmarked text for the selected target.
    Text(&'a str),
}

impl<'a> LocalCommand<'a> {
    /// Parse one line of operator input.
    ///
    /// Returns `None` for a line that is empty once its terminator is removed.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.find(['\r', '\n']).map_or(line, |end| &line[..end]);
        if line.is_empty() {
            return None;
        }

        let Some(body) = line.strip_prefix(COMMAND_MARKER) else {
            return Some(Self::Text(line));
        };

        let mut chars = body.chars();
        let command = match (chars.next(), chars.next()) {
            (Some(command), None) => command,
            (Some(command), Some(separator)) if separator.is_whitespace() => command,
            _ => return Some(Self::Raw(body)),
        };
        let arg = chars.as_str();

        let parsed = match command {
            'j' => Self::Join { target: arg.trim() },
            'l' => {
                let (target, reason) = split_word(arg);
                Self::Part { target: non_empty(target), reason: non_empty(reason) }
            },
            'm' => {
                let (target, text) = split_word(arg);
                Self::Message { target, text }
            },
            'r' => Self::Rekey { target: non_empty(split_word(arg).0) },
            's' => Self::Switch { target: arg.trim() },
            _ => Self::Raw(body),
        };
        Some(parsed)
    }
}

/// Split off the first word; the rest starts after one whitespace character.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(end) => {
            let (word, rest) = input.split_at(end);
            let separator = rest.chars().next().map_or(0, char::len_utf8);
            (word, &rest[separator..])
        },
        None => (input, ""),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s).filter(|s| !s.is_empty())
}
