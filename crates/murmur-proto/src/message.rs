//! Inbound line parsing.

use crate::{IDENTITY_DELIMITER, PREFIX_MARKER, ParseError, TRAILING_MARKER};

/// One parsed protocol line.
///
/// Borrows from the raw line; nothing is copied except the parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<'a> {
    /// Originating identity with the identity suffix removed, or the default
    /// sender when the line carries no prefix.
    pub sender: &'a str,
    /// Command token (`PRIVMSG`, `JOIN`, numeric replies, ...).
    pub command: &'a str,
    /// Positional parameters preceding the trailing segment.
    pub params: Vec<&'a str>,
    /// Free text after the trailing marker, or empty.
    pub trailing: &'a str,
}

impl<'a> Message<'a> {
    /// Parse one raw line.
    ///
    /// Anything from the first carriage return or newline onwards is ignored.
    /// Lines without a sender prefix are attributed to `default_sender`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Empty` for an empty line and
    /// `ParseError::MissingCommand` for a bare sender prefix.
    pub fn parse(line: &'a str, default_sender: &'a str) -> Result<Self, ParseError> {
        let line = line.find(['\r', '\n']).map_or(line, |end| &line[..end]);
        if line.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let (sender, rest) = match line.strip_prefix(PREFIX_MARKER) {
            Some(prefixed) => {
                let (identity, rest) = next_token(prefixed);
                let nick =
                    identity.split_once(IDENTITY_DELIMITER).map_or(identity, |(nick, _)| nick);
                (nick, rest)
            },
            None => (default_sender, line),
        };

        let (command, mut rest) = next_token(rest);
        if command.is_empty() {
            return Err(ParseError::MissingCommand);
        }

        let mut params = Vec::new();
        let mut trailing = "";
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }
            if let Some(text) = rest.strip_prefix(TRAILING_MARKER) {
                trailing = text;
                break;
            }
            let (param, remainder) = next_token(rest);
            params.push(param);
            rest = remainder;
        }

        Ok(Self { sender, command, params, trailing })
    }

    /// Positional parameter at `index`.
    pub fn param(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).copied()
    }

    /// The object of a membership command.
    ///
    /// Servers send `JOIN #room` as well as `JOIN :#room`, so this is the
    /// first parameter when present and the trailing text otherwise.
    pub fn target(&self) -> Option<&'a str> {
        self.param(0).or_else(|| Some(self.trailing).filter(|text| !text.is_empty()))
    }
}

/// Split off the next whitespace-delimited token, consuming one delimiter.
fn next_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(end) => {
            let (token, rest) = input.split_at(end);
            let delimiter = rest.chars().next().map_or(0, char::len_utf8);
            (token, &rest[delimiter..])
        },
        None => (input, ""),
    }
}
