//! Property tests for the line grammar.

#![allow(clippy::unwrap_used)]

use murmur_proto::{Command, Message, ParseError};
use proptest::prelude::*;

const SERVER: &str = "irc.example.net";

fn token() -> impl Strategy<Value = String> {
    "[A-Za-z0-9#&_.-]{1,12}"
}

fn trailing_text() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}

proptest! {
    #[test]
    fn full_line_fields_survive_parsing(
        nick in "[A-Za-z_][A-Za-z0-9_]{0,8}",
        suffix in "[a-z0-9~@.]{0,10}",
        command in "[A-Z]{3,8}",
        first in token(),
        second in token(),
        text in trailing_text(),
    ) {
        let line = format!(":{nick}!{suffix} {command} {first} {second} :{text}\r\n");
        let msg = Message::parse(&line, SERVER).unwrap();

        prop_assert_eq!(msg.sender, nick.as_str());
        prop_assert_eq!(msg.command, command.as_str());
        prop_assert_eq!(msg.params, vec![first.as_str(), second.as_str()]);
        prop_assert_eq!(msg.trailing, text.as_str());
    }

    #[test]
    fn built_privmsg_parses_back(target in token(), text in trailing_text()) {
        let line = Command::Privmsg { target: &target, text: &text }.to_string();
        let msg = Message::parse(&line, SERVER).unwrap();

        prop_assert_eq!(msg.sender, SERVER);
        prop_assert_eq!(msg.command, "PRIVMSG");
        prop_assert_eq!(msg.param(0), Some(target.as_str()));
        prop_assert_eq!(msg.trailing, text.as_str());
    }

    #[test]
    fn arbitrary_input_never_panics(line in any::<String>()) {
        match Message::parse(&line, SERVER) {
            Ok(msg) => prop_assert!(!msg.command.is_empty()),
            Err(ParseError::Empty | ParseError::MissingCommand) => {},
        }
    }
}
