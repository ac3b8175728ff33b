//! Fuzz target for the protocol line parser
//!
//! # Invariants
//!
//! - NEVER panic on any input, valid UTF-8 or not
//! - Parsed command is non-empty and contains no space
//! - Sender never contains the identity delimiter
//! - No field contains a line terminator

#![no_main]

use libfuzzer_sys::fuzz_target;
use murmur_proto::{IDENTITY_DELIMITER, Message};

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);

    let Ok(msg) = Message::parse(&line, "irc.example.net") else {
        return;
    };

    assert!(!msg.command.is_empty());
    assert!(!msg.command.contains(' '));
    assert!(!msg.sender.contains(IDENTITY_DELIMITER));

    let fields = std::iter::once(msg.sender)
        .chain(std::iter::once(msg.command))
        .chain(msg.params.iter().copied())
        .chain(std::iter::once(msg.trailing));
    for field in fields {
        assert!(!field.contains(['\r', '\n']), "terminator leaked into {field:?}");
    }
});
