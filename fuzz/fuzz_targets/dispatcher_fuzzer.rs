//! Fuzz target for the dispatcher's handle bookkeeping
//!
//! # Strategy
//!
//! - Structured operations: joins, parts, scoped and room messages
//! - Raw lines: arbitrary remote and operator input mixed in
//! - Idle ticks: advance the clock between events
//!
//! # Invariants
//!
//! - Membership always matches the reference model
//! - Exactly one live adapter handle per tracked room and user
//! - No handle is ever released twice
//! - After close, no handle is live
//! - NEVER panic on malformed input

#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use murmur_core::{Dispatcher, DispatcherConfig, KeepaliveConfig};
use murmur_harness::{
    DECLINED_ROOM, DECLINED_USER, ManualEnv, ModelRelay, Operation, RecordingAdapter, SELF_NICK,
    observe,
};

#[derive(Debug, Arbitrary)]
enum FuzzEvent {
    Op(Operation),
    RemoteLine(String),
    LocalLine(String),
    Idle { advance_secs: u8 },
}

fuzz_target!(|events: Vec<FuzzEvent>| {
    let env = ManualEnv::new();
    let adapter =
        RecordingAdapter::new().declining_room(DECLINED_ROOM).declining_user(DECLINED_USER);
    let config = DispatcherConfig {
        nick: SELF_NICK.to_owned(),
        server: "irc.example.net".to_owned(),
        keepalive: KeepaliveConfig::default(),
    };
    let mut dispatcher = Dispatcher::new(adapter, config, env.clone());
    let mut model = ModelRelay::new();
    let mut structured_only = true;

    for event in &events {
        match event {
            FuzzEvent::Op(op) => {
                model.apply(op);
                let line = op.line();
                if op.is_local() {
                    dispatcher.handle_local(&line);
                } else {
                    dispatcher.handle_remote(&line);
                }
            },
            FuzzEvent::RemoteLine(line) => {
                structured_only = false;
                dispatcher.handle_remote(line);
            },
            FuzzEvent::LocalLine(line) => {
                structured_only = false;
                dispatcher.handle_local(line);
            },
            FuzzEvent::Idle { advance_secs } => {
                env.advance(Duration::from_secs(u64::from(*advance_secs)));
                dispatcher.handle_idle();
            },
        }

        if structured_only {
            assert_eq!(&observe(&dispatcher), model.directory());
            assert_eq!(dispatcher.adapter().live_handles().len(), model.live_handles());
        }
        assert!(dispatcher.adapter().double_releases().is_empty());
    }

    dispatcher.close();
    assert!(dispatcher.adapter().live_handles().is_empty());
    assert!(dispatcher.adapter().double_releases().is_empty());
});
