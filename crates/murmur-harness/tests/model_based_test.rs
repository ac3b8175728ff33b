//! Model-based property tests.
//!
//! These tests generate random operation sequences and verify that the real
//! dispatcher tracks exactly the membership the reference model predicts,
//! while holding exactly one live adapter handle per tracked entry.
//!
//! # Architecture
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!      ModelRelay     Dispatcher       Compare
//!      (reference)   (recording)      Directories
//! ```

use murmur_core::{Dispatcher, DispatcherConfig, KeepaliveConfig};
use murmur_harness::{
    AdapterCall, DECLINED_ROOM, DECLINED_USER, ManualEnv, ModelRelay, Operation,
    RecordingAdapter, SELF_NICK, observe,
};
use proptest::prelude::*;

fn real_dispatcher() -> Dispatcher<RecordingAdapter, ManualEnv> {
    let adapter =
        RecordingAdapter::new().declining_room(DECLINED_ROOM).declining_user(DECLINED_USER);
    let config = DispatcherConfig {
        nick: SELF_NICK.to_owned(),
        server: "irc.example.net".to_owned(),
        keepalive: KeepaliveConfig::default(),
    };
    Dispatcher::new(adapter, config, ManualEnv::new())
}

fn apply_real(dispatcher: &mut Dispatcher<RecordingAdapter, ManualEnv>, op: &Operation) {
    let line = op.line();
    if op.is_local() {
        dispatcher.handle_local(&line);
    } else {
        dispatcher.handle_remote(&line);
    }
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    let room = 0u8..4;
    let user = 0u8..4;
    prop_oneof![
        3 => room.clone().prop_map(|room| Operation::SelfJoin { room }),
        2 => room.clone().prop_map(|room| Operation::SelfPart { room }),
        3 => (user.clone(), room.clone())
            .prop_map(|(user, room)| Operation::UserJoin { user, room }),
        2 => (user.clone(), room.clone())
            .prop_map(|(user, room)| Operation::UserPart { user, room }),
        2 => (user.clone(), room.clone())
            .prop_map(|(user, room)| Operation::ScopedMessage { user, room }),
        1 => (user.clone(), room.clone())
            .prop_map(|(user, room)| Operation::RoomMessage { user, room }),
        1 => room.prop_map(|room| Operation::Rekey { room }),
        1 => user.prop_map(|user| Operation::Malformed { user }),
    ]
}

proptest! {
    #[test]
    fn dispatcher_matches_model(ops in prop::collection::vec(operation_strategy(), 0..60)) {
        let mut model = ModelRelay::new();
        let mut real = real_dispatcher();

        for op in &ops {
            model.apply(op);
            apply_real(&mut real, op);

            prop_assert_eq!(&observe(&real), model.directory(), "diverged after {:?}", op);
            prop_assert_eq!(real.adapter().live_handles().len(), model.live_handles());
        }

        real.close();
        prop_assert!(real.adapter().live_handles().is_empty());
        prop_assert!(real.adapter().double_releases().is_empty());
    }

    #[test]
    fn self_join_part_parity(joins in prop::collection::vec(any::<bool>(), 1..40)) {
        let mut real = real_dispatcher();
        let mut present = false;

        for join in joins {
            let op = if join {
                Operation::SelfJoin { room: 0 }
            } else {
                Operation::SelfPart { room: 0 }
            };
            let before = real.adapter().calls().len();
            apply_real(&mut real, &op);
            let new_calls = &real.adapter().calls()[before..];

            match (present, join) {
                (false, true) => {
                    let granted = matches!(
                        new_calls,
                        [AdapterCall::JoinRoom { granted: Some(_), .. }]
                    );
                    prop_assert!(granted);
                },
                (true, false) => {
                    let released = matches!(new_calls, [AdapterCall::LeaveRoom { .. }]);
                    prop_assert!(released);
                },
                _ => prop_assert!(new_calls.is_empty()),
            }
            present = join;
            prop_assert_eq!(real.directory().contains("#r0"), present);
        }
    }

    #[test]
    fn arbitrary_remote_lines_never_panic(lines in prop::collection::vec(".{0,80}", 0..30)) {
        let mut real = real_dispatcher();
        for line in &lines {
            real.handle_remote(line);
            real.handle_local(line);
        }
        real.close();
        prop_assert!(real.adapter().double_releases().is_empty());
    }
}
