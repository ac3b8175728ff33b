//! Command dispatcher.
//!
//! The `Dispatcher` is the relay's state machine. It owns the room
//! directory and the secure messaging adapter, and turns remote protocol
//! lines, operator input, and idle ticks into [`Action`]s.
//!
//! ## Design
//!
//! - Sans-IO: every entry point returns actions, the driver executes them
//! - Single-threaded: one event is fully handled before the next starts
//! - Lookups before mutation go through `Option`; an unknown room or user
//!   makes the event a no-op
//! - Adapter handles leave the directory by value and go straight back to
//!   the adapter, so each is released exactly once

use std::sync::Arc;

use murmur_proto::{Command, Message, is_room};

use crate::{
    action::Action,
    adapter::{Callbacks, SecureMessaging},
    directory::{Directory, Room},
    env::Environment,
    format::{SECURE_TEXT_END, SECURE_TEXT_START},
    keepalive::{Keepalive, KeepaliveAction, KeepaliveConfig},
    local::LocalCommand,
};

/// Parting message used when the operator gives none.
pub const DEFAULT_PART_REASON: &str = "murmur: leaving";

/// Notice shown when text has nowhere to go.
const NO_TARGET_NOTICE: &str = "No channel to send to";

/// Dispatcher configuration.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Our initial nickname.
    pub nick: String,
    /// Server host; lines without a sender prefix are attributed to it.
    pub server: String,
    /// Keepalive timing.
    pub keepalive: KeepaliveConfig,
}

/// Input to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEvent<'a> {
    /// One line from the remote connection.
    Remote(&'a str),
    /// One line of operator input.
    Local(&'a str),
    /// A full wait interval passed with no input.
    Idle,
}

/// Collects the adapter's callbacks as actions.
#[derive(Debug, Default)]
struct Outbox {
    actions: Vec<Action>,
}

impl Outbox {
    fn send(&mut self, command: Command<'_>) {
        self.actions.push(Action::Send(command.to_string()));
    }

    fn display(&mut self, target: &str, text: impl Into<String>) {
        self.actions.push(Action::display(target, text));
    }
}

impl Callbacks for Outbox {
    fn send_room(&mut self, room: &str, message: &str) {
        self.send(Command::Privmsg { target: room, text: message });
    }

    fn send_user(&mut self, room: &str, user: &str, message: &str) {
        self.send(Command::Privmsg { target: user, text: &format!("{room} {message}") });
    }

    fn receive_user(&mut self, room: &str, user: &str, message: &str) {
        self.display(room, format!("<{user}> {SECURE_TEXT_START}{message}{SECURE_TEXT_END}"));
    }
}

/// Relay state machine.
///
/// # Type Parameters
///
/// - `A`: Secure messaging adapter
/// - `E`: Environment implementation for time
pub struct Dispatcher<A, E>
where
    A: SecureMessaging,
    E: Environment,
{
    /// Secure messaging module.
    adapter: A,
    /// Rooms we are in and who is in them.
    directory: Directory<A::Room, A::User>,
    /// Our current nickname.
    nick: String,
    /// Default sender for unprefixed lines.
    server: Arc<str>,
    /// Target plain operator text goes to.
    current: Option<String>,
    /// Remote liveness tracking.
    keepalive: Keepalive<E::Instant>,
    /// Environment for time.
    env: E,
}

impl<A, E> Dispatcher<A, E>
where
    A: SecureMessaging,
    E: Environment,
{
    /// Create a dispatcher. The keepalive clock starts now.
    pub fn new(adapter: A, config: DispatcherConfig, env: E) -> Self {
        let keepalive = Keepalive::new(config.keepalive, env.now());
        Self {
            adapter,
            directory: Directory::new(),
            nick: config.nick,
            server: config.server.into(),
            current: None,
            keepalive,
            env,
        }
    }

    /// Our current nickname.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Target plain operator text goes to.
    pub fn current_target(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Rooms we are in.
    pub fn directory(&self) -> &Directory<A::Room, A::User> {
        &self.directory
    }

    /// The secure messaging module.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Keepalive timing in effect.
    pub fn keepalive(&self) -> &KeepaliveConfig {
        self.keepalive.config()
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: DispatchEvent<'_>) -> Vec<Action> {
        match event {
            DispatchEvent::Remote(line) => self.handle_remote(line),
            DispatchEvent::Local(line) => self.handle_local(line),
            DispatchEvent::Idle => self.handle_idle(),
        }
    }

    /// Handle one line from the remote connection.
    pub fn handle_remote(&mut self, line: &str) -> Vec<Action> {
        self.keepalive.heard(self.env.now());

        let server = Arc::clone(&self.server);
        let msg = match Message::parse(line, &server) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::trace!("ignoring remote line: {}", e);
                return Vec::new();
            },
        };

        let mut out = Outbox::default();
        match msg.command {
            "PONG" => {},
            "PING" => {
                let token = Some(msg.trailing).filter(|t| !t.is_empty()).or(msg.param(0));
                out.send(Command::Pong { text: token.unwrap_or_default() });
            },
            "PRIVMSG" => self.on_privmsg(&msg, &mut out),
            _ => self.on_event(&msg, &mut out),
        }
        out.actions
    }

    /// Handle one line of operator input.
    pub fn handle_local(&mut self, line: &str) -> Vec<Action> {
        let Some(command) = LocalCommand::parse(line) else {
            return Vec::new();
        };

        let mut out = Outbox::default();
        match command {
            LocalCommand::Text(text) => {
                let target = self.current.clone();
                self.say(target.as_deref(), text, &mut out);
            },
            LocalCommand::Message { target, text } => self.say(Some(target), text, &mut out),
            LocalCommand::Join { target } if target.is_empty() => {
                out.display("", "No channel to join");
            },
            LocalCommand::Join { target } => {
                out.send(Command::Join { target });
                if self.current.is_none() {
                    self.current = Some(target.to_owned());
                }
            },
            LocalCommand::Part { target, reason } => {
                match target.or(self.current.as_deref()) {
                    Some(target) => out.send(Command::Part {
                        target,
                        reason: reason.unwrap_or(DEFAULT_PART_REASON),
                    }),
                    None => out.display("", "No channel to part"),
                }
            },
            LocalCommand::Rekey { target } => {
                let target = target.map(str::to_owned).or_else(|| self.current.clone());
                self.rekey(target.as_deref(), &mut out);
            },
            LocalCommand::Switch { target } => {
                self.current = Some(target.to_owned()).filter(|t| !t.is_empty());
            },
            LocalCommand::Raw(line) => {
                if !line.is_empty() {
                    out.send(Command::Raw(line));
                }
            },
        }
        out.actions
    }

    /// Handle a wait interval that passed with no input.
    pub fn handle_idle(&mut self) -> Vec<Action> {
        match self.keepalive.on_idle(self.env.now()) {
            KeepaliveAction::Probe => {
                vec![Action::Send(Command::Ping { server: &self.server }.to_string())]
            },
            KeepaliveAction::Expired { silent_for } => {
                tracing::warn!(?silent_for, "remote silent past keepalive timeout");
                vec![Action::Shutdown { reason: "parse timeout".to_owned() }]
            },
        }
    }

    /// Leave every room, releasing all adapter handles.
    ///
    /// Called automatically on drop.
    pub fn close(&mut self) -> Vec<Action> {
        let mut out = Outbox::default();
        for room in self.directory.drain() {
            release_room(&mut self.adapter, room, &mut out);
        }
        out.actions
    }

    fn on_privmsg(&mut self, msg: &Message<'_>, out: &mut Outbox) {
        let sender = msg.sender;
        let text = msg.trailing;

        if is_room(text) {
            // Room-scoped private message: "<room> <payload>"
            let (room_name, payload) = text.split_once(' ').unwrap_or((text, ""));
            let Some(room) = self.directory.get_mut(room_name) else {
                tracing::debug!(room = room_name, sender, "scoped message for untracked room");
                return;
            };

            let (room_handle, user_handle) = room.handles_mut(sender);
            match user_handle {
                Some(user_handle) => {
                    self.adapter.receive_user(
                        room_handle,
                        Some(user_handle),
                        sender,
                        payload,
                        out,
                    );
                },
                None => {
                    match self.adapter.receive_user(room_handle, None, sender, payload, out) {
                        Some(handle) => insert_user(&mut self.adapter, room, sender, handle, out),
                        None => {
                            tracing::debug!(room = room_name, sender, "adapter declined user");
                        },
                    }
                },
            }
            return;
        }

        let Some(target) = msg.param(0) else {
            return;
        };
        if let Some(room) = self.directory.get_mut(target) {
            self.adapter.receive(room.handle_mut(), text, out);
        } else if !is_room(target) {
            out.display(sender, format!("<{sender}> {text}"));
        } else {
            tracing::debug!(room = target, sender, "message for untracked room");
        }
    }

    fn on_event(&mut self, msg: &Message<'_>, out: &mut Outbox) {
        let sender = msg.sender;
        out.display(
            sender,
            format!(">< {} ({}): {}", msg.command, msg.params.join(" "), msg.trailing),
        );

        let is_self = sender == self.nick;
        match (msg.command, is_self) {
            ("JOIN", true) => {
                if let Some(room) = msg.target() {
                    self.join_room(room, out);
                }
            },
            ("JOIN", false) => {
                if let Some(room) = msg.target() {
                    self.user_joined(room, sender, out);
                }
            },
            ("PART", true) => {
                if let Some(room) = msg.param(0) {
                    self.leave_room(room, out);
                }
            },
            ("PART", false) => {
                if let Some(room) = msg.param(0) {
                    self.user_left(room, sender, out);
                }
            },
            ("NICK", true) => {
                if let Some(nick) = msg.target() {
                    tracing::debug!(from = %self.nick, to = nick, "nickname changed");
                    self.nick = nick.to_owned();
                }
            },
            _ => {},
        }
    }

    fn join_room(&mut self, name: &str, out: &mut Outbox) {
        out.display(name, "joining");
        if self.directory.contains(name) {
            tracing::debug!(room = name, "already tracking room");
            return;
        }

        let Some(handle) = self.adapter.join_room(name, out) else {
            tracing::debug!(room = name, "adapter declined room");
            return;
        };
        if let Err(handle) = self.directory.insert(name, handle) {
            self.adapter.leave_room(handle, out);
        }
    }

    fn leave_room(&mut self, name: &str, out: &mut Outbox) {
        out.display(name, "leaving");
        match self.directory.remove(name) {
            Some(room) => release_room(&mut self.adapter, room, out),
            None => tracing::debug!(room = name, "part for untracked room"),
        }
    }

    fn user_joined(&mut self, name: &str, user: &str, out: &mut Outbox) {
        out.display(name, format!("{user} joined"));
        let Some(room) = self.directory.get_mut(name) else {
            return;
        };
        if room.has_user(user) {
            return;
        }

        match self.adapter.user_joined(room.handle_mut(), user, out) {
            Some(handle) => insert_user(&mut self.adapter, room, user, handle, out),
            None => tracing::debug!(room = name, user, "adapter declined user"),
        }
    }

    fn user_left(&mut self, name: &str, user: &str, out: &mut Outbox) {
        out.display(name, format!("{user} left"));
        let Some(room) = self.directory.get_mut(name) else {
            return;
        };
        match room.remove_user(user) {
            Some(entry) => self.adapter.user_left(room.handle_mut(), entry.into_handle(), out),
            None => tracing::debug!(room = name, user, "part for unknown user"),
        }
    }

    fn say(&mut self, target: Option<&str>, text: &str, out: &mut Outbox) {
        let Some(target) = target.filter(|t| !t.is_empty()) else {
            out.display("", NO_TARGET_NOTICE);
            return;
        };

        if is_room(target) {
            let Some(room) = self.directory.get_mut(target) else {
                out.display(target, format!("Not in {target}"));
                return;
            };
            self.adapter.send(room.handle_mut(), text, out);
        } else {
            out.send(Command::Privmsg { target, text });
        }
        out.display(target, format!("<{}> {text}", self.nick));
    }

    fn rekey(&mut self, target: Option<&str>, out: &mut Outbox) {
        match target.and_then(|t| self.directory.get_mut(t)) {
            Some(room) => self.adapter.rekey_room(room.handle_mut(), out),
            None => tracing::debug!(target, "rekey for untracked target"),
        }
    }
}

impl<A, E> Drop for Dispatcher<A, E>
where
    A: SecureMessaging,
    E: Environment,
{
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl<A, E> std::fmt::Debug for Dispatcher<A, E>
where
    A: SecureMessaging,
    E: Environment,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("nick", &self.nick)
            .field("server", &self.server)
            .field("current", &self.current)
            .field("room_count", &self.directory.len())
            .finish_non_exhaustive()
    }
}

fn insert_user<A: SecureMessaging>(
    adapter: &mut A,
    room: &mut Room<A::Room, A::User>,
    user: &str,
    handle: A::User,
    out: &mut Outbox,
) {
    if let Err(handle) = room.insert_user(user, handle) {
        adapter.user_left(room.handle_mut(), handle, out);
    }
}

/// Release every user's handle, then the room's own.
fn release_room<A: SecureMessaging>(
    adapter: &mut A,
    room: Room<A::Room, A::User>,
    out: &mut Outbox,
) {
    let (mut handle, users) = room.into_parts();
    for user in users {
        adapter.user_left(&mut handle, user.into_handle(), out);
    }
    adapter.leave_room(handle, out);
}
