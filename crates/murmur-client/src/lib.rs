//! Murmur terminal client.
//!
//! This crate wires the sans-IO dispatcher to real streams:
//! - Tokio for the event loop and the TCP connection
//! - Bounded line framing on both inputs
//! - Local wall-clock timestamps on display
//!
//! ## Architecture
//!
//! ```text
//! murmur-client
//!   ├─ SystemEnv          (production Environment impl)
//!   ├─ CleartextAdapter   (messaging module with no protection)
//!   ├─ BoundedLines       (line framing with a length limit)
//!   ├─ Client             (select loop: remote, operator, idle)
//!   └─ ActionExecutor     (writes protocol lines and display lines)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cleartext;
mod codec;
mod error;
mod executor;
mod system_env;

use std::{fmt, io};

pub use cleartext::{CleartextAdapter, UNATTRIBUTED};
pub use codec::{BoundedLines, Line};
pub use error::ClientError;
pub use executor::ActionExecutor;
use futures_util::StreamExt;
use murmur_core::{Dispatcher, DispatcherConfig, Environment, KeepaliveConfig, SecureMessaging};
use murmur_proto::{Command, MAX_LINE_LEN};
pub use system_env::SystemEnv;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};
use tokio_util::codec::FramedRead;

/// Client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Nickname to register with.
    pub nick: String,
    /// Connection password, if the server wants one.
    pub key: Option<String>,
    /// Keepalive timing.
    pub keepalive: KeepaliveConfig,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("nick", &self.nick)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("keepalive", &self.keepalive)
            .finish()
    }
}

impl ClientConfig {
    /// Registration lines sent right after connecting, in order.
    pub fn login_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(3);
        if let Some(token) = &self.key {
            lines.push(Command::Pass { token }.to_string());
        }
        lines.push(Command::Nick { nick: &self.nick }.to_string());
        lines.push(Command::User { nick: &self.nick, host: &self.host }.to_string());
        lines
    }
}

/// Open the TCP connection to the configured server.
pub async fn connect(config: &ClientConfig) -> Result<TcpStream, ClientError> {
    let addr = format!("{}:{}", config.host, config.port);
    let stream = TcpStream::connect((config.host.as_str(), config.port))
        .await
        .map_err(|source| ClientError::Connect { addr: addr.clone(), source })?;
    tracing::info!(%addr, "connected");
    Ok(stream)
}

/// One input to the event loop.
enum Input {
    Remote(String),
    Local(String),
    Idle,
}

/// Turn the next item of a framed stream into loop input.
///
/// End of stream becomes `closed`.
fn framed(
    next: Option<Result<Line, io::Error>>,
    wrap: fn(String) -> Input,
    closed: ClientError,
) -> Result<Input, ClientError> {
    match next {
        Some(Ok(Line::Complete(line))) => Ok(wrap(line)),
        Some(Ok(Line::Overlong)) => Err(ClientError::LineTooLong { max: MAX_LINE_LEN }),
        Some(Err(e)) => Err(e.into()),
        None => Err(closed),
    }
}

/// Relay session between a server connection and the operator.
pub struct Client<A, E>
where
    A: SecureMessaging,
    E: Environment,
{
    dispatcher: Dispatcher<A, E>,
    env: E,
    login: Vec<String>,
}

impl<A, E> Client<A, E>
where
    A: SecureMessaging,
    E: Environment,
{
    /// Create a session. Keepalive timing starts now.
    pub fn new(adapter: A, config: &ClientConfig, env: E) -> Self {
        let dispatcher = Dispatcher::new(
            adapter,
            DispatcherConfig {
                nick: config.nick.clone(),
                server: config.host.clone(),
                keepalive: config.keepalive,
            },
            env.clone(),
        );
        Self { dispatcher, env, login: config.login_lines() }
    }

    /// Dispatcher driving this session.
    pub fn dispatcher(&self) -> &Dispatcher<A, E> {
        &self.dispatcher
    }

    /// Log in, then relay until something ends the session.
    ///
    /// Every wait takes exactly one of: a line from `remote`, a line from
    /// `local`, or one probe interval of silence. Remote lines win when both
    /// are ready. Only returns on error; an overlong line is skipped and
    /// reading continues.
    pub async fn run<S, L, D>(&mut self, remote: S, local: L, display: D) -> Result<(), ClientError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        L: AsyncRead + Unpin,
        D: AsyncWrite + Unpin,
    {
        let (remote_read, remote_write) = tokio::io::split(remote);
        let mut remote_lines = FramedRead::new(remote_read, BoundedLines::new(MAX_LINE_LEN));
        let mut local_lines = FramedRead::new(local, BoundedLines::new(MAX_LINE_LEN));
        let mut executor = ActionExecutor::new(remote_write, display);
        let interval = self.dispatcher.keepalive().probe_interval();

        for line in &self.login {
            executor.send_line(line).await?;
        }

        loop {
            let input = tokio::select! {
                biased;

                line = remote_lines.next() => framed(line, Input::Remote, ClientError::RemoteClosed),
                line = local_lines.next() => framed(line, Input::Local, ClientError::InputClosed),
                () = self.env.sleep(interval) => Ok(Input::Idle),
            };

            let actions = match input {
                Ok(Input::Remote(line)) => self.dispatcher.handle_remote(&line),
                Ok(Input::Local(line)) => self.dispatcher.handle_local(&line),
                Ok(Input::Idle) => self.dispatcher.handle_idle(),
                Err(err) if !err.is_fatal() => {
                    tracing::warn!(%err, "line skipped");
                    continue;
                },
                Err(err) => return Err(err),
            };

            executor.execute(actions).await?;
        }
    }
}

impl<A, E> fmt::Debug for Client<A, E>
where
    A: SecureMessaging,
    E: Environment,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("dispatcher", &self.dispatcher).finish_non_exhaustive()
    }
}
