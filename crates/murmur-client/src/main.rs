//! Murmur client binary.
//!
//! # Usage
//!
//! ```bash
//! # Connect with defaults ($USER on irc.oftc.net:6667)
//! murmur
//!
//! # Pick a server, nickname and password
//! murmur -h irc.example.net -p 6697 -n alice -k hunter2
//! ```

use std::{io::Write, process::ExitCode, time::Duration};

use clap::{ArgAction, Parser};
use murmur_client::{CleartextAdapter, Client, ClientConfig, SystemEnv, connect};
use murmur_core::KeepaliveConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Nickname used when neither `-n` nor `$USER` provides one.
const FALLBACK_NICK: &str = "unknown";

/// Murmur terminal client
#[derive(Parser, Debug)]
#[command(name = "murmur")]
#[command(about = "Terminal chat relay with pluggable secure messaging")]
#[command(version)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Server host
    #[arg(short = 'h', long, default_value = "irc.oftc.net")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = 6667)]
    port: u16,

    /// Nickname (defaults to $USER)
    #[arg(short, long)]
    nick: Option<String>,

    /// Connection password
    #[arg(short, long)]
    key: Option<String>,

    /// Seconds of silence before probing the server
    #[arg(long, default_value_t = 120)]
    ping_interval: u64,

    /// Seconds of server silence before giving up
    #[arg(long, default_value_t = 300)]
    timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Args {
    fn into_config(self) -> ClientConfig {
        let nick = self
            .nick
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| FALLBACK_NICK.to_owned());
        ClientConfig {
            host: self.host,
            port: self.port,
            nick,
            key: self.key,
            keepalive: KeepaliveConfig::new(
                Duration::from_secs(self.ping_interval),
                Duration::from_secs(self.timeout),
            ),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = args.into_config();
    tracing::debug!(?config, "murmur starting");

    let err = match connect(&config).await {
        Ok(stream) => {
            let mut client = Client::new(CleartextAdapter::new(), &config, SystemEnv::new());
            match client.run(stream, tokio::io::stdin(), tokio::io::stdout()).await {
                Ok(()) => return ExitCode::SUCCESS,
                Err(err) => err,
            }
        },
        Err(err) => err,
    };

    tracing::error!(%err, "session ended");
    let _ = writeln!(std::io::stderr(), "murmur: {err}");
    ExitCode::FAILURE
}
