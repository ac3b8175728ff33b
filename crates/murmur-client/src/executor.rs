//! Executes dispatcher actions against the remote stream and the terminal.

use chrono::{Local, NaiveDateTime};
use murmur_core::{Action, render_line};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::ClientError;

/// Protocol line terminator.
const LINE_END: &[u8] = b"\r\n";

/// Performs the I/O the dispatcher asks for.
///
/// Owns the remote write half and the display sink. Actions run strictly in
/// the order given.
#[derive(Debug)]
pub struct ActionExecutor<W, D> {
    remote: W,
    display: D,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl<W, D> ActionExecutor<W, D>
where
    W: AsyncWrite + Unpin,
    D: AsyncWrite + Unpin,
{
    /// Create an executor stamping display lines with local wall-clock time.
    pub fn new(remote: W, display: D) -> Self {
        Self { remote, display, clock: local_now }
    }

    /// Replace the display timestamp source.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Write one protocol line and flush it.
    pub async fn send_line(&mut self, line: &str) -> Result<(), ClientError> {
        tracing::trace!(command = line.split(' ').next().unwrap_or_default(), "send");
        self.remote.write_all(line.as_bytes()).await?;
        self.remote.write_all(LINE_END).await?;
        self.remote.flush().await?;
        Ok(())
    }

    /// Execute `actions` in order.
    ///
    /// Stops at the first failure. A shutdown action ends the session with
    /// [`ClientError::KeepaliveExpired`].
    pub async fn execute(&mut self, actions: Vec<Action>) -> Result<(), ClientError> {
        for action in actions {
            match action {
                Action::Send(line) => self.send_line(&line).await?,
                Action::Display { target, text } => self.show(&target, &text).await?,
                Action::Shutdown { reason } => {
                    return Err(ClientError::KeepaliveExpired { reason });
                },
            }
        }
        Ok(())
    }

    async fn show(&mut self, target: &str, text: &str) -> Result<(), ClientError> {
        let mut line = render_line(target, (self.clock)(), text);
        line.push('\n');
        self.display.write_all(line.as_bytes()).await?;
        self.display.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn fixed() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(14, 5, 0).unwrap()
    }

    #[tokio::test]
    async fn sends_are_crlf_terminated() {
        let mut executor = ActionExecutor::new(Vec::new(), Vec::new());

        executor
            .execute(vec![Action::Send("JOIN #room".to_owned()), Action::Send("PING x".to_owned())])
            .await
            .unwrap();

        assert_eq!(executor.remote, b"JOIN #room\r\nPING x\r\n");
        assert!(executor.display.is_empty());
    }

    #[tokio::test]
    async fn display_lines_are_rendered() {
        let mut executor = ActionExecutor::new(Vec::new(), Vec::new()).with_clock(fixed);

        executor.execute(vec![Action::display("#room", "joining")]).await.unwrap();

        let shown = String::from_utf8(executor.display).unwrap();
        assert_eq!(shown, "#room       : 03/09/24 14:05 joining\n");
    }

    #[tokio::test]
    async fn shutdown_stops_execution() {
        let mut executor = ActionExecutor::new(Vec::new(), Vec::new());

        let result = executor
            .execute(vec![
                Action::Shutdown { reason: "parse timeout".to_owned() },
                Action::Send("PING x".to_owned()),
            ])
            .await;

        assert!(matches!(result, Err(ClientError::KeepaliveExpired { .. })));
        assert!(executor.remote.is_empty());
    }
}
