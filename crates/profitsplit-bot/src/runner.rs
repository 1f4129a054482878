//! Long-polling loop.
//!
//! Updates are handled strictly one at a time in arrival order. The offset
//! is advanced before a command runs, so a crash mid-command never replays
//! it. Transport failures are logged and retried after a fixed back-off.

use std::{future::Future, time::Duration};

use tracing::{debug, error, info};

use crate::{
    command::Command,
    error::Result,
    handler::CommandHandler,
    telegram::{ChatTransport, Update},
};

/// Pause after a failed poll before trying again.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

pub struct Runner<T> {
    transport: T,
    handler: CommandHandler,
    bot_username: Option<String>,
    offset: i64,
    poll_timeout: Duration,
    backoff: Duration,
}

impl<T: ChatTransport> Runner<T> {
    pub fn new(transport: T, handler: CommandHandler, poll_timeout: Duration) -> Self {
        Self {
            transport,
            handler,
            bot_username: None,
            offset: 0,
            poll_timeout,
            backoff: DEFAULT_BACKOFF,
        }
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Next update id the runner will ask for.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Resolve the bot's username and optionally drop the queued backlog.
    pub async fn prepare(&mut self, drop_pending: bool) -> Result<()> {
        self.bot_username = self.transport.bot_username().await?;
        if drop_pending {
            self.transport.drop_pending_updates().await?;
            info!("pending updates dropped");
        }
        info!(username = ?self.bot_username, "bot identity resolved");
        Ok(())
    }

    /// Poll until `shutdown` resolves.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> Result<()> {
        tokio::pin!(shutdown);
        info!("polling for updates");

        loop {
            let polled = tokio::select! {
                () = &mut shutdown => break,
                polled = self.transport.get_updates(self.offset, self.poll_timeout) => polled,
            };

            match polled {
                Ok(updates) => {
                    for update in &updates {
                        self.process(update).await;
                    }
                }
                Err(err) => {
                    error!("polling failed: {err}");
                    tokio::select! {
                        () = &mut shutdown => break,
                        () = tokio::time::sleep(self.backoff) => {}
                    }
                }
            }
        }

        // Confirm the processed offset so nothing is redelivered on restart.
        if let Err(err) = self.transport.get_updates(self.offset, Duration::ZERO).await {
            error!("final offset acknowledgement failed: {err}");
        }
        info!(offset = self.offset, "polling stopped");
        Ok(())
    }

    /// Handle one update, replying in the originating chat.
    pub async fn process(&mut self, update: &Update) {
        self.offset = self.offset.max(update.update_id + 1);

        let Some(message) = &update.message else {
            return;
        };
        let (Some(text), Some(from)) = (&message.text, &message.from) else {
            return;
        };
        let Some(command) = Command::parse(text, self.bot_username.as_deref()) else {
            debug!(update_id = update.update_id, "not a command for us");
            return;
        };

        let reply = self.handler.handle(from.id, &command).await;
        if let Err(err) = self.transport.send(message.chat.id, &reply).await {
            error!(chat_id = message.chat.id, command = %command.kind, "reply failed: {err}");
        }
    }
}

/// Resolve on SIGINT or SIGTERM (Ctrl+C elsewhere).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => info!("received SIGINT, shutting down"),
                    _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                }
            }
            _ => {
                error!("failed to install signal handlers, falling back to Ctrl+C");
                wait_for(tokio::signal::ctrl_c(), "Ctrl+C").await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_for(tokio::signal::ctrl_c(), "Ctrl+C").await;
}

/// Wait on a signal listener. A listener that cannot be installed never
/// resolves, so the bot keeps running instead of stopping at startup.
async fn wait_for(listener: impl Future<Output = std::io::Result<()>>, name: &str) {
    match listener.await {
        Ok(()) => info!("received {name}, shutting down"),
        Err(err) => {
            error!("cannot listen for {name}, signal shutdown disabled: {err}");
            std::future::pending::<()>().await;
        }
    }
}
