//! Session engine: the single actor that owns the server connection.
//!
//! Startup: connect, handshake, open the log target, start the rotation
//! timer. Then every inbound line is handled strictly in receive order:
//!
//! 1. blank lines are dropped
//! 2. `PING` is answered with `PONG`
//! 3. an admin's `history [n]` replays the tail of the history buffer
//! 4. a `JOIN` delivers the joiner's pending memos
//! 5. an admin's `memo <nick>: <text>` stores a memo
//! 6. everything except 1 and 2 is logged and pushed to history
//!
//! The session lock is never held across a network send or a pacing delay.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use ilog_core::protocol::{outbound, parse_admin_command, AdminCommand};
use ilog_core::{classify, LineEvent, Memo, SessionConfig, SinkError};
use ilog_cron::{OnTickFn, RotationSchedule, RotationService};

use crate::connection::{LineReader, LineWriter};
use crate::error::SessionError;
use crate::state::SessionState;

pub struct SessionEngine {
    config: Arc<SessionConfig>,
    state: Arc<Mutex<SessionState>>,
    schedule: RotationSchedule,
}

impl SessionEngine {
    /// Build an engine; fails only if the rotation schedule is malformed.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let schedule = RotationSchedule::parse(&config.rotate_every)?;
        let state = SessionState::new(&config);
        Ok(Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(state)),
            schedule,
        })
    }

    /// Replace the rotation schedule parsed from the config.
    pub fn with_schedule(mut self, schedule: RotationSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Shared handle to the session's critical section.
    pub fn state(&self) -> Arc<Mutex<SessionState>> {
        self.state.clone()
    }

    /// Connect to the configured server and run until the connection ends.
    pub async fn run(&self) -> Result<(), SessionError> {
        let server = self.config.server.clone();
        let port = self.config.port;
        info!(server = %server, port, "connecting");

        let stream = TcpStream::connect((server.as_str(), port))
            .await
            .map_err(|source| SessionError::Connect {
                server: server.clone(),
                port,
                source,
            })?;
        info!(server = %server, port, "connected");

        self.run_on(stream).await
    }

    /// Run the session over an already-established byte stream.
    pub async fn run_on<S>(&self, stream: S) -> Result<(), SessionError>
    where
        S: AsyncRead + AsyncWrite + Send,
    {
        let (read, write) = tokio::io::split(stream);
        let mut reader = LineReader::new(read);
        let mut writer = LineWriter::new(write);

        let channel = self.config.wire_channel();
        for line in outbound::handshake(&self.config.nick, &channel) {
            writer.send(&line).await?;
        }
        info!(nick = %self.config.nick, channel = %channel, "registered");

        self.rotate_now().await?;

        let rotation = Arc::new(RotationService::new(
            self.schedule.clone(),
            self.rotation_callback(),
        ));
        let timer = tokio::spawn({
            let rotation = rotation.clone();
            async move { rotation.start().await }
        });

        let result = self.read_loop(&mut reader, &mut writer).await;

        rotation.stop();
        match timer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "rotation timer exited with error"),
            Err(e) => warn!(error = %e, "rotation timer task failed"),
        }

        if let Err(e) = writer.shutdown().await {
            debug!(error = %e, "connection shutdown failed");
        }
        result
    }

    /// Re-derive the log target now, under the session lock.
    pub async fn rotate_now(&self) -> Result<(), SinkError> {
        self.state.lock().await.sink.rotate(Utc::now())
    }

    fn rotation_callback(&self) -> OnTickFn {
        let state = self.state.clone();
        Arc::new(move || {
            let state = state.clone();
            Box::pin(async move {
                state
                    .lock()
                    .await
                    .sink
                    .rotate(Utc::now())
                    .context("log rotation failed")
            })
        })
    }

    async fn read_loop<R, W>(
        &self,
        reader: &mut LineReader<R>,
        writer: &mut LineWriter<W>,
    ) -> Result<(), SessionError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        while let Some(line) = reader.next_line().await? {
            self.handle_line(&line, writer).await?;
        }
        info!("connection closed by server");
        Ok(())
    }

    async fn handle_line<W>(
        &self,
        line: &str,
        writer: &mut LineWriter<W>,
    ) -> Result<(), SessionError>
    where
        W: AsyncWrite + Unpin,
    {
        if line.trim().is_empty() {
            return Ok(());
        }

        let event = classify(line);
        match &event {
            LineEvent::Ping { token } => {
                debug!(token = %token, "ping");
                return writer.send(&outbound::pong(token)).await;
            }
            LineEvent::ChatMessage { sender, text, .. } if self.config.is_admin(sender) => {
                match parse_admin_command(text) {
                    Some(AdminCommand::History { count }) => {
                        self.replay_history(sender, count, writer).await?;
                    }
                    Some(AdminCommand::Memo { recipient, text }) => {
                        self.store_memo(sender, &recipient, &text).await;
                    }
                    None => {}
                }
            }
            LineEvent::Join { nick } => {
                self.deliver_memos(nick, writer).await?;
            }
            _ => {}
        }

        let display = event.display(line);
        self.state.lock().await.record(Utc::now(), &display)?;
        Ok(())
    }

    async fn replay_history<W>(
        &self,
        requester: &str,
        count: Option<usize>,
        writer: &mut LineWriter<W>,
    ) -> Result<(), SessionError>
    where
        W: AsyncWrite + Unpin,
    {
        let count = count.unwrap_or(self.config.history_default);
        let entries = self.state.lock().await.history.tail(count);
        info!(requester = %requester, lines = entries.len(), "replaying history");

        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.send_delay).await;
            }
            writer.send(&outbound::privmsg(requester, entry)).await?;
        }
        Ok(())
    }

    async fn store_memo(&self, author: &str, recipient: &str, text: &str) {
        let memo = Memo::new(author, Utc::now(), text);
        let mut state = self.state.lock().await;
        state.memos.add(recipient, memo);
        info!(
            author = %author,
            recipient = %recipient,
            pending = state.memos.pending_for(recipient),
            "memo stored"
        );
    }

    async fn deliver_memos<W>(
        &self,
        nick: &str,
        writer: &mut LineWriter<W>,
    ) -> Result<(), SessionError>
    where
        W: AsyncWrite + Unpin,
    {
        let memos = self.state.lock().await.memos.drain(nick);
        if memos.is_empty() {
            return Ok(());
        }
        info!(recipient = %nick, count = memos.len(), "delivering memos");

        let channel = self.config.wire_channel();
        for (i, memo) in memos.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.send_delay).await;
            }
            let announcement = memo.announcement(nick);
            writer.send(&outbound::privmsg(&channel, &announcement)).await?;

            let display = format!("{}: {}", self.config.nick, announcement);
            self.state.lock().await.record(Utc::now(), &display)?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
