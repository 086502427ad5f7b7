//! Link actor: single owner of the socket lifecycle and the reader task.
//!
//! All lifecycle transitions (connect, teardown, loss) are funneled through
//! one command loop so a send can never race a concurrent close and two
//! reader tasks can never serve one socket.

use crate::domain::models::{
    AppEvent, LinkCommand, LinkState, MessageSeverity, MotorCommand, StatusMessage,
};
use crate::infrastructure::link::codec;
use crate::infrastructure::link::framing::FrameAccumulator;
use crate::infrastructure::link::transport::{ByteSource, Connector, LinkError, LinkWriter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Connection knobs the actor needs from the settings file.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub device_name: String,
    pub connect_timeout: Duration,
    pub send_timeout: Duration,
}

pub struct LinkManager {
    connector: Box<dyn Connector>,
    config: LinkConfig,
    events: mpsc::UnboundedSender<AppEvent>,
    /// Handed to reader tasks so they can report their exit back into the
    /// command loop.
    commands: mpsc::UnboundedSender<LinkCommand>,
    state: LinkState,
    writer: Option<Box<dyn LinkWriter>>,
    reader: Option<tokio::task::JoinHandle<()>>,
    shutdown: Arc<Notify>,
    /// Bumped per successful connect; stale reader exits are ignored.
    generation: u64,
}

impl LinkManager {
    pub fn new(
        connector: Box<dyn Connector>,
        config: LinkConfig,
        events: mpsc::UnboundedSender<AppEvent>,
        commands: mpsc::UnboundedSender<LinkCommand>,
    ) -> Self {
        Self {
            connector,
            config,
            events,
            commands,
            state: LinkState::Disconnected,
            writer: None,
            reader: None,
            shutdown: Arc::new(Notify::new()),
            generation: 0,
        }
    }

    /// Drive the actor until every command sender is dropped.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<LinkCommand>) {
        while let Some(command) = rx.recv().await {
            match command {
                LinkCommand::Connect => self.handle_connect().await,
                LinkCommand::Disconnect => self.handle_disconnect().await,
                LinkCommand::Send(motor_command) => self.handle_send(motor_command).await,
                LinkCommand::ReaderClosed { generation, error } => {
                    self.handle_reader_closed(generation, error).await
                }
            }
        }
        self.close_socket().await;
    }

    fn set_state(&mut self, state: LinkState) {
        if self.state != state {
            debug!(?state, "link state changed");
        }
        self.state = state.clone();
        let _ = self.events.send(AppEvent::LinkState(state));
    }

    fn notify(&self, severity: MessageSeverity, message: impl Into<String>) {
        let _ = self.events.send(AppEvent::Notice(StatusMessage {
            message: message.into(),
            severity,
        }));
    }

    async fn handle_connect(&mut self) {
        // A new connect invalidates whatever socket came before it.
        self.close_socket().await;

        self.set_state(LinkState::Searching);
        self.notify(
            MessageSeverity::Info,
            format!("Searching for '{}'...", self.config.device_name),
        );
        let resolved = timeout(
            self.config.connect_timeout,
            self.connector.resolve(&self.config.device_name),
        )
        .await
        .unwrap_or_else(|_| {
            Err(LinkError::ConnectFailed(
                "bonded device lookup timed out".into(),
            ))
        });
        let peer = match resolved {
            Ok(peer) => peer,
            Err(e) => return self.fail_connect(e),
        };

        self.set_state(LinkState::Connecting);
        self.notify(MessageSeverity::Info, format!("Connecting to {}...", peer.name));
        let opened = timeout(self.config.connect_timeout, self.connector.open(&peer))
            .await
            .unwrap_or_else(|_| {
                Err(LinkError::ConnectFailed(format!(
                    "no response after {:?}",
                    self.config.connect_timeout
                )))
            });
        let pair = match opened {
            Ok(pair) => pair,
            Err(e) => return self.fail_connect(e),
        };

        info!(peer = %peer.address, "link established");
        self.generation += 1;
        self.shutdown = Arc::new(Notify::new());
        self.writer = Some(pair.writer);
        self.reader = Some(tokio::spawn(read_frames(
            pair.source,
            self.generation,
            self.events.clone(),
            self.commands.clone(),
            self.shutdown.clone(),
        )));
        self.set_state(LinkState::Connected);
        self.notify(
            MessageSeverity::Success,
            "Connection established. Motor commands enabled.",
        );
    }

    fn fail_connect(&mut self, error: LinkError) {
        warn!(%error, "connect attempt failed");
        self.set_state(LinkState::Error(error.to_string()));
        self.notify(MessageSeverity::Error, error.to_string());
        self.set_state(LinkState::Disconnected);
    }

    async fn handle_send(&mut self, command: MotorCommand) {
        if self.state != LinkState::Connected || self.writer.is_none() {
            let error = LinkError::SendFailed("link is not connected".into());
            self.notify(MessageSeverity::Error, error.to_string());
            return;
        }

        let frame = codec::encode(&command);
        let send_timeout = self.config.send_timeout;
        let sent = match self.writer.as_mut() {
            Some(writer) => timeout(send_timeout, writer.send(frame.as_bytes())).await,
            None => return,
        };
        match sent {
            Ok(Ok(())) => info!(%frame, "command sent"),
            Ok(Err(e)) => self.mark_lost(e).await,
            Err(_) => {
                let error = LinkError::SendFailed(format!(
                    "no write progress after {send_timeout:?}"
                ));
                self.mark_lost(error).await;
            }
        }
    }

    async fn handle_disconnect(&mut self) {
        if self.state == LinkState::Disconnected && self.writer.is_none() {
            // Already torn down; closing twice must stay harmless.
            return;
        }
        self.close_socket().await;
        self.set_state(LinkState::Disconnected);
        self.notify(MessageSeverity::Info, "Disconnected.");
    }

    async fn handle_reader_closed(&mut self, generation: u64, error: Option<String>) {
        if generation != self.generation {
            debug!(generation, "stale reader exit ignored");
            return;
        }
        if self.state != LinkState::Connected {
            return;
        }
        let reason = match error {
            Some(e) => LinkError::ReadFailed(e).to_string(),
            None => "Peer closed the connection".to_string(),
        };
        self.notify(MessageSeverity::Error, reason);
        self.close_socket().await;
        self.set_state(LinkState::Lost);
    }

    async fn mark_lost(&mut self, error: LinkError) {
        warn!(%error, "link lost");
        self.notify(MessageSeverity::Error, error.to_string());
        self.close_socket().await;
        self.set_state(LinkState::Lost);
    }

    /// Drop both halves and stop the reader; safe to call in any state and
    /// any number of times.
    async fn close_socket(&mut self) {
        self.shutdown.notify_one();
        if let Some(mut writer) = self.writer.take() {
            writer.shutdown().await;
        }
        // The reader exits through the shutdown notification (or its own
        // end-of-stream); the handle is only kept so it is not detached
        // silently while the link is up.
        self.reader.take();
    }
}

/// Reader task: the single consumer of the peer's byte stream for one
/// socket's lifetime.
async fn read_frames(
    mut source: Box<dyn ByteSource>,
    generation: u64,
    events: mpsc::UnboundedSender<AppEvent>,
    commands: mpsc::UnboundedSender<LinkCommand>,
    shutdown: Arc<Notify>,
) {
    let mut accumulator = FrameAccumulator::new();
    let mut buf = [0u8; 256];
    let error = loop {
        tokio::select! {
            _ = shutdown.notified() => {
                debug!("reader shut down");
                return;
            }
            read = source.read_chunk(&mut buf) => match read {
                Ok(0) => break None,
                Ok(n) => {
                    for frame in accumulator.push(&buf[..n]) {
                        info!(%frame, "frame received");
                        let _ = events.send(AppEvent::FrameReceived(frame));
                    }
                }
                Err(e) => break Some(e.to_string()),
            }
        }
    };
    let _ = commands.send(LinkCommand::ReaderClosed { generation, error });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Direction;
    use crate::infrastructure::link::transport::{IoByteSource, IoLinkWriter, LinkPair, Peer};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

    struct TestConnector {
        peer_found: bool,
        remotes: Mutex<mpsc::UnboundedSender<DuplexStream>>,
    }

    #[async_trait]
    impl Connector for TestConnector {
        async fn resolve(&self, device_name: &str) -> Result<Peer, LinkError> {
            if self.peer_found {
                Ok(Peer {
                    name: device_name.to_string(),
                    address: "00:11:22:33:44:55".to_string(),
                })
            } else {
                Err(LinkError::PeerNotFound(device_name.to_string()))
            }
        }

        async fn open(&self, _peer: &Peer) -> Result<LinkPair, LinkError> {
            let (local, remote) = tokio::io::duplex(256);
            let (read_half, write_half) = tokio::io::split(local);
            self.remotes.lock().unwrap().send(remote).unwrap();
            Ok(LinkPair {
                writer: Box::new(IoLinkWriter::new(write_half)),
                source: Box::new(IoByteSource::new(read_half)),
            })
        }
    }

    struct Harness {
        commands: mpsc::UnboundedSender<LinkCommand>,
        events: mpsc::UnboundedReceiver<AppEvent>,
        remotes: mpsc::UnboundedReceiver<DuplexStream>,
    }

    fn spawn_manager(peer_found: bool) -> Harness {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (remote_tx, remote_rx) = mpsc::unbounded_channel();

        let connector = TestConnector {
            peer_found,
            remotes: Mutex::new(remote_tx),
        };
        let config = LinkConfig {
            device_name: "ESP32MotorControl".to_string(),
            connect_timeout: Duration::from_millis(500),
            send_timeout: Duration::from_millis(500),
        };
        let manager = LinkManager::new(Box::new(connector), config, event_tx, command_tx.clone());
        tokio::spawn(manager.run(command_rx));

        Harness {
            commands: command_tx,
            events: event_rx,
            remotes: remote_rx,
        }
    }

    async fn next_state(harness: &mut Harness) -> LinkState {
        loop {
            let event = timeout(Duration::from_secs(1), harness.events.recv())
                .await
                .expect("no event within 1s")
                .expect("event channel closed");
            if let AppEvent::LinkState(state) = event {
                return state;
            }
        }
    }

    async fn connect(harness: &mut Harness) -> DuplexStream {
        harness.commands.send(LinkCommand::Connect).unwrap();
        assert_eq!(next_state(harness).await, LinkState::Searching);
        assert_eq!(next_state(harness).await, LinkState::Connecting);
        assert_eq!(next_state(harness).await, LinkState::Connected);
        harness.remotes.recv().await.expect("no remote end")
    }

    #[tokio::test]
    async fn connect_walks_through_the_progress_states() {
        let mut harness = spawn_manager(true);
        let _remote = connect(&mut harness).await;
    }

    #[tokio::test]
    async fn missing_peer_surfaces_error_then_disconnected() {
        let mut harness = spawn_manager(false);
        harness.commands.send(LinkCommand::Connect).unwrap();

        assert_eq!(next_state(&mut harness).await, LinkState::Searching);
        match next_state(&mut harness).await {
            LinkState::Error(reason) => assert!(reason.contains("ESP32MotorControl")),
            other => panic!("expected error state, got {other:?}"),
        }
        assert_eq!(next_state(&mut harness).await, LinkState::Disconnected);
    }

    #[tokio::test]
    async fn send_writes_the_encoded_frame() {
        let mut harness = spawn_manager(true);
        let mut remote = connect(&mut harness).await;

        harness
            .commands
            .send(LinkCommand::Send(MotorCommand {
                direction: Direction::Right,
                steps: 15,
            }))
            .unwrap();

        let mut buf = [0u8; 5];
        timeout(Duration::from_secs(1), remote.read_exact(&mut buf))
            .await
            .expect("no bytes within 1s")
            .unwrap();
        assert_eq!(&buf, b"&R015");
    }

    #[tokio::test]
    async fn frames_from_the_peer_reach_the_ui() {
        let mut harness = spawn_manager(true);
        let mut remote = connect(&mut harness).await;

        remote.write_all(b"ready\r\n").await.unwrap();

        let frame = loop {
            let event = timeout(Duration::from_secs(1), harness.events.recv())
                .await
                .expect("no event within 1s")
                .expect("event channel closed");
            if let AppEvent::FrameReceived(frame) = event {
                break frame;
            }
        };
        assert_eq!(frame, "ready");
    }

    #[tokio::test]
    async fn peer_drop_marks_lost_and_later_sends_fail_fast() {
        let mut harness = spawn_manager(true);
        let remote = connect(&mut harness).await;

        drop(remote);
        assert_eq!(next_state(&mut harness).await, LinkState::Lost);

        harness
            .commands
            .send(LinkCommand::Send(MotorCommand {
                direction: Direction::Left,
                steps: 1,
            }))
            .unwrap();
        let notice = loop {
            let event = timeout(Duration::from_secs(1), harness.events.recv())
                .await
                .expect("no event within 1s")
                .expect("event channel closed");
            if let AppEvent::Notice(notice) = event {
                break notice;
            }
        };
        assert_eq!(notice.severity, MessageSeverity::Error);
        assert!(notice.message.contains("send failed"));
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let mut harness = spawn_manager(true);
        let _remote = connect(&mut harness).await;

        harness.commands.send(LinkCommand::Disconnect).unwrap();
        assert_eq!(next_state(&mut harness).await, LinkState::Disconnected);
        // Drain the "Disconnected." notice that follows the transition.
        let _ = timeout(Duration::from_millis(200), harness.events.recv()).await;

        harness.commands.send(LinkCommand::Disconnect).unwrap();
        // The second disconnect is swallowed; nothing further is emitted.
        let extra = timeout(Duration::from_millis(200), harness.events.recv()).await;
        assert!(extra.is_err(), "unexpected event {extra:?}");
    }

    #[tokio::test]
    async fn reconnect_replaces_the_previous_socket() {
        let mut harness = spawn_manager(true);
        let _first = connect(&mut harness).await;

        harness.commands.send(LinkCommand::Connect).unwrap();
        assert_eq!(next_state(&mut harness).await, LinkState::Searching);
        assert_eq!(next_state(&mut harness).await, LinkState::Connecting);
        assert_eq!(next_state(&mut harness).await, LinkState::Connected);
        let mut second = harness.remotes.recv().await.expect("no second remote");

        // The new socket carries traffic; the old reader's exit must not
        // have torn the new link down.
        harness
            .commands
            .send(LinkCommand::Send(MotorCommand {
                direction: Direction::Left,
                steps: 7,
            }))
            .unwrap();
        let mut buf = [0u8; 5];
        timeout(Duration::from_secs(1), second.read_exact(&mut buf))
            .await
            .expect("no bytes within 1s")
            .unwrap();
        assert_eq!(&buf, b"&L007");
    }
}
