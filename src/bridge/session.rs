//! Bridge session - connection state machine and per-tick protocol drive
//!
//! The session owns everything stateful on the link: the connection, the
//! frame parser, the outbound sequence counter, and the heartbeat timer.
//! It is driven by an external caller invoking `on_tick` once per
//! scheduling cycle and never blocks:
//! - each tick accumulates elapsed time and emits at most one heartbeat
//! - each tick drains whatever inbound bytes are pending and routes every
//!   completed frame
//!
//! The session does NOT handle:
//! - Tick scheduling (that's the caller's responsibility)
//! - Reconnection policy (the caller decides if and when to retry)

use crate::bridge::stats::Stats;
use crate::config::Config;
use crate::constants::{HEARTBEAT_PERIOD_SECS, RECV_BUFFER_SIZE};
use crate::error::Result;
use crate::mavlink::{
    interpret, DecodedMessage, Frame, FrameParser, FrameWriter, MAV_TYPE_QUADROTOR,
    MSG_ID_STATUSTEXT,
};
use crate::transport::{TcpTransport, Transport};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Heartbeat emission period
const HEARTBEAT_PERIOD: Duration = Duration::from_secs(HEARTBEAT_PERIOD_SECS);

/// Connection state, owned exclusively by the session
///
/// Transitions only on explicit connect/disconnect (or transport close),
/// never on decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Link parameters for a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub server_ip: String,
    pub server_port: u16,
    pub system_id: u8,
    pub component_id: u8,
    pub target_system: u8,
    pub target_component: u8,
    pub statustext_interval_us: i32,
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            server_ip: config.connection.server_ip.clone(),
            server_port: config.connection.server_port,
            system_id: config.link.system_id,
            component_id: config.link.component_id,
            target_system: config.link.target_system,
            target_component: config.link.target_component,
            statustext_interval_us: config.link.statustext_interval_us,
        }
    }
}

/// Tick-driven MAVLink session
pub struct Session {
    config: SessionConfig,
    state: ConnectionState,
    transport: Option<Box<dyn Transport>>,
    parser: FrameParser,
    writer: FrameWriter,
    /// Time accumulated toward the next heartbeat
    heartbeat_elapsed: Duration,
    /// Parser drop count already mirrored into the shared stats
    drops_mirrored: u64,
    stats: Arc<Stats>,
    /// Decoded text events for the caller (dropped with a warning if full)
    text_tx: Option<mpsc::Sender<String>>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        stats: Arc<Stats>,
        text_tx: Option<mpsc::Sender<String>>,
    ) -> Self {
        let writer = FrameWriter::new(config.system_id, config.component_id);
        Self {
            config,
            state: ConnectionState::Disconnected,
            transport: None,
            parser: FrameParser::new(),
            writer,
            heartbeat_elapsed: Duration::ZERO,
            drops_mirrored: 0,
            stats,
            text_tx,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Open the transport and request STATUSTEXT streaming
    ///
    /// On failure the session stays Disconnected and the error is returned
    /// to the caller; no retry is attempted here.
    pub fn connect(&mut self) -> Result<()> {
        if self.state == ConnectionState::Connected {
            self.disconnect();
        }

        let transport = TcpTransport::connect(&self.config.server_ip, self.config.server_port)?;
        self.transport = Some(Box::new(transport));
        self.state = ConnectionState::Connected;
        self.heartbeat_elapsed = Duration::ZERO;
        info!(
            "Connected to MAVLink server at {}:{}",
            self.config.server_ip, self.config.server_port
        );

        let request = self.writer.write_set_message_interval(
            self.config.target_system,
            self.config.target_component,
            MSG_ID_STATUSTEXT,
            self.config.statustext_interval_us,
        );
        self.send_frame(&request);
        debug!(
            interval_us = self.config.statustext_interval_us,
            "Requested STATUSTEXT stream"
        );
        Ok(())
    }

    /// Close the transport; idempotent
    pub fn disconnect(&mut self) {
        if self.transport.take().is_some() {
            info!("Disconnected from MAVLink server");
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Advance the session by one scheduling tick
    ///
    /// Emits at most one heartbeat per tick. On firing, one period is
    /// subtracted from the accumulator (not zeroed) so the long-run cadence
    /// stays at the configured period under any tick rate; the remainder is
    /// capped at one period so a stalled scheduler produces a single
    /// catch-up beat. A no-op while Disconnected.
    pub fn on_tick(&mut self, elapsed: Duration) {
        if self.state == ConnectionState::Disconnected {
            return;
        }

        self.heartbeat_elapsed += elapsed;
        if self.heartbeat_elapsed >= HEARTBEAT_PERIOD {
            self.heartbeat_elapsed -= HEARTBEAT_PERIOD;
            if self.heartbeat_elapsed > HEARTBEAT_PERIOD {
                self.heartbeat_elapsed = HEARTBEAT_PERIOD;
            }
            let heartbeat = self.writer.write_heartbeat();
            self.send_frame(&heartbeat);
            self.stats.add_heartbeat_tx();
            trace!("Sent heartbeat");
        }

        self.drain();
    }

    /// Drain all currently pending inbound bytes through the parser
    fn drain(&mut self) {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        loop {
            let Some(transport) = self.transport.as_mut() else {
                break;
            };
            match transport.recv(&mut buf) {
                Ok(None) => break,
                Ok(Some(0)) => {
                    info!("Server closed the connection");
                    self.disconnect();
                    break;
                }
                Ok(Some(n)) => {
                    self.stats.add_rx(n);
                    let mut frames = Vec::new();
                    self.parser.feed_slice(&buf[..n], |frame| frames.push(frame));
                    for frame in frames {
                        self.route(frame);
                    }
                }
                Err(e) => {
                    warn!("Read failed: {}", e);
                    self.disconnect();
                    break;
                }
            }
        }

        // Corruption is not an error, just a dropped-frame counter
        let parser = self.parser.stats();
        let dropped = (parser.checksum_mismatches + parser.unsupported_skipped) as u64;
        if dropped > self.drops_mirrored {
            self.stats.add_frames_dropped(dropped - self.drops_mirrored);
            self.drops_mirrored = dropped;
        }
    }

    /// Interpret one frame and emit the resulting events
    fn route(&mut self, frame: Frame) {
        self.stats.add_frame_rx();
        match interpret(&frame) {
            DecodedMessage::Heartbeat(heartbeat) => {
                let mode = heartbeat.mode_name();
                debug!(
                    vehicle_type = heartbeat.vehicle_type,
                    autopilot = heartbeat.autopilot,
                    base_mode = heartbeat.base_mode,
                    system_status = heartbeat.system_status,
                    mode = %mode,
                    "Heartbeat"
                );
                // Mode text is only surfaced for the vehicle class we track
                if heartbeat.vehicle_type == MAV_TYPE_QUADROTOR {
                    self.emit_text(mode);
                }
            }
            DecodedMessage::StatusText(status) => {
                info!(severity = status.severity, "Status: {}", status.text);
                self.emit_text(status.text);
            }
            DecodedMessage::Unknown { message_id } => {
                trace!(message_id, "Ignored message");
            }
        }
    }

    /// Hand a text event to the caller, in arrival order
    fn emit_text(&mut self, text: String) {
        self.stats.add_text_event();
        if let Some(tx) = &self.text_tx {
            if tx.try_send(text).is_err() {
                warn!("Text event channel full, dropping message");
            }
        }
    }

    /// Write one outbound frame; a failed send drops the frame, no retry
    fn send_frame(&mut self, frame: &[u8]) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        match transport.send(frame) {
            Ok(()) => self.stats.add_tx(frame.len()),
            Err(e) => warn!("{}; frame dropped, no retry", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn test_config(port: u16) -> SessionConfig {
        SessionConfig {
            server_ip: "127.0.0.1".into(),
            server_port: port,
            system_id: 255,
            component_id: 0,
            target_system: 1,
            target_component: 1,
            statustext_interval_us: 1_000_000,
        }
    }

    fn connected_session() -> (Session, TcpListener, std::net::TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut session = Session::new(test_config(port), Arc::new(Stats::new()), None);
        session.connect().unwrap();
        let (peer, _) = listener.accept().unwrap();
        (session, listener, peer)
    }

    #[test]
    fn connect_failure_stays_disconnected() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut session = Session::new(test_config(port), Arc::new(Stats::new()), None);
        assert!(session.connect().is_err());
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn connect_transitions_and_requests_statustext() {
        let (session, _listener, _peer) = connected_session();
        assert_eq!(session.state(), ConnectionState::Connected);
        // One COMMAND_LONG frame (33-byte payload + 8 framing bytes)
        assert_eq!(session.stats.tx_bytes(), 41);
    }

    #[test]
    fn heartbeat_cadence_at_point_three_seconds() {
        let (mut session, _listener, _peer) = connected_session();
        let tick = Duration::from_millis(300);

        let mut fired = Vec::new();
        for n in 1..=7 {
            session.on_tick(tick);
            if session.stats.heartbeats_tx() as usize > fired.len() {
                fired.push(n);
            }
        }
        // Cumulative >= 1.0s on tick 4, and again (with carry) on tick 7
        assert_eq!(fired, vec![4, 7]);
    }

    #[test]
    fn single_long_tick_fires_once() {
        let (mut session, _listener, _peer) = connected_session();
        session.on_tick(Duration::from_millis(2_500));
        assert_eq!(session.stats.heartbeats_tx(), 1);
    }

    #[test]
    fn disconnect_is_idempotent_and_ticks_are_noops() {
        let (mut session, _listener, _peer) = connected_session();
        session.disconnect();
        session.disconnect();
        assert_eq!(session.state(), ConnectionState::Disconnected);

        session.on_tick(Duration::from_secs(5));
        assert_eq!(session.stats.heartbeats_tx(), 0);
    }

    #[test]
    fn peer_close_transitions_to_disconnected() {
        let (mut session, _listener, peer) = connected_session();
        drop(peer);
        // Poll until the FIN is observed by a tick
        for _ in 0..100 {
            session.on_tick(Duration::from_millis(10));
            if session.state() == ConnectionState::Disconnected {
                return;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        panic!("peer close never observed");
    }
}
