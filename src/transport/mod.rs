//! Transport abstraction for byte-level I/O
//!
//! Separates I/O concerns from protocol logic:
//! - **Transport**: how bytes flow (TCP today)
//! - **Parser/Writer**: how frames are framed and encoded (handled separately)
//!
//! The session is tick-driven and must never block, so a transport exposes
//! poll-style reads: each call returns whatever is currently available and
//! comes straight back.

pub mod tcp;

pub use tcp::TcpTransport;

use crate::error::Result;

/// Trait for poll-style byte transports
///
/// A transport abstracts byte-level I/O operations. It handles:
/// - Writing outbound frames
/// - Non-blocking reads of pending inbound bytes
///
/// A transport does NOT handle:
/// - Message framing (that's the parser's job)
/// - Statistics or heartbeat timing (that's the session's job)
/// - Reconnection policy (that's the caller's job)
pub trait Transport: Send {
    /// Write one outbound frame
    ///
    /// A partial or failed write means the frame is lost; the caller logs
    /// and drops it (no retry).
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Read whatever is currently pending into `buf`
    ///
    /// Returns `Ok(None)` when nothing is pending, `Ok(Some(0))` when the
    /// peer has closed the connection, `Ok(Some(n))` for n bytes read.
    /// Never blocks.
    fn recv(&mut self, buf: &mut [u8]) -> std::io::Result<Option<usize>>;
}
