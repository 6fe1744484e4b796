//! Traffic statistics for the bridge
//!
//! Thread-safe counters shared between the session and the main loop.
//! Uses lock-free atomics for all operations. Frames dropped to checksum
//! corruption are visible only here; the parser resynchronizes silently.

use std::sync::atomic::{AtomicU64, Ordering};

/// Link counters (fully lock-free)
#[derive(Default)]
pub struct Stats {
    /// Total bytes written to the server
    tx_bytes: AtomicU64,
    /// Total bytes drained from the server
    rx_bytes: AtomicU64,
    /// Complete frames decoded
    frames_rx: AtomicU64,
    /// Frames lost to checksum mismatch or unsupported framing
    frames_dropped: AtomicU64,
    /// Heartbeats emitted
    heartbeats_tx: AtomicU64,
    /// Text events delivered to the sink
    text_events: AtomicU64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_tx(&self, bytes: usize) {
        self.tx_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_rx(&self, bytes: usize) {
        self.rx_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_frame_rx(&self) {
        self.frames_rx.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_frames_dropped(&self, count: u64) {
        self.frames_dropped.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_heartbeat_tx(&self) {
        self.heartbeats_tx.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_text_event(&self) {
        self.text_events.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn tx_bytes(&self) -> u64 {
        self.tx_bytes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rx_bytes(&self) -> u64 {
        self.rx_bytes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn frames_rx(&self) -> u64 {
        self.frames_rx.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn heartbeats_tx(&self) -> u64 {
        self.heartbeats_tx.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn text_events(&self) -> u64 {
        self.text_events.load(Ordering::Relaxed)
    }
}
