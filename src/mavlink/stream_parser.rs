//! Incremental MAVLink frame decoder
//!
//! Consumes a TCP byte stream one byte at a time and emits complete,
//! checksum-verified frames. The stream may split a frame anywhere; all
//! continuation state lives in the parser. After a checksum mismatch the
//! parser resynchronizes byte-by-byte: every byte following the corrupted
//! frame is still evaluated as a possible start marker, so only the
//! corrupted frame is lost.

use super::crc;
use super::{
    Frame, Version, INCOMPAT_SIGNED, SIGNATURE_LEN, STX_V1, STX_V2, V1_HEADER_LEN, V2_HEADER_LEN,
};
use bytes::Bytes;

/// Parser counters for monitoring and diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserStats {
    /// Frames successfully decoded
    pub frames_decoded: u32,
    /// Frames dropped to a checksum mismatch
    pub checksum_mismatches: u32,
    /// Frames skipped whole: unknown CRC_EXTRA or unsupported incompat flags
    pub unsupported_skipped: u32,
}

/// Decoder position within the frame being assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Scanning for a start marker
    Seeking,
    /// Accumulating the fixed-size header
    Header,
    /// Accumulating `expected_len` payload bytes
    Payload,
    /// First (low) checksum byte
    ChecksumLow,
    /// Second (high) checksum byte
    ChecksumHigh,
    /// Consuming a v2 signature; `emit` carries the verification verdict
    Signature { remaining: usize, emit: bool },
}

/// Stateful MAVLink v1/v2 frame decoder
pub struct FrameParser {
    state: State,
    version: Version,
    header: [u8; V2_HEADER_LEN],
    header_len: usize,
    expected_len: usize,
    payload: Vec<u8>,
    /// Running checksum over header and payload (CRC_EXTRA not yet folded in)
    checksum: u16,
    checksum_low: u8,
    stats: ParserStats,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: State::Seeking,
            version: Version::V1,
            header: [0; V2_HEADER_LEN],
            header_len: 0,
            expected_len: 0,
            payload: Vec::with_capacity(255),
            checksum: crc::CRC_INIT,
            checksum_low: 0,
            stats: ParserStats::default(),
        }
    }

    /// Parser counters
    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Feed one byte; returns a frame when this byte completes one
    pub fn feed(&mut self, byte: u8) -> Option<Frame> {
        match self.state {
            State::Seeking => {
                self.try_start(byte);
                None
            }
            State::Header => {
                self.checksum = crc::accumulate(self.checksum, byte);
                self.header[self.header_len] = byte;
                self.header_len += 1;
                let header_len = match self.version {
                    Version::V1 => V1_HEADER_LEN,
                    Version::V2 => V2_HEADER_LEN,
                };
                if self.header_len == header_len {
                    if self.version == Version::V2
                        && self.header[1] & !INCOMPAT_SIGNED != 0
                    {
                        // Unknown incompat flags may change the framing itself
                        self.stats.unsupported_skipped += 1;
                        self.state = State::Seeking;
                        return None;
                    }
                    self.expected_len = self.header[0] as usize;
                    self.state = if self.expected_len == 0 {
                        State::ChecksumLow
                    } else {
                        State::Payload
                    };
                }
                None
            }
            State::Payload => {
                self.checksum = crc::accumulate(self.checksum, byte);
                self.payload.push(byte);
                if self.payload.len() == self.expected_len {
                    self.state = State::ChecksumLow;
                }
                None
            }
            State::ChecksumLow => {
                self.checksum_low = byte;
                self.state = State::ChecksumHigh;
                None
            }
            State::ChecksumHigh => self.finish(byte),
            State::Signature { remaining, emit } => {
                if remaining > 1 {
                    self.state = State::Signature {
                        remaining: remaining - 1,
                        emit,
                    };
                    return None;
                }
                self.state = State::Seeking;
                if emit {
                    self.emit()
                } else {
                    None
                }
            }
        }
    }

    /// Feed a buffer, invoking `on_frame` for each completed frame
    pub fn feed_slice(&mut self, data: &[u8], mut on_frame: impl FnMut(Frame)) {
        for &byte in data {
            if let Some(frame) = self.feed(byte) {
                on_frame(frame);
            }
        }
    }

    /// Evaluate a byte as a potential start marker
    fn try_start(&mut self, byte: u8) {
        let version = match byte {
            STX_V1 => Version::V1,
            STX_V2 => Version::V2,
            _ => return,
        };
        self.version = version;
        self.header_len = 0;
        self.payload.clear();
        self.checksum = crc::CRC_INIT;
        self.state = State::Header;
    }

    /// Handle the high checksum byte: verify, then emit or resynchronize
    fn finish(&mut self, byte: u8) -> Option<Frame> {
        let signed = self.version == Version::V2 && self.header[1] & INCOMPAT_SIGNED != 0;

        let Some(extra) = crc::crc_extra(self.message_id()) else {
            // Cannot verify this id; the length field already framed the
            // bytes, so the stream stays in sync. Skip the signature too.
            self.stats.unsupported_skipped += 1;
            self.state = if signed {
                State::Signature {
                    remaining: SIGNATURE_LEN,
                    emit: false,
                }
            } else {
                State::Seeking
            };
            return None;
        };

        let received = u16::from_le_bytes([self.checksum_low, byte]);
        if crc::accumulate(self.checksum, extra) != received {
            // Drop the frame; scanning resumes with the very next byte
            self.stats.checksum_mismatches += 1;
            self.state = State::Seeking;
            return None;
        }

        if signed {
            // Signature is not covered by the checksum and signing is not
            // supported; consume it to preserve framing, then emit.
            self.state = State::Signature {
                remaining: SIGNATURE_LEN,
                emit: true,
            };
            return None;
        }
        self.emit()
    }

    fn message_id(&self) -> u32 {
        match self.version {
            Version::V1 => self.header[4] as u32,
            Version::V2 => u32::from_le_bytes([self.header[6], self.header[7], self.header[8], 0]),
        }
    }

    fn emit(&mut self) -> Option<Frame> {
        self.stats.frames_decoded += 1;
        let (sequence, system_id, component_id) = match self.version {
            Version::V1 => (self.header[1], self.header[2], self.header[3]),
            Version::V2 => (self.header[3], self.header[4], self.header[5]),
        };
        self.state = State::Seeking;
        Some(Frame {
            version: self.version,
            system_id,
            component_id,
            sequence,
            message_id: self.message_id(),
            payload: Bytes::from(std::mem::take(&mut self.payload)),
        })
    }
}
