//! MAVLink wire protocol: framing, checksums, and the message subset we speak
//!
//! Separates protocol concerns the same way the transports are separated:
//! - **stream_parser**: raw bytes in, verified frames out (stateful)
//! - **messages**: frame payloads to/from typed messages (pure)
//! - **writer**: typed messages to wire bytes (owns the sequence counter)
//!
//! Only HEARTBEAT and STATUSTEXT are interpreted inbound, and only
//! HEARTBEAT and COMMAND_LONG are produced outbound. Everything else
//! surfaces as `DecodedMessage::Unknown` or is skipped by the parser.

pub mod crc;
pub mod messages;
pub mod modes;
pub mod stream_parser;
pub mod writer;

pub use messages::{interpret, CommandLong, DecodedMessage, Heartbeat, StatusText};
pub use stream_parser::FrameParser;
pub use writer::FrameWriter;

use bytes::Bytes;

// =============================================================================
// Wire format
// =============================================================================

/// MAVLink v1 start-of-frame marker
pub const STX_V1: u8 = 0xFE;

/// MAVLink v2 start-of-frame marker
pub const STX_V2: u8 = 0xFD;

/// v1 header length after the start marker (len, seq, sysid, compid, msgid)
pub const V1_HEADER_LEN: usize = 5;

/// v2 header length after the start marker
/// (len, incompat, compat, seq, sysid, compid, msgid[3])
pub const V2_HEADER_LEN: usize = 9;

/// v2 incompat flag: frame carries a 13-byte signature
pub const INCOMPAT_SIGNED: u8 = 0x01;

/// Length of a v2 frame signature
pub const SIGNATURE_LEN: usize = 13;

// =============================================================================
// Message ids (common dialect)
// =============================================================================

pub const MSG_ID_HEARTBEAT: u32 = 0;
pub const MSG_ID_COMMAND_LONG: u32 = 76;
pub const MSG_ID_STATUSTEXT: u32 = 253;

/// MAV_CMD_SET_MESSAGE_INTERVAL
pub const CMD_SET_MESSAGE_INTERVAL: u16 = 511;

// =============================================================================
// Enum values used on the wire
// =============================================================================

/// MAV_TYPE_QUADROTOR: the vehicle type whose heartbeats surface a mode name
pub const MAV_TYPE_QUADROTOR: u8 = 2;

/// MAV_TYPE_GCS: vehicle type we report in our own heartbeats
pub const MAV_TYPE_GCS: u8 = 6;

/// MAV_AUTOPILOT_INVALID: we are not an autopilot
pub const MAV_AUTOPILOT_INVALID: u8 = 8;

/// MAV_MODE_FLAG_CUSTOM_MODE_ENABLED
pub const MODE_FLAG_CUSTOM_MODE_ENABLED: u8 = 1;

/// MAV_STATE_ACTIVE
pub const MAV_STATE_ACTIVE: u8 = 4;

/// mavlink_version field reported in outbound heartbeats
pub const MAVLINK_VERSION: u8 = 3;

// =============================================================================
// Frame
// =============================================================================

/// Protocol version a frame arrived with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V1,
    V2,
}

/// One complete, checksum-verified MAVLink frame
///
/// Produced by the stream parser; immutable once emitted. The payload is
/// exactly the bytes from the wire (v2 frames may be zero-truncated, see
/// `messages` for how fixed layouts are recovered).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub version: Version,
    pub system_id: u8,
    pub component_id: u8,
    pub sequence: u8,
    pub message_id: u32,
    pub payload: Bytes,
}
