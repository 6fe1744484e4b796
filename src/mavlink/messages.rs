//! Typed messages and their fixed payload layouts
//!
//! `interpret` is the single entry point for inbound frames: a pure function
//! of the frame's message id and payload. Field order within a payload is
//! the MAVLink wire order (largest fields first), all integers little-endian.

use super::modes::mode_name;
use super::{
    Frame, Version, MAVLINK_VERSION, MAV_AUTOPILOT_INVALID, MAV_STATE_ACTIVE, MAV_TYPE_GCS,
    MODE_FLAG_CUSTOM_MODE_ENABLED, MSG_ID_HEARTBEAT, MSG_ID_STATUSTEXT,
};

/// STATUSTEXT text field capacity
pub const STATUSTEXT_CAP: usize = 50;

/// HEARTBEAT payload length
pub const HEARTBEAT_LEN: usize = 9;

/// STATUSTEXT payload length (v1; v2 may truncate or extend)
pub const STATUSTEXT_LEN: usize = 1 + STATUSTEXT_CAP;

/// COMMAND_LONG payload length
pub const COMMAND_LONG_LEN: usize = 33;

/// An inbound frame decoded into the message subset we understand
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedMessage {
    Heartbeat(Heartbeat),
    StatusText(StatusText),
    Unknown { message_id: u32 },
}

/// HEARTBEAT fields we track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    pub vehicle_type: u8,
    pub autopilot: u8,
    pub base_mode: u8,
    pub custom_mode: u32,
    pub system_status: u8,
}

impl Heartbeat {
    /// The heartbeat this bridge reports about itself (a ground station)
    pub fn gcs() -> Self {
        Self {
            vehicle_type: MAV_TYPE_GCS,
            autopilot: MAV_AUTOPILOT_INVALID,
            base_mode: MODE_FLAG_CUSTOM_MODE_ENABLED,
            custom_mode: 0,
            system_status: MAV_STATE_ACTIVE,
        }
    }

    /// Flight-mode name for this heartbeat's custom_mode
    pub fn mode_name(&self) -> String {
        mode_name(self.custom_mode)
    }

    pub fn from_payload(payload: &[u8; HEARTBEAT_LEN]) -> Self {
        Self {
            custom_mode: u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]),
            vehicle_type: payload[4],
            autopilot: payload[5],
            base_mode: payload[6],
            system_status: payload[7],
        }
    }

    pub fn to_payload(&self) -> [u8; HEARTBEAT_LEN] {
        let mut buf = [0u8; HEARTBEAT_LEN];
        buf[0..4].copy_from_slice(&self.custom_mode.to_le_bytes());
        buf[4] = self.vehicle_type;
        buf[5] = self.autopilot;
        buf[6] = self.base_mode;
        buf[7] = self.system_status;
        buf[8] = MAVLINK_VERSION;
        buf
    }
}

/// STATUSTEXT severity plus its null-terminated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    pub severity: u8,
    pub text: String,
}

impl StatusText {
    pub fn from_payload(payload: &[u8; STATUSTEXT_LEN]) -> Self {
        let raw = &payload[1..];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Self {
            severity: payload[0],
            text: String::from_utf8_lossy(&raw[..end]).into_owned(),
        }
    }

    /// Build a payload, truncating the text to the field capacity
    pub fn to_payload(&self) -> [u8; STATUSTEXT_LEN] {
        let mut buf = [0u8; STATUSTEXT_LEN];
        buf[0] = self.severity;
        let raw = self.text.as_bytes();
        let copy_len = raw.len().min(STATUSTEXT_CAP);
        buf[1..1 + copy_len].copy_from_slice(&raw[..copy_len]);
        buf
    }
}

/// COMMAND_LONG addressed to the autopilot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandLong {
    pub target_system: u8,
    pub target_component: u8,
    pub command: u16,
    pub confirmation: u8,
    pub params: [f32; 7],
}

impl CommandLong {
    pub fn from_payload(payload: &[u8; COMMAND_LONG_LEN]) -> Self {
        let mut params = [0f32; 7];
        for (i, param) in params.iter_mut().enumerate() {
            let at = i * 4;
            *param = f32::from_le_bytes([
                payload[at],
                payload[at + 1],
                payload[at + 2],
                payload[at + 3],
            ]);
        }
        Self {
            params,
            command: u16::from_le_bytes([payload[28], payload[29]]),
            target_system: payload[30],
            target_component: payload[31],
            confirmation: payload[32],
        }
    }

    pub fn to_payload(&self) -> [u8; COMMAND_LONG_LEN] {
        let mut buf = [0u8; COMMAND_LONG_LEN];
        for (i, param) in self.params.iter().enumerate() {
            buf[i * 4..i * 4 + 4].copy_from_slice(&param.to_le_bytes());
        }
        buf[28..30].copy_from_slice(&self.command.to_le_bytes());
        buf[30] = self.target_system;
        buf[31] = self.target_component;
        buf[32] = self.confirmation;
        buf
    }
}

/// Decode a frame into the message subset we interpret
///
/// Pure function, no state. A v1 payload shorter than the message's fixed
/// layout is a contract violation and yields `Unknown` (never an
/// out-of-bounds read); a short v2 payload is zero-truncation and is
/// zero-extended before decoding.
pub fn interpret(frame: &Frame) -> DecodedMessage {
    match frame.message_id {
        MSG_ID_HEARTBEAT => match fixed::<HEARTBEAT_LEN>(frame) {
            Some(payload) => DecodedMessage::Heartbeat(Heartbeat::from_payload(&payload)),
            None => DecodedMessage::Unknown {
                message_id: frame.message_id,
            },
        },
        MSG_ID_STATUSTEXT => match fixed::<STATUSTEXT_LEN>(frame) {
            Some(payload) => DecodedMessage::StatusText(StatusText::from_payload(&payload)),
            None => DecodedMessage::Unknown {
                message_id: frame.message_id,
            },
        },
        other => DecodedMessage::Unknown { message_id: other },
    }
}

/// Recover a fixed-layout payload from the wire bytes
///
/// Longer payloads (v2 extension fields) decode their known prefix.
fn fixed<const N: usize>(frame: &Frame) -> Option<[u8; N]> {
    let payload = frame.payload.as_ref();
    let mut buf = [0u8; N];
    if payload.len() >= N {
        buf.copy_from_slice(&payload[..N]);
    } else if frame.version == Version::V2 {
        buf[..payload.len()].copy_from_slice(payload);
    } else {
        return None;
    }
    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use proptest::prelude::*;

    fn frame(message_id: u32, version: Version, payload: Vec<u8>) -> Frame {
        Frame {
            version,
            system_id: 1,
            component_id: 1,
            sequence: 0,
            message_id,
            payload: Bytes::from(payload),
        }
    }

    #[test]
    fn heartbeat_roundtrip() {
        let hb = Heartbeat {
            vehicle_type: 2,
            autopilot: 3,
            base_mode: 81,
            custom_mode: 4,
            system_status: 4,
        };
        assert_eq!(Heartbeat::from_payload(&hb.to_payload()), hb);
    }

    #[test]
    fn interpret_heartbeat() {
        let hb = Heartbeat {
            vehicle_type: 2,
            autopilot: 3,
            base_mode: 81,
            custom_mode: 4,
            system_status: 4,
        };
        let decoded = interpret(&frame(MSG_ID_HEARTBEAT, Version::V1, hb.to_payload().to_vec()));
        assert_eq!(decoded, DecodedMessage::Heartbeat(hb));
    }

    #[test]
    fn interpret_statustext() {
        let status = StatusText {
            severity: 6,
            text: "ARMED".into(),
        };
        let decoded = interpret(&frame(
            MSG_ID_STATUSTEXT,
            Version::V1,
            status.to_payload().to_vec(),
        ));
        assert_eq!(decoded, DecodedMessage::StatusText(status));
    }

    #[test]
    fn statustext_text_truncates_at_nul() {
        let mut payload = [0u8; STATUSTEXT_LEN];
        payload[0] = 4;
        payload[1..6].copy_from_slice(b"ARMED");
        payload[7] = b'X'; // past the terminator, must not leak into the text
        let status = StatusText::from_payload(&payload);
        assert_eq!(status.text, "ARMED");
        assert_eq!(status.severity, 4);
    }

    #[test]
    fn statustext_full_capacity_no_terminator() {
        let status = StatusText {
            severity: 0,
            text: "A".repeat(STATUSTEXT_CAP),
        };
        let decoded = StatusText::from_payload(&status.to_payload());
        assert_eq!(decoded.text.len(), STATUSTEXT_CAP);
    }

    #[test]
    fn statustext_encode_truncates_overlong_text() {
        let status = StatusText {
            severity: 0,
            text: "B".repeat(80),
        };
        let decoded = StatusText::from_payload(&status.to_payload());
        assert_eq!(decoded.text.len(), STATUSTEXT_CAP);
    }

    #[test]
    fn interpret_unknown_id() {
        let decoded = interpret(&frame(30, Version::V1, vec![0; 28]));
        assert_eq!(decoded, DecodedMessage::Unknown { message_id: 30 });
    }

    #[test]
    fn v1_underlength_is_unknown() {
        // 8 bytes where HEARTBEAT needs 9: contract violation on a v1 frame
        let decoded = interpret(&frame(MSG_ID_HEARTBEAT, Version::V1, vec![0; 8]));
        assert_eq!(decoded, DecodedMessage::Unknown { message_id: 0 });
    }

    #[test]
    fn v2_truncated_payload_zero_extends() {
        // custom_mode=4 with every trailing zero stripped, as v2 allows
        let decoded = interpret(&frame(MSG_ID_HEARTBEAT, Version::V2, vec![4]));
        match decoded {
            DecodedMessage::Heartbeat(hb) => {
                assert_eq!(hb.custom_mode, 4);
                assert_eq!(hb.vehicle_type, 0);
            }
            other => panic!("expected heartbeat, got {:?}", other),
        }
    }

    #[test]
    fn v2_empty_payload_zero_extends() {
        let decoded = interpret(&frame(MSG_ID_HEARTBEAT, Version::V2, vec![]));
        assert_eq!(
            decoded,
            DecodedMessage::Heartbeat(Heartbeat {
                vehicle_type: 0,
                autopilot: 0,
                base_mode: 0,
                custom_mode: 0,
                system_status: 0,
            })
        );
    }

    #[test]
    fn command_long_roundtrip() {
        let cmd = CommandLong {
            target_system: 1,
            target_component: 1,
            command: 511,
            confirmation: 0,
            params: [253.0, 1_000_000.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        };
        assert_eq!(CommandLong::from_payload(&cmd.to_payload()), cmd);
    }

    proptest! {
        #[test]
        fn heartbeat_roundtrip_any(
            vehicle_type: u8,
            autopilot: u8,
            base_mode: u8,
            custom_mode: u32,
            system_status: u8,
        ) {
            let hb = Heartbeat { vehicle_type, autopilot, base_mode, custom_mode, system_status };
            prop_assert_eq!(Heartbeat::from_payload(&hb.to_payload()), hb);
        }

        #[test]
        fn command_long_roundtrip_any(
            target_system: u8,
            target_component: u8,
            command: u16,
            confirmation: u8,
            params in proptest::array::uniform7(-1.0e6f32..1.0e6),
        ) {
            let cmd = CommandLong { target_system, target_component, command, confirmation, params };
            prop_assert_eq!(CommandLong::from_payload(&cmd.to_payload()), cmd);
        }
    }
}
