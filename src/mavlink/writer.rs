//! Outbound frame serialization
//!
//! Builds MAVLink v1 frames for the two message kinds this bridge sends.
//! The writer owns the link-level sequence counter: one increment per
//! outbound frame, wrapping at 256, as the protocol defines.

use super::crc;
use super::messages::{CommandLong, Heartbeat};
use super::{CMD_SET_MESSAGE_INTERVAL, MSG_ID_COMMAND_LONG, MSG_ID_HEARTBEAT, STX_V1};

pub struct FrameWriter {
    sequence: u8,
    system_id: u8,
    component_id: u8,
}

impl FrameWriter {
    pub fn new(system_id: u8, component_id: u8) -> Self {
        Self {
            sequence: 0,
            system_id,
            component_id,
        }
    }

    /// Sequence number the next outbound frame will carry
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Serialize our periodic ground-station heartbeat
    pub fn write_heartbeat(&mut self) -> Vec<u8> {
        let payload = Heartbeat::gcs().to_payload();
        self.write_frame(MSG_ID_HEARTBEAT, &payload)
    }

    /// Serialize a MAV_CMD_SET_MESSAGE_INTERVAL request
    ///
    /// Asks the autopilot to emit `message_id` every `interval_us`
    /// microseconds and to respond to us (param7 = 1).
    pub fn write_set_message_interval(
        &mut self,
        target_system: u8,
        target_component: u8,
        message_id: u32,
        interval_us: i32,
    ) -> Vec<u8> {
        let command = CommandLong {
            target_system,
            target_component,
            command: CMD_SET_MESSAGE_INTERVAL,
            confirmation: 0,
            params: [message_id as f32, interval_us as f32, 0.0, 0.0, 0.0, 0.0, 1.0],
        };
        self.write_frame(MSG_ID_COMMAND_LONG, &command.to_payload())
    }

    /// Wrap a payload in a v1 frame: header, payload, checksum
    fn write_frame(&mut self, message_id: u32, payload: &[u8]) -> Vec<u8> {
        // Both outbound ids are in the table; the match is structural
        let extra = crc::crc_extra(message_id).unwrap_or(0);

        let mut buf = Vec::with_capacity(payload.len() + 8);
        buf.push(STX_V1);
        buf.push(payload.len() as u8);
        buf.push(self.next_sequence());
        buf.push(self.system_id);
        buf.push(self.component_id);
        buf.push(message_id as u8);
        buf.extend_from_slice(payload);

        let checksum = crc::accumulate(crc::compute(&buf[1..]), extra);
        buf.extend_from_slice(&checksum.to_le_bytes());
        buf
    }

    fn next_sequence(&mut self) -> u8 {
        let seq = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        seq
    }
}
