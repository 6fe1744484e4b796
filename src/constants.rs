//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Network
// =============================================================================

/// Default MAVLink server address (SITL TCP endpoint)
pub const DEFAULT_SERVER_IP: &str = "127.0.0.1";

/// Default MAVLink server port
pub const DEFAULT_SERVER_PORT: u16 = 5763;

// =============================================================================
// Link identity
// =============================================================================

/// Our system id on the link (255 = ground control station)
pub const DEFAULT_SYSTEM_ID: u8 = 255;

/// Our component id on the link
pub const DEFAULT_COMPONENT_ID: u8 = 0;

/// Autopilot system id commands are addressed to
pub const DEFAULT_TARGET_SYSTEM: u8 = 1;

/// Autopilot component id commands are addressed to
pub const DEFAULT_TARGET_COMPONENT: u8 = 1;

// =============================================================================
// Timing
// =============================================================================

/// Tick interval for the main driver loop (milliseconds)
pub const TICK_INTERVAL_MS: u64 = 20;

/// Heartbeat emission period (seconds)
pub const HEARTBEAT_PERIOD_SECS: u64 = 1;

/// Requested STATUSTEXT emission interval (microseconds)
pub const DEFAULT_STATUSTEXT_INTERVAL_US: i32 = 1_000_000;

// =============================================================================
// Buffers
// =============================================================================

/// TCP receive buffer size for one drain pass
pub const RECV_BUFFER_SIZE: usize = 4096;

/// Channel capacity for text-event delivery to the main loop
pub const CHANNEL_CAPACITY: usize = 256;
