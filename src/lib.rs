//! MAVLink bridge library
//!
//! Connects to a MAVLink autopilot over TCP, keeps the link alive with a
//! 1 Hz heartbeat, requests STATUSTEXT streaming, and surfaces decoded
//! status text and flight-mode changes as text events.
//!
//! The core is tick-driven and never blocks: the binary (or any other
//! driver) calls [`bridge::Session::on_tick`] once per scheduling cycle
//! with the elapsed time, and drains text events from the channel it
//! handed the session at construction.

pub mod bridge;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod mavlink;
pub mod transport;
