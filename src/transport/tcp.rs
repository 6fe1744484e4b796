//! TCP transport to the MAVLink server
//!
//! A non-blocking `std::net::TcpStream` polled from the session's tick.
//! Frames are small (< 300 bytes), so a short write is treated as a lost
//! frame rather than buffered for completion.

use super::Transport;
use crate::error::{BridgeError, Result};
use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;

pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connect to `ip:port` and switch the stream to non-blocking mode
    ///
    /// No connect timeout is applied; retry policy belongs to the caller.
    pub fn connect(ip: &str, port: u16) -> Result<Self> {
        let addr = format!("{}:{}", ip, port);
        let map_err = |e| BridgeError::Connect {
            addr: addr.clone(),
            source: e,
        };

        let stream = TcpStream::connect(&addr).map_err(map_err)?;
        stream.set_nonblocking(true).map_err(map_err)?;
        stream.set_nodelay(true).map_err(map_err)?;
        Ok(Self { stream })
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        let written = self
            .stream
            .write(frame)
            .map_err(|e| BridgeError::Send { source: e })?;
        if written < frame.len() {
            // Kernel buffer full mid-frame; the remainder would desync the
            // peer, so report the whole frame as lost.
            return Err(BridgeError::Send {
                source: std::io::Error::new(ErrorKind::WriteZero, "short write"),
            });
        }
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> std::io::Result<Option<usize>> {
        match self.stream.read(buf) {
            Ok(n) => Ok(Some(n)),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e),
        }
    }
}
