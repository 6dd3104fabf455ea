use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use super::resolve_addr;
use crate::error::{GenfuzzError, Result};

/// Raw byte channel to the target service: connect, write the full request,
/// close. Responses are never read.
#[derive(Debug)]
pub struct TargetClient {
    addr: SocketAddr,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl TargetClient {
    pub fn new(addr: &str, connect_timeout: Duration, io_timeout: Duration) -> Result<Self> {
        Ok(Self {
            addr: resolve_addr(addr)?,
            connect_timeout,
            io_timeout,
        })
    }

    pub fn send(&self, payload: &[u8]) -> Result<()> {
        let mut stream = TcpStream::connect_timeout(&self.addr, self.connect_timeout)
            .map_err(|err| GenfuzzError::TargetSend(format!("connect {}: {err}", self.addr)))?;
        stream
            .set_write_timeout(Some(self.io_timeout))
            .map_err(|err| GenfuzzError::TargetSend(err.to_string()))?;
        stream
            .write_all(payload)
            .map_err(|err| GenfuzzError::TargetSend(format!("write {}: {err}", self.addr)))?;
        let _ = stream.shutdown(Shutdown::Write);
        Ok(())
    }
}
