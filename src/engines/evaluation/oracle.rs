use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use super::coverage::{CoverageReport, UnitCoverage};
use super::resolve_addr;
use crate::error::{GenfuzzError, Result};

/// Wire commands of the coverage agent protocol. Each operation opens its
/// own connection; both are idempotent, which is what makes retry safe.
const CMD_RESET: u8 = 0x01;
const CMD_DUMP: u8 = 0x02;
const ACK: u8 = 0x00;

// Frame sanity limits; a dump exceeding these is treated as a protocol error
// rather than an allocation request.
const MAX_UNITS: u32 = 1 << 20;
const MAX_ID_LEN: u16 = 4096;
const MAX_PROBES: u32 = 1 << 24;

/// The two-operation contract of the coverage collector. Any transport able
/// to deliver a per-probe coverage report can stand in for the TCP agent.
pub trait CoverageOracle {
    fn reset(&mut self) -> Result<()>;
    fn dump(&mut self) -> Result<CoverageReport>;
}

/// Client for the TCP coverage agent: one connection per operation, bounded
/// by connect and I/O timeouts, with a configurable retry budget.
#[derive(Debug)]
pub struct TcpCoverageOracle {
    addr: SocketAddr,
    retry_count: u32,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl TcpCoverageOracle {
    pub fn new(
        addr: &str,
        retry_count: u32,
        connect_timeout: Duration,
        io_timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            addr: resolve_addr(addr)?,
            retry_count,
            connect_timeout,
            io_timeout,
        })
    }

    fn connect(&self) -> io::Result<TcpStream> {
        let stream = TcpStream::connect_timeout(&self.addr, self.connect_timeout)?;
        stream.set_read_timeout(Some(self.io_timeout))?;
        stream.set_write_timeout(Some(self.io_timeout))?;
        Ok(stream)
    }

    fn with_retry<T>(
        &self,
        op_name: &str,
        op: impl Fn(&mut TcpStream) -> io::Result<T>,
    ) -> Result<T> {
        let attempts = self.retry_count.max(1);
        let mut last_err = None;
        for attempt in 1..=attempts {
            match self.connect().and_then(|mut stream| op(&mut stream)) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    log::debug!("coverage {op_name} attempt {attempt}/{attempts} failed: {err}");
                    last_err = Some(err);
                }
            }
        }
        let detail = last_err.map(|e| e.to_string()).unwrap_or_default();
        Err(GenfuzzError::Oracle(format!(
            "{op_name} against {} failed after {attempts} attempts: {detail}",
            self.addr
        )))
    }
}

impl CoverageOracle for TcpCoverageOracle {
    fn reset(&mut self) -> Result<()> {
        self.with_retry("reset", |stream| {
            stream.write_all(&[CMD_RESET])?;
            let mut ack = [0u8; 1];
            stream.read_exact(&mut ack)?;
            if ack[0] != ACK {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unexpected reset response 0x{:02x}", ack[0]),
                ));
            }
            Ok(())
        })
    }

    fn dump(&mut self) -> Result<CoverageReport> {
        self.with_retry("dump", |stream| {
            stream.write_all(&[CMD_DUMP])?;
            read_report(stream)
        })
    }
}

/// Dump payload: `u32` unit count, then per unit a `u16`-length UTF-8 id, a
/// `u32` probe count and an LSB-first probe bitmap. All integers big-endian.
fn read_report(stream: &mut TcpStream) -> io::Result<CoverageReport> {
    let unit_count = read_u32(stream)?;
    if unit_count > MAX_UNITS {
        return Err(invalid(format!("unit count {unit_count} out of range")));
    }

    let mut units = Vec::with_capacity(unit_count as usize);
    for _ in 0..unit_count {
        let id_len = read_u16(stream)?;
        if id_len > MAX_ID_LEN {
            return Err(invalid(format!("unit id length {id_len} out of range")));
        }
        let mut id_bytes = vec![0u8; id_len as usize];
        stream.read_exact(&mut id_bytes)?;
        let id = String::from_utf8(id_bytes)
            .map_err(|_| invalid("unit id is not valid UTF-8".to_string()))?;

        let probe_count = read_u32(stream)?;
        if probe_count > MAX_PROBES {
            return Err(invalid(format!("probe count {probe_count} out of range")));
        }
        let mut bitmap = vec![0u8; probe_count.div_ceil(8) as usize];
        stream.read_exact(&mut bitmap)?;
        let probes = (0..probe_count as usize)
            .map(|i| bitmap[i / 8] >> (i % 8) & 1 == 1)
            .collect();

        units.push(UnitCoverage { id, probes });
    }

    Ok(CoverageReport { units })
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

fn read_u16(stream: &mut TcpStream) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    stream.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

fn read_u32(stream: &mut TcpStream) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    stream.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}
