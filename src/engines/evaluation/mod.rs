pub mod coverage;
pub mod evaluator;
pub mod oracle;
pub mod target;

pub use coverage::{CoverageReport, UnitCoverage};
pub use evaluator::{CoverageEvaluator, FitnessEvaluator};
pub use oracle::{CoverageOracle, TcpCoverageOracle};
pub use target::TargetClient;

use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::{GenfuzzError, Result};

pub(crate) fn resolve_addr(addr: &str) -> Result<SocketAddr> {
    addr.to_socket_addrs()
        .map_err(|err| GenfuzzError::Configuration(format!("cannot resolve {addr:?}: {err}")))?
        .next()
        .ok_or_else(|| GenfuzzError::Configuration(format!("address {addr:?} resolved to nothing")))
}
