use super::oracle::CoverageOracle;
use super::target::TargetClient;
use crate::error::Result;

/// Supplies the scalar fitness signal for the evolution engine.
pub trait FitnessEvaluator {
    fn evaluate(&mut self, genome: &[u8]) -> Result<u64>;
}

/// Scores one genome by running the coverage session against the live
/// target: reset counters, send the request, dump and count executed probes.
///
/// The target keeps coverage counters globally, not per connection, so the
/// reset → send → dump sequence of one genome must never interleave with
/// another's. Taking `&mut self` and giving the engine sole ownership of the
/// evaluator serializes the sessions.
pub struct CoverageEvaluator<O: CoverageOracle> {
    oracle: O,
    target: TargetClient,
}

impl<O: CoverageOracle> CoverageEvaluator<O> {
    pub fn new(oracle: O, target: TargetClient) -> Self {
        Self { oracle, target }
    }
}

impl<O: CoverageOracle> FitnessEvaluator for CoverageEvaluator<O> {
    fn evaluate(&mut self, genome: &[u8]) -> Result<u64> {
        self.oracle.reset()?;
        self.target.send(genome)?;
        Ok(self.oracle.dump()?.hit_count())
    }
}
