/// Per-probe coverage flags for one instrumented code unit.
#[derive(Debug, Clone)]
pub struct UnitCoverage {
    pub id: String,
    pub probes: Vec<bool>,
}

/// Coverage flags grouped by code unit, produced fresh for every fitness
/// evaluation and discarded afterwards.
#[derive(Debug, Clone, Default)]
pub struct CoverageReport {
    pub units: Vec<UnitCoverage>,
}

impl CoverageReport {
    /// Count of executed probes across all units; this is the fitness value.
    pub fn hit_count(&self) -> u64 {
        self.units
            .iter()
            .map(|unit| unit.probes.iter().filter(|hit| **hit).count() as u64)
            .sum()
    }
}
