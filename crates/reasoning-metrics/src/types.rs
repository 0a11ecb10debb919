/// Outcome label for `activities_total{activity,status}` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Success,
    Partial,
    Failure,
}

impl ActivityStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityStatus::Success => "success",
            ActivityStatus::Partial => "partial",
            ActivityStatus::Failure => "failure",
        }
    }
}

/// Cycle-detection algorithm label for `cycles_detected_total{algorithm}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleAlgorithm {
    Brent,
    Tarjan,
}

impl CycleAlgorithm {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CycleAlgorithm::Brent => "brent",
            CycleAlgorithm::Tarjan => "tarjan",
        }
    }
}

/// Which per-activity distribution histogram a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionKind {
    ProofUpdates,
    Constraints,
    Dependencies,
    SymbolsPerActivity,
}

impl DistributionKind {
    #[must_use]
    pub fn metric_name(self) -> &'static str {
        match self {
            DistributionKind::ProofUpdates => "proof_updates_per_activity",
            DistributionKind::Constraints => "constraints_per_activity",
            DistributionKind::Dependencies => "dependencies_per_activity",
            DistributionKind::SymbolsPerActivity => "symbols_per_activity",
        }
    }
}
