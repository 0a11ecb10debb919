use serde::{Deserialize, Serialize};

/// Authoritative vs heuristic origin of a delta or input.
///
/// `Hard` signals come from the compiler, test runner, or the agent's own
/// tool-execution events; they may set hard proof status and learn clauses.
/// `Soft` signals come from an LLM or a streaming sketch and may never
/// upgrade a node's status to `Proven`/`Disproven`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Hard,
    Soft,
}

impl Signal {
    #[must_use]
    pub const fn is_hard(self) -> bool {
        matches!(self, Self::Hard)
    }
}

impl Default for Signal {
    /// Deltas default to `Soft` (heuristic); callers must opt into `Hard`
    /// explicitly, matching the asymmetric risk of the two signal classes.
    fn default() -> Self {
        Self::Soft
    }
}
