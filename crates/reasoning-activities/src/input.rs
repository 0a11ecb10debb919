use crs_store::signal::Signal;
use serde_json::Value;

/// The common payload shape passed from `createInputFromEvent` down
/// into an activity's algorithms. Kept as an opaque JSON value (as the
/// rest of the tool-call plumbing in this codebase does) since the
/// concrete algorithm bodies are pluggable and out of scope here.
/// `source` carries the signal class the triggering event should be
/// attributed with -- Hard for agent-originated events, Soft otherwise.
#[derive(Debug, Clone, Default)]
pub struct ActivityInput {
    pub context: Value,
    pub source: Signal,
}

impl ActivityInput {
    #[must_use]
    pub fn new(context: Value, source: Signal) -> Self {
        Self { context, source }
    }
}

/// `Memory`'s dedicated operation set (§4.3): it does not orchestrate
/// algorithms, it records/queries/replays history directly.
#[derive(Debug, Clone)]
pub enum MemoryOperation {
    Record { action: String, result: String, metadata: Value },
    Query { node: crs_store::types::NodeId },
    Replay { node: crs_store::types::NodeId },
}

#[derive(Debug, Clone)]
pub struct MemoryInput {
    pub operation: MemoryOperation,
}
