//! Append-only, tamper-evident trace log (§4.6). Each step's
//! `chain_hash` commits to every prior step via a SHA-256 hash chain
//! rooted at the literal string `"genesis"`.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;

const GENESIS: &str = "genesis";

/// Everything a `TraceStep` carries except its own `chain_hash`; this is
/// exactly what gets canonically serialized as the hash input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStepCore {
    pub timestamp_ms: i64,
    pub action: String,
    pub target: String,
    pub duration: Duration,
    pub symbols_found: Vec<String>,
    pub proof_updates: Vec<String>,
    pub constraints_added: Vec<String>,
    pub dependencies_found: Vec<String>,
    pub error: Option<String>,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    #[serde(flatten)]
    pub core: TraceStepCore,
    pub chain_hash: String,
}

/// The serialized-log shape (§10): `{ "entries": [...], "hash": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceLog {
    pub entries: Vec<TraceStep>,
    pub hash: String,
}

#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum TraceVerifyError {
    #[error("chain hash mismatch at entry {index}: expected {expected}, found {found}")]
    Mismatch {
        index: usize,
        expected: String,
        found: String,
    },
}

pub struct TraceRecorder {
    entries: Mutex<Vec<TraceStep>>,
}

impl TraceRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Appends `core`, computing and filling in its `chain_hash`.
    /// Returns the freshly computed hash.
    pub fn append(&self, core: TraceStepCore) -> String {
        let mut entries = self.entries.lock();
        let prev_hash = entries
            .last()
            .map_or_else(|| GENESIS.to_string(), |step| step.chain_hash.clone());
        let hash = chain_hash(&prev_hash, &core);
        entries.push(TraceStep {
            core,
            chain_hash: hash.clone(),
        });
        hash
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<TraceStep> {
        self.entries.lock().clone()
    }

    pub fn verify(&self) -> Result<(), TraceVerifyError> {
        let entries = self.entries.lock();
        let mut prev_hash = GENESIS.to_string();
        for (index, step) in entries.iter().enumerate() {
            let expected = chain_hash(&prev_hash, &step.core);
            if expected != step.chain_hash {
                return Err(TraceVerifyError::Mismatch {
                    index,
                    expected,
                    found: step.chain_hash.clone(),
                });
            }
            prev_hash = step.chain_hash.clone();
        }
        Ok(())
    }

    #[must_use]
    pub fn to_log(&self) -> TraceLog {
        let entries = self.entries.lock();
        let hash = entries
            .last()
            .map_or_else(|| GENESIS.to_string(), |step| step.chain_hash.clone());
        TraceLog {
            entries: entries.clone(),
            hash,
        }
    }
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

fn chain_hash(prev_hash: &str, core: &TraceStepCore) -> String {
    let canonical = serde_json::to_vec(core).expect("TraceStepCore always serializes");
    let mut hasher = Sha256::new();
    hasher.update(prev_hash.as_bytes());
    hasher.update(&canonical);
    hex::encode(hasher.finalize())
}
