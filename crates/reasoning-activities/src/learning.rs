//! `learning` deviates from [`crate::generic::GenericActivity`]: a
//! `Hard`-sourced input runs the full clause-learning algorithm set, a
//! `Soft`-sourced one runs only the watched-literal update subset.

use crate::activity::{Activity, ActivityOutcome, BaseActivity};
use crate::error::ActivityError;
use crate::input::ActivityInput;
use crate::priority::Priority;
use async_trait::async_trait;
use crs_store::history::HistoryIndex;
use crs_store::snapshot::Snapshot;
use reasoning_algorithms::{Algorithm, Payload};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct LearningActivity {
    timeout: Duration,
    full: Vec<Arc<dyn Algorithm>>,
    watched_literal: Vec<Arc<dyn Algorithm>>,
}

impl LearningActivity {
    #[must_use]
    pub fn new(
        full: Vec<Arc<dyn Algorithm>>,
        watched_literal: Vec<Arc<dyn Algorithm>>,
        timeout: Duration,
    ) -> Self {
        Self {
            timeout,
            full,
            watched_literal,
        }
    }
}

#[async_trait]
impl Activity for LearningActivity {
    fn name(&self) -> &'static str {
        "learning"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn algorithms(&self) -> Vec<Arc<dyn Algorithm>> {
        let mut all = self.full.clone();
        all.extend(self.watched_literal.clone());
        all
    }

    fn should_run(&self, snapshot: &Snapshot) -> (bool, Priority) {
        if history_has_failures(snapshot.history()) {
            (true, Priority::High)
        } else {
            (false, Priority::Low)
        }
    }

    async fn execute(
        &self,
        cancel: CancellationToken,
        snapshot: &Snapshot,
        input: &Payload,
    ) -> Result<ActivityOutcome, ActivityError> {
        let ctx = input
            .downcast_ref::<ActivityInput>()
            .cloned()
            .unwrap_or_default();

        let algorithms = if ctx.source.is_hard() {
            &self.full
        } else {
            &self.watched_literal
        };

        BaseActivity::run_algorithms(
            cancel,
            self.timeout,
            "learning",
            snapshot,
            algorithms,
            move |_algorithm| Box::new(ctx.clone()) as Box<Payload>,
        )
        .await
    }
}

fn history_has_failures(history: &HistoryIndex) -> bool {
    history
        .recent(history.len())
        .iter()
        .any(|entry| entry.result == "failure")
}
