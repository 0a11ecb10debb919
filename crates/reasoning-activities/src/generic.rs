use crate::activity::{Activity, ActivityOutcome, BaseActivity};
use crate::error::ActivityError;
use crate::input::ActivityInput;
use crate::priority::Priority;
use async_trait::async_trait;
use crs_store::snapshot::Snapshot;
use reasoning_algorithms::{Algorithm, Payload};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

type ShouldRunFn = dyn Fn(&Snapshot) -> (bool, Priority) + Send + Sync;

/// The common activity shape: a fixed algorithm set fanned out through
/// [`BaseActivity::run_algorithms`] with the same shared input passed
/// to every algorithm. `learning` and `memory` deviate from this shape
/// (see their own modules) and are not built on top of it.
pub struct GenericActivity {
    name: &'static str,
    timeout: Duration,
    algorithms: Vec<Arc<dyn Algorithm>>,
    should_run: Box<ShouldRunFn>,
}

impl GenericActivity {
    pub fn new(
        name: &'static str,
        timeout: Duration,
        algorithms: Vec<Arc<dyn Algorithm>>,
        should_run: impl Fn(&Snapshot) -> (bool, Priority) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            timeout,
            algorithms,
            should_run: Box::new(should_run),
        }
    }
}

#[async_trait]
impl Activity for GenericActivity {
    fn name(&self) -> &'static str {
        self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn algorithms(&self) -> Vec<Arc<dyn Algorithm>> {
        self.algorithms.clone()
    }

    fn should_run(&self, snapshot: &Snapshot) -> (bool, Priority) {
        (self.should_run)(snapshot)
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
        BaseActivity::run_algorithms(
            cancel,
            self.timeout,
            self.name,
            snapshot,
            &self.algorithms,
            move |_algorithm| Box::new(ctx.clone()) as Box<Payload>,
        )
        .await
    }
}
