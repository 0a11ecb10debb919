//! `Coordinator`: registry of activities by name, with polling and
//! event-driven execution modes (§4.5).

use crate::bridge::Bridge;
use crate::error::{CoordinatorError, CoordinatorResult};
use crate::event::{activities_for_event, apply_filters, Event, EventContext};
use crs_store::signal::Signal;
use crs_store::store::Crs;
use reasoning_activities::{Activity, ActivityInput, Priority};
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

pub const DEFAULT_SCHEDULE_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_MAX_CONCURRENT_ACTIVITIES: usize = 4;

struct Registration {
    activity: Arc<dyn Activity>,
    enabled: bool,
    depends_on: Vec<&'static str>,
}

pub struct Coordinator {
    bridge: Arc<Bridge>,
    crs: Arc<Crs>,
    registry: HashMap<&'static str, Registration>,
    schedule_interval: Duration,
    max_concurrent: usize,
}

impl Coordinator {
    #[must_use]
    pub fn new(bridge: Arc<Bridge>, crs: Arc<Crs>) -> Self {
        Self {
            bridge,
            crs,
            registry: HashMap::new(),
            schedule_interval: DEFAULT_SCHEDULE_INTERVAL,
            max_concurrent: DEFAULT_MAX_CONCURRENT_ACTIVITIES,
        }
    }

    #[must_use]
    pub fn with_schedule_interval(mut self, interval: Duration) -> Self {
        self.schedule_interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_concurrent_activities(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    pub fn register(&mut self, activity: Arc<dyn Activity>, depends_on: Vec<&'static str>) {
        let name = activity.name();
        self.registry.insert(
            name,
            Registration {
                activity,
                enabled: true,
                depends_on,
            },
        );
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) {
        if let Some(reg) = self.registry.get_mut(name) {
            reg.enabled = enabled;
        }
    }

    /// **(a) Polling mode — `RunOnce`.** `ShouldRun` on every registered,
    /// enabled activity; take the top `max_concurrent_activities` by
    /// priority; fan out; await all.
    pub async fn run_once(&self, cancel: CancellationToken) -> CoordinatorResult<()> {
        let snapshot = self.crs.snapshot();
        let mut wanting: Vec<(&'static str, Priority)> = self
            .registry
            .values()
            .filter(|reg| reg.enabled)
            .filter_map(|reg| {
                let (should, priority) = reg.activity.should_run(&snapshot);
                should.then_some((reg.activity.name(), priority))
            })
            .collect();

        wanting.sort_by_key(|(_, priority)| Reverse(*priority));
        wanting.truncate(self.max_concurrent);

        for (name, _priority) in wanting {
            if cancel.is_cancelled() {
                break;
            }
            let Some(reg) = self.registry.get(name) else {
                continue;
            };
            let input = ActivityInput::new(Value::Null, Signal::Soft);
            if let Err(err) = self
                .bridge
                .run_activity(cancel.child_token(), reg.activity.as_ref(), &input)
                .await
            {
                warn!(activity = name, error = %err, "polling-mode activity failed");
            }
        }
        Ok(())
    }

    /// **Polling mode — `Run`.** Loops `run_once` every
    /// `schedule_interval` until `cancel` fires. Polls `cancel` before
    /// spawning each batch to avoid pile-up once cancellation starts.
    pub async fn run(&self, cancel: CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                return;
            }
            if let Err(err) = self.run_once(cancel.child_token()).await {
                warn!(error = %err, "polling cycle failed");
            }
            tokio::select! {
                () = tokio::time::sleep(self.schedule_interval) => {}
                () = cancel.cancelled() => return,
            }
        }
    }

    /// **(b) Event mode — the primary entry point.** Looks up the
    /// static mapping, applies ordered filters, keeps registered and
    /// enabled activities, sorts by priority, and executes in sequence
    /// honoring `depends_on`.
    pub async fn handle_event(
        &self,
        cancel: CancellationToken,
        event: Event,
        ctx: &EventContext,
        data: Value,
    ) -> CoordinatorResult<()> {
        let span = info_span!("coordinator.handle_event", event = ?event);
        self.handle_event_inner(cancel, event, ctx, data)
            .instrument(span)
            .await
    }

    async fn handle_event_inner(
        &self,
        cancel: CancellationToken,
        event: Event,
        ctx: &EventContext,
        data: Value,
    ) -> CoordinatorResult<()> {
        if event == Event::GraphRefreshed {
            self.crs.invalidate_graph_cache();
        }

        let candidates = apply_filters(activities_for_event(event).to_vec(), ctx);
        let snapshot = self.crs.snapshot();

        let mut ordered: Vec<(&'static str, Priority)> = candidates
            .into_iter()
            .filter_map(|name| {
                let reg = self.registry.get(name)?;
                if !reg.enabled {
                    return None;
                }
                let (_, priority) = reg.activity.should_run(&snapshot);
                Some((name, priority))
            })
            .collect();
        ordered.sort_by_key(|(_, priority)| Reverse(*priority));

        let mut completed: HashMap<&'static str, bool> = HashMap::new();
        for (name, _priority) in ordered {
            let Some(reg) = self.registry.get(name) else {
                return Err(CoordinatorError::UnknownActivity(name));
            };

            let deps_ok = reg
                .depends_on
                .iter()
                .all(|dep| completed.get(dep).copied().unwrap_or(false));
            if !deps_ok {
                info!(activity = name, "skipped: dependency did not complete successfully");
                completed.insert(name, false);
                continue;
            }

            let input = create_input_from_event(event, &data);
            let required = is_required(name);
            match self
                .bridge
                .run_activity(cancel.child_token(), reg.activity.as_ref(), &input)
                .await
            {
                Ok(_) => {
                    completed.insert(name, true);
                }
                Err(err) if required => {
                    return Err(CoordinatorError::RequiredActivityFailed {
                        activity: name,
                        source: err,
                    });
                }
                Err(err) => {
                    warn!(activity = name, error = %err, "optional activity failed, ignoring");
                    completed.insert(name, false);
                }
            }
        }
        Ok(())
    }
}

fn create_input_from_event(_event: Event, data: &Value) -> ActivityInput {
    ActivityInput::new(data.clone(), Signal::Hard)
}

/// Every activity dispatched from an event is optional by default; the
/// engine embedding this coordinator decides which names are load-bearing.
/// None of `EventActivityMapping`'s entries are hard-required at this layer.
fn is_required(_name: &str) -> bool {
    false
}
