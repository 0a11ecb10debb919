//! The closed set of agent-originated events the coordinator routes
//! (§4.5). `EventActivityMapping` is the static table from event to the
//! activities it wakes.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    SessionStart,
    QueryReceived,
    ToolSelected,
    ToolExecuted,
    ToolFailed,
    CycleDetected,
    CircuitBreaker,
    SynthesisStart,
    SessionEnd,
    GraphRefreshed,
    AnalyticsRun,
}

/// Context carried alongside an event, consulted by the ordered
/// filters before dispatch.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    pub is_simple_query: bool,
    pub error_rate: f64,
}

pub const HIGH_ERROR_RATE_THRESHOLD: f64 = 0.5;

#[must_use]
pub fn activities_for_event(event: Event) -> &'static [&'static str] {
    match event {
        Event::SessionStart => &["memory", "streaming"],
        Event::QueryReceived => &["search", "similarity", "planning", "memory"],
        Event::ToolSelected => &["constraint", "awareness"],
        Event::ToolExecuted => &["memory", "awareness"],
        Event::ToolFailed => &["learning", "memory"],
        Event::CycleDetected => &["constraint", "learning"],
        Event::CircuitBreaker => &["constraint", "learning"],
        Event::SynthesisStart => &["planning", "similarity"],
        Event::SessionEnd => &["memory", "similarity"],
        Event::GraphRefreshed => &["awareness", "search"],
        Event::AnalyticsRun => &["streaming", "memory"],
    }
}

/// Ordered filters applied to the candidate activity list before
/// registration/priority lookup. Order matters: `high_error_rate`
/// inserting `learning` must not create a duplicate if it is already
/// present.
#[must_use]
pub fn apply_filters(mut candidates: Vec<&'static str>, ctx: &EventContext) -> Vec<&'static str> {
    candidates = simple_query_filter(candidates, ctx);
    candidates = high_error_rate_filter(candidates, ctx);
    candidates
}

fn simple_query_filter(candidates: Vec<&'static str>, ctx: &EventContext) -> Vec<&'static str> {
    if !ctx.is_simple_query {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|name| *name != "similarity" && *name != "planning")
        .collect()
}

fn high_error_rate_filter(mut candidates: Vec<&'static str>, ctx: &EventContext) -> Vec<&'static str> {
    if ctx.error_rate >= HIGH_ERROR_RATE_THRESHOLD && !candidates.contains(&"learning") {
        candidates.push("learning");
    }
    candidates
}
