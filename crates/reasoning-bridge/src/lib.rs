pub mod bridge;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod extract;
pub mod trace_recorder;

pub use bridge::{Bridge, RetryPolicy};
pub use coordinator::{
    Coordinator, DEFAULT_MAX_CONCURRENT_ACTIVITIES, DEFAULT_SCHEDULE_INTERVAL,
};
pub use error::{BridgeError, BridgeResult, CoordinatorError, CoordinatorResult};
pub use event::{activities_for_event, apply_filters, Event, EventContext, HIGH_ERROR_RATE_THRESHOLD};
pub use trace_recorder::{TraceLog, TraceRecorder, TraceStep, TraceStepCore, TraceVerifyError};
