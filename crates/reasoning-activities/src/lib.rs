pub mod activity;
pub mod awareness;
pub mod constraint;
pub mod error;
pub mod generic;
pub mod input;
pub mod learning;
pub mod memory;
pub mod planning;
pub mod priority;
pub mod search;
pub mod similarity;
pub mod streaming;

pub use activity::{Activity, ActivityOutcome, BaseActivity, ExecutionStatus};
pub use awareness::awareness_activity;
pub use constraint::constraint_activity;
pub use error::{ActivityError, ActivityFnResult};
pub use generic::GenericActivity;
pub use input::{ActivityInput, MemoryInput, MemoryOperation};
pub use learning::LearningActivity;
pub use memory::MemoryActivity;
pub use planning::planning_activity;
pub use priority::Priority;
pub use search::search_activity;
pub use similarity::similarity_activity;
pub use streaming::streaming_activity;
