/// Scheduling priority returned by `Activity::should_run`. Ordered so a
/// descending sort (`sort_by_key` with `Reverse`, or `sort_unstable_by`
/// comparing in reverse) puts `Critical` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}
