//! Static, init-time-populated registries (§9: "static configuration
//! registered at startup"). The activity-label allowlist protects
//! metric cardinality; registration happens once, at process start,
//! and is explicitly not meant to be called concurrently with lookups.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

const BUILTIN_ACTIVITIES: &[&str] = &[
    "search",
    "awareness",
    "constraint",
    "learning",
    "memory",
    "planning",
    "similarity",
    "streaming",
];

static KNOWN_ACTIVITIES: Lazy<RwLock<HashSet<&'static str>>> =
    Lazy::new(|| RwLock::new(BUILTIN_ACTIVITIES.iter().copied().collect()));

/// Registers an additional activity name as safe to use verbatim in
/// metric labels. Not safe to call once the process has started
/// serving traffic (§5: "immutable after startup").
pub fn register_activity_label(name: &'static str) {
    KNOWN_ACTIVITIES.write().insert(name);
}

/// Maps an arbitrary activity name to itself if allowlisted, else to
/// `"unknown"`, preventing unbounded metric-label cardinality.
#[must_use]
pub fn sanitize_activity_label(name: &str) -> &'static str {
    KNOWN_ACTIVITIES
        .read()
        .iter()
        .find(|known| **known == name)
        .copied()
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_activities_pass_through() {
        assert_eq!(sanitize_activity_label("search"), "search");
        assert_eq!(sanitize_activity_label("memory"), "memory");
    }

    #[test]
    fn unknown_activities_become_unknown() {
        assert_eq!(sanitize_activity_label("totally-made-up"), "unknown");
    }

    #[test]
    fn registered_names_are_accepted_afterward() {
        register_activity_label("custom-activity-for-tests");
        assert_eq!(
            sanitize_activity_label("custom-activity-for-tests"),
            "custom-activity-for-tests"
        );
    }
}
