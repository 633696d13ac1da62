//! Fixed raw-label sets used for alerting, priority and negative-sentiment queries.
//!
//! All entries are lower-case; callers compare against lower-cased labels.

/// Raw labels that raise an alert (when they also normalize to anger) and mark a message high priority.
pub const ALERT_LABELS: &[&str] = &[
    "angry",
    "frustrated",
    "upset",
    "disappointed",
    "furious",
    "irritated",
];

/// Raw labels returned by the negative-sentiment query. Wider than [`ALERT_LABELS`].
pub const NEGATIVE_QUERY_LABELS: &[&str] = &[
    "angry",
    "frustrated",
    "upset",
    "disappointed",
    "annoyed",
    "furious",
    "irritated",
];

/// Alert labels that escalate to high severity.
pub const HIGH_SEVERITY_LABELS: &[&str] = &["angry", "furious"];

/// Raw labels that mark a message medium priority.
pub const CLARIFICATION_LABELS: &[&str] = &["confused", "concerned", "worried"];

/// Raw labels counted by the weekly negative-sentiment ratio.
pub const NEGATIVE_RATIO_LABELS: &[&str] = &["angry", "frustrated", "upset", "disappointed"];

/// Stored labels treated as "not yet classified" by the backfill.
pub const UNRESOLVED_LABELS: &[&str] = &["", "none", "unknown", "informational"];

/// Returns true if `label` (any case) is in `set`.
pub fn contains(set: &[&str], label: &str) -> bool {
    let key = label.trim().to_lowercase();
    set.iter().any(|l| *l == key)
}
