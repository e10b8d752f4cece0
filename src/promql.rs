//! Helpers shared by the query templates.
//!
//! Identifiers are interpolated as-is. Nothing here escapes regex or string
//! metacharacters; callers pass trusted values.

/// Joins identifiers into a regex alternation, `a|b|c`.
///
/// An empty list produces an empty alternation.
pub fn join_alternation<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<_>>()
        .join("|")
}

/// Joins container ids into `.*id1.*|.*id2.*`, matching the cgroup `id` label.
pub fn container_id_alternation<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter()
        .map(|id| format!(".*{}.*", id.as_ref()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Step for a caller supplied window: one point per sixtieth of it.
pub fn range_step(start: i64, end: i64) -> i64 {
    (end - start).div_euclid(60)
}
