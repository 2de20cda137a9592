// Bucket membership: which assignments a selected timeline bucket shows.

use super::assignment::Assignment;
use super::bucket::BucketKey;

/// Resolve the assignments belonging to the selected bucket.
///
/// Rules:
/// - `Start`: assignments with no `from_datetime` (held since the window
///   began).
/// - `Current`: assignments with no `to_datetime` (still held).
/// - `Day(d)`: assignments with a boundary (either end) on that UTC day.
///   This is a point-match on boundaries, not range containment -- an
///   assignment merely active throughout the day is excluded.
/// - `None`: no selection, empty result.
///
/// Pure and order-preserving: the result keeps the input order and the same
/// `(assignments, bucket)` pair always yields the same list.
pub fn resolve(assignments: &[Assignment], bucket: Option<&BucketKey>) -> Vec<Assignment> {
    let Some(bucket) = bucket else {
        return Vec::new();
    };

    assignments
        .iter()
        .filter(|a| match bucket {
            BucketKey::Start => a.from_datetime.is_none(),
            BucketKey::Current => a.to_datetime.is_none(),
            BucketKey::Day(day) => a.from_day() == Some(*day) || a.to_day() == Some(*day),
        })
        .cloned()
        .collect()
}
