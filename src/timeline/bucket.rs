// Timeline bucketing: the set of selectable points on the transfer timeline.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::assignment::Assignment;

/// A selectable point on the transfer timeline.
///
/// Either a UTC calendar day on which at least one assignment boundary
/// falls, or one of the two synthetic buckets: `Start` (players assigned
/// since before the tracked window) and `Current` (players still assigned).
///
/// The derived ordering places `Start` before all days and `Current` after
/// them, which is the display order of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BucketKey {
    Start,
    Day(NaiveDate),
    Current,
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Start => write!(f, "start"),
            BucketKey::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            BucketKey::Current => write!(f, "current"),
        }
    }
}

/// Derive the set of timeline buckets from a list of assignments.
///
/// Every closed `from_datetime`/`to_datetime` boundary contributes its UTC
/// calendar day; boundaries of different assignments falling on the same day
/// collapse into one bucket (a day can show multiple simultaneous
/// transfers). The `Start` and `Current` sentinels are always included,
/// whether or not any assignment has an open boundary -- the UI may render
/// them disabled when their membership is empty.
pub fn buckets_of(assignments: &[Assignment]) -> BTreeSet<BucketKey> {
    let mut buckets: BTreeSet<BucketKey> = assignments
        .iter()
        .flat_map(|a| [a.from_day(), a.to_day()])
        .flatten()
        .map(BucketKey::Day)
        .collect();

    buckets.insert(BucketKey::Start);
    buckets.insert(BucketKey::Current);
    buckets
}
