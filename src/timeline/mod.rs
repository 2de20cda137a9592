// Squad timeline: time-ranged roster assignments, transfer-day bucketing,
// and bucket membership resolution.

pub mod assignment;
pub mod bucket;
pub mod membership;

pub use assignment::{Assignment, AssignmentId, PlayerId};
pub use bucket::{buckets_of, BucketKey};
pub use membership::resolve;
