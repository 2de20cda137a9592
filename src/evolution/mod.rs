// Team value evolution: the sampled value trajectories returned by the
// valuation service, their fetch coordination, and the merge for display.

pub mod fetch;
pub mod merge;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sampled day of a team value trajectory.
///
/// The API serializes the theoretical value under its historical spelling
/// `theorical_value`; the rename keeps that off the Rust surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    pub at: DateTime<Utc>,
    pub value: f64,
    #[serde(rename = "theorical_value")]
    pub theoretical_value: f64,
}
