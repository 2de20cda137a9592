// Reconciliation of the baseline and adapted trajectories into one chart.

use chrono::{DateTime, Utc};

use super::EvolutionPoint;

/// Series labels, matching the dashboard legend.
pub const BASELINE_VALUE: &str = "Team Value";
pub const BASELINE_THEORETICAL: &str = "Team Theoretical Value";
pub const ADAPTED_VALUE: &str = "Adapted Team Value";
pub const ADAPTED_THEORETICAL: &str = "Adapted Team Theoretical Value";

/// One plottable line of the merged chart.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub label: &'static str,
    pub values: Vec<f64>,
    /// Theoretical companion lines render dashed to distinguish the
    /// target valuation from the realized one.
    pub dashed: bool,
}

/// The shared date axis plus every series plotted against it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedChart {
    pub dates: Vec<DateTime<Utc>>,
    pub series: Vec<NamedSeries>,
}

fn sorted_by_at(points: &[EvolutionPoint]) -> Vec<EvolutionPoint> {
    let mut sorted = points.to_vec();
    // Upstream data is not guaranteed sorted; re-sort defensively.
    sorted.sort_by_key(|p| p.at);
    sorted
}

/// Merge the baseline and adapted trajectories for display.
///
/// The date axis comes from the longer of the two sequences (by point
/// count, baseline winning ties), sorted ascending. Series are plotted
/// against that axis positionally, without resampling or date alignment:
/// a shorter series simply renders fewer points. Either input may be
/// absent, in which case only the other contributes.
pub fn merge(
    baseline: Option<&[EvolutionPoint]>,
    adapted: Option<&[EvolutionPoint]>,
) -> MergedChart {
    let baseline = baseline.map(sorted_by_at).unwrap_or_default();
    let adapted = adapted.map(sorted_by_at).unwrap_or_default();

    let dates: Vec<DateTime<Utc>> = if baseline.len() >= adapted.len() {
        baseline.iter().map(|p| p.at).collect()
    } else {
        adapted.iter().map(|p| p.at).collect()
    };

    let mut series = Vec::new();

    if !baseline.is_empty() {
        series.push(NamedSeries {
            label: BASELINE_VALUE,
            values: baseline.iter().map(|p| p.value).collect(),
            dashed: false,
        });
        series.push(NamedSeries {
            label: BASELINE_THEORETICAL,
            values: baseline.iter().map(|p| p.theoretical_value).collect(),
            dashed: true,
        });
    }

    if !adapted.is_empty() {
        series.push(NamedSeries {
            label: ADAPTED_VALUE,
            values: adapted.iter().map(|p| p.value).collect(),
            dashed: false,
        });
        series.push(NamedSeries {
            label: ADAPTED_THEORETICAL,
            values: adapted.iter().map(|p| p.theoretical_value).collect(),
            dashed: true,
        });
    }

    MergedChart { dates, series }
}
