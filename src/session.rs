// Analytics session: the stateful facade tying the timeline, the ledger
// and the evolution fetches together for one team at a time.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::Credentials;
use crate::evolution::fetch::{EvolutionCoordinator, FetchEvent, SlotState};
use crate::evolution::merge::{merge, MergedChart};
use crate::ledger::{AdaptationRow, Modification, ModificationLedger};
use crate::players::{candidates_for, find_player, PlayerStat};
use crate::service::ValuationService;
use crate::timeline::{buckets_of, resolve, Assignment, AssignmentId, BucketKey, PlayerId};

/// One roster line of the squad view for the selected bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct SquadRow {
    pub assignment_id: AssignmentId,
    pub roster_slot_code: String,
    pub player_id: PlayerId,
    pub player_name: String,
}

/// Immutable snapshot of everything the display layer needs to render.
///
/// The two fetch slots are exposed independently so the chart can show
/// which trajectory is in flight or failed without conflating them.
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub team_code: String,
    pub buckets: Vec<BucketKey>,
    pub selected_bucket: Option<BucketKey>,
    pub squad: Vec<SquadRow>,
    pub adaptations: Vec<AdaptationRow>,
    pub chart: MergedChart,
    pub baseline: SlotState,
    pub adapted: SlotState,
}

/// Session state for the team currently under analysis.
///
/// All mutations are synchronous; the only asynchronous effects are the
/// evolution fetches, which come back through [`handle_fetch_event`].
///
/// [`handle_fetch_event`]: AnalyticsSession::handle_fetch_event
pub struct AnalyticsSession {
    team_code: String,
    credentials: Credentials,
    assignments: Vec<Assignment>,
    directory: Vec<PlayerStat>,
    selected_bucket: Option<BucketKey>,
    ledger: ModificationLedger,
    coordinator: EvolutionCoordinator,
}

impl AnalyticsSession {
    pub fn new(
        team_code: String,
        credentials: Credentials,
        service: Arc<dyn ValuationService>,
        events: mpsc::Sender<FetchEvent>,
    ) -> Self {
        AnalyticsSession {
            team_code,
            credentials,
            assignments: Vec::new(),
            directory: Vec::new(),
            selected_bucket: None,
            ledger: ModificationLedger::new(),
            coordinator: EvolutionCoordinator::new(service, events),
        }
    }

    pub fn team_code(&self) -> &str {
        &self.team_code
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn directory(&self) -> &[PlayerStat] {
        &self.directory
    }

    pub fn modifications(&self) -> &[Modification] {
        self.ledger.modifications()
    }

    /// Replace the team's assignment history, resetting the bucket
    /// selection since the old bucket may no longer exist.
    pub fn set_assignments(&mut self, assignments: Vec<Assignment>) {
        self.assignments = assignments;
        self.selected_bucket = None;
    }

    pub fn set_directory(&mut self, directory: Vec<PlayerStat>) {
        self.directory = directory;
    }

    /// Select a timeline bucket, or clear the selection with `None`.
    pub fn select_bucket(&mut self, bucket: Option<BucketKey>) {
        if let Some(bucket) = &bucket {
            debug!(bucket = %bucket, "selected timeline bucket");
        }
        self.selected_bucket = bucket;
    }

    /// Kick off the baseline evolution fetch for the active team.
    pub fn refresh_baseline(&mut self) {
        self.coordinator
            .request_baseline(&self.team_code, &self.credentials);
    }

    fn refresh_adapted(&mut self) {
        self.coordinator.request_adapted(
            &self.team_code,
            &self.credentials,
            self.ledger.modifications(),
        );
    }

    /// Replace the session credentials and re-fetch both trajectories.
    ///
    /// Requests already in flight carried the old credentials, so they are
    /// invalidated before anything new is issued.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
        self.coordinator.invalidate();
        self.refresh_baseline();
        self.refresh_adapted();
    }

    /// Record a substitution and re-fetch the adapted trajectory.
    pub fn add_modification(&mut self, modification: Modification) {
        self.ledger.append(modification);
        self.refresh_adapted();
    }

    /// Remove the substitution at `index` (no-op out of range) and
    /// re-fetch; removing the last one clears the adapted trajectory.
    pub fn remove_modification(&mut self, index: usize) {
        self.ledger.remove_at(index);
        self.refresh_adapted();
    }

    /// Drop every substitution and clear the adapted trajectory.
    pub fn clear_modifications(&mut self) {
        self.ledger.clear();
        self.refresh_adapted();
    }

    /// Switch the session to another team: every piece of per-team state
    /// is torn down, in-flight fetches are invalidated, and a fresh
    /// baseline fetch is issued.
    pub fn switch_team(&mut self, team_code: String) {
        info!(from = %self.team_code, to = %team_code, "switching team");
        self.team_code = team_code;
        self.assignments.clear();
        self.selected_bucket = None;
        self.ledger.clear();
        self.coordinator.invalidate();
        self.refresh_baseline();
    }

    /// Route a completed fetch into the coordinator. Stale completions
    /// from superseded requests are dropped there.
    pub fn handle_fetch_event(&mut self, event: FetchEvent) {
        self.coordinator.apply(event);
    }

    /// Replacement candidates for the slot of the given assignment, or an
    /// empty list when the assignment is unknown.
    pub fn candidates_for_slot(&self, assignment_id: AssignmentId) -> Vec<&PlayerStat> {
        match self.assignments.iter().find(|a| a.id == assignment_id) {
            Some(assignment) => candidates_for(assignment, &self.directory),
            None => Vec::new(),
        }
    }

    /// Assemble the full render snapshot for the current state.
    pub fn display_state(&self) -> DisplayState {
        let squad = resolve(&self.assignments, self.selected_bucket.as_ref())
            .into_iter()
            .map(|a| {
                let player_name = find_player(&self.directory, a.player_id)
                    .map(|info| info.name.clone())
                    .unwrap_or_else(|| format!("Player {}", a.player_id));
                SquadRow {
                    assignment_id: a.id,
                    roster_slot_code: a.roster_slot_code,
                    player_id: a.player_id,
                    player_name,
                }
            })
            .collect();

        let baseline = self.coordinator.baseline().clone();
        let adapted = self.coordinator.adapted().clone();

        DisplayState {
            team_code: self.team_code.clone(),
            buckets: buckets_of(&self.assignments).into_iter().collect(),
            selected_bucket: self.selected_bucket.clone(),
            squad,
            adaptations: self.ledger.derive(&self.assignments, &self.directory),
            chart: merge(baseline.data.as_deref(), adapted.data.as_deref()),
            baseline,
            adapted,
        }
    }
}
