// Fetch coordination for the two evolution trajectories.
//
// Requests run as spawned tokio tasks; completions come back over an mpsc
// channel as `FetchEvent`s. Each slot carries a monotonically increasing
// generation counter so that out-of-order completions from superseded
// requests are discarded instead of overwriting newer data.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::ledger::Modification;
use crate::service::ValuationService;

use super::EvolutionPoint;

/// Which of the two trajectories a request or event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Baseline,
    Adapted,
}

/// Per-slot fetch state as observed by the display layer.
#[derive(Debug, Clone, Default)]
pub struct SlotState {
    pub data: Option<Vec<EvolutionPoint>>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Completion of one spawned fetch, tagged with the generation it was
/// spawned under.
#[derive(Debug)]
pub struct FetchEvent {
    pub slot: Slot,
    pub generation: u64,
    pub outcome: Result<Vec<EvolutionPoint>, String>,
}

/// Coordinates the baseline and adapted evolution fetches for one team.
///
/// Only the most recently issued request per slot may land: issuing a new
/// request bumps that slot's generation, and `apply` drops any event whose
/// generation no longer matches.
pub struct EvolutionCoordinator {
    service: Arc<dyn ValuationService>,
    events: mpsc::Sender<FetchEvent>,
    baseline: SlotState,
    adapted: SlotState,
    baseline_generation: u64,
    adapted_generation: u64,
}

impl EvolutionCoordinator {
    pub fn new(service: Arc<dyn ValuationService>, events: mpsc::Sender<FetchEvent>) -> Self {
        EvolutionCoordinator {
            service,
            events,
            baseline: SlotState::default(),
            adapted: SlotState::default(),
            baseline_generation: 0,
            adapted_generation: 0,
        }
    }

    pub fn baseline(&self) -> &SlotState {
        &self.baseline
    }

    pub fn adapted(&self) -> &SlotState {
        &self.adapted
    }

    /// Issue a baseline fetch (no modifications applied).
    pub fn request_baseline(&mut self, team_code: &str, credentials: &Credentials) {
        self.baseline_generation += 1;
        let generation = self.baseline_generation;
        self.baseline.loading = true;
        self.baseline.error = None;

        self.spawn_fetch(Slot::Baseline, generation, team_code, credentials, Vec::new());
        info!(team_code, generation, "requested baseline evolution");
    }

    /// Issue an adapted fetch for the given modifications.
    ///
    /// An empty modification list short-circuits: the adapted trajectory is
    /// cleared without touching the network, since it would only duplicate
    /// the baseline.
    pub fn request_adapted(
        &mut self,
        team_code: &str,
        credentials: &Credentials,
        modifications: &[Modification],
    ) {
        self.adapted_generation += 1;
        let generation = self.adapted_generation;

        if modifications.is_empty() {
            self.adapted = SlotState::default();
            debug!(generation, "no modifications, cleared adapted evolution");
            return;
        }

        self.adapted.loading = true;
        self.adapted.error = None;

        self.spawn_fetch(
            Slot::Adapted,
            generation,
            team_code,
            credentials,
            modifications.to_vec(),
        );
        info!(
            team_code,
            generation,
            modifications = modifications.len(),
            "requested adapted evolution"
        );
    }

    /// Discard all state and invalidate every in-flight request. Called
    /// when the active team changes.
    pub fn invalidate(&mut self) {
        self.baseline_generation += 1;
        self.adapted_generation += 1;
        self.baseline = SlotState::default();
        self.adapted = SlotState::default();
        debug!("invalidated evolution state");
    }

    /// Apply a completed fetch to the matching slot.
    ///
    /// Events whose generation differs from the slot's current one are from
    /// superseded requests and are dropped. Baseline errors are surfaced on
    /// the slot; adapted errors only clear the trajectory, keeping the
    /// baseline chart usable.
    pub fn apply(&mut self, event: FetchEvent) {
        let current = match event.slot {
            Slot::Baseline => self.baseline_generation,
            Slot::Adapted => self.adapted_generation,
        };
        if event.generation != current {
            debug!(
                slot = ?event.slot,
                event_generation = event.generation,
                current_generation = current,
                "discarding stale fetch event"
            );
            return;
        }

        match (event.slot, event.outcome) {
            (Slot::Baseline, Ok(points)) => {
                self.baseline = SlotState {
                    data: Some(points),
                    loading: false,
                    error: None,
                };
            }
            (Slot::Baseline, Err(message)) => {
                self.baseline = SlotState {
                    data: None,
                    loading: false,
                    error: Some(message),
                };
            }
            (Slot::Adapted, Ok(points)) => {
                self.adapted = SlotState {
                    data: Some(points),
                    loading: false,
                    error: None,
                };
            }
            (Slot::Adapted, Err(message)) => {
                warn!(error = %message, "adapted evolution fetch failed");
                self.adapted = SlotState::default();
            }
        }
    }

    fn spawn_fetch(
        &self,
        slot: Slot,
        generation: u64,
        team_code: &str,
        credentials: &Credentials,
        modifications: Vec<Modification>,
    ) {
        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        let team_code = team_code.to_string();
        let credentials = credentials.clone();

        tokio::spawn(async move {
            let outcome = service
                .team_value_evolution(&team_code, &credentials, &modifications)
                .await
                .map_err(|e| e.to_string());

            // Receiver gone means the session is shutting down.
            let _ = events
                .send(FetchEvent {
                    slot,
                    generation,
                    outcome,
                })
                .await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceError;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubService {
        calls: AtomicUsize,
    }

    impl StubService {
        fn new() -> Self {
            StubService {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ValuationService for StubService {
        async fn team_value_evolution(
            &self,
            _team_code: &str,
            _credentials: &Credentials,
            _modifications: &[Modification],
        ) -> Result<Vec<EvolutionPoint>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![point(1.0)])
        }

        async fn latest_players(
            &self,
        ) -> Result<Vec<crate::players::PlayerStat>, ServiceError> {
            Ok(Vec::new())
        }
    }

    fn point(value: f64) -> EvolutionPoint {
        EvolutionPoint {
            at: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
            value,
            theoretical_value: value,
        }
    }

    fn coordinator() -> (EvolutionCoordinator, mpsc::Receiver<FetchEvent>) {
        let (tx, rx) = mpsc::channel(16);
        (EvolutionCoordinator::new(Arc::new(StubService::new()), tx), rx)
    }

    fn credentials() -> Credentials {
        Credentials {
            hm_user: "u".into(),
            hm_password: "p".into(),
        }
    }

    fn modification() -> Modification {
        Modification {
            slot_assignment_id: 1,
            replacement_player_id: 2,
        }
    }

    #[tokio::test]
    async fn baseline_fetch_lands() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.request_baseline("HM42", &credentials());
        assert!(coordinator.baseline().loading);

        let event = rx.recv().await.unwrap();
        coordinator.apply(event);

        assert!(!coordinator.baseline().loading);
        assert_eq!(coordinator.baseline().data.as_ref().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stale_event_is_discarded() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.request_baseline("HM42", &credentials());
        let stale = rx.recv().await.unwrap();

        // A second request supersedes the first.
        coordinator.request_baseline("HM42", &credentials());
        let fresh = rx.recv().await.unwrap();

        coordinator.apply(FetchEvent {
            outcome: Ok(vec![point(999.0)]),
            ..stale
        });
        assert!(coordinator.baseline().data.is_none());
        assert!(coordinator.baseline().loading);

        coordinator.apply(fresh);
        assert!(coordinator.baseline().data.is_some());
    }

    #[tokio::test]
    async fn empty_modifications_clear_without_fetching() {
        let (tx, mut rx) = mpsc::channel(16);
        let service = Arc::new(StubService::new());
        let mut coordinator =
            EvolutionCoordinator::new(Arc::clone(&service) as Arc<dyn ValuationService>, tx);

        coordinator.request_adapted("HM42", &credentials(), &[]);

        assert!(coordinator.adapted().data.is_none());
        assert!(!coordinator.adapted().loading);
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn clearing_supersedes_an_in_flight_adapted_fetch() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.request_adapted("HM42", &credentials(), &[modification()]);
        let in_flight = rx.recv().await.unwrap();

        // The last modification is removed before the fetch lands.
        coordinator.request_adapted("HM42", &credentials(), &[]);
        coordinator.apply(in_flight);

        assert!(coordinator.adapted().data.is_none());
    }

    #[tokio::test]
    async fn baseline_error_is_surfaced_adapted_error_clears() {
        let (mut coordinator, _rx) = coordinator();
        coordinator.request_baseline("HM42", &credentials());
        coordinator.apply(FetchEvent {
            slot: Slot::Baseline,
            generation: 1,
            outcome: Err("boom".into()),
        });
        assert_eq!(coordinator.baseline().error.as_deref(), Some("boom"));

        coordinator.request_adapted("HM42", &credentials(), &[modification()]);
        coordinator.apply(FetchEvent {
            slot: Slot::Adapted,
            generation: 1,
            outcome: Err("boom".into()),
        });
        assert!(coordinator.adapted().error.is_none());
        assert!(coordinator.adapted().data.is_none());
    }

    #[tokio::test]
    async fn invalidate_drops_everything_in_flight() {
        let (mut coordinator, mut rx) = coordinator();
        coordinator.request_baseline("HM42", &credentials());
        let in_flight = rx.recv().await.unwrap();

        coordinator.invalidate();
        coordinator.apply(in_flight);

        assert!(coordinator.baseline().data.is_none());
        assert!(!coordinator.baseline().loading);
    }
}
