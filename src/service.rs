// Valuation service: the HTTP client that fetches team value evolutions
// and the player directory from the hmtracker REST API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Credentials;
use crate::evolution::EvolutionPoint;
use crate::ledger::Modification;
use crate::players::PlayerStat;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("API returned status {status}")]
    Http { status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Credential envelope carried on every evolution request.
#[derive(Debug, Clone, Serialize)]
struct AuthRequest<'a> {
    hm_user: &'a str,
    hm_password: &'a str,
}

/// The modification list as the API expects it, keyed by the assignment's
/// team-roster entry id.
#[derive(Debug, Clone, Serialize)]
struct WireModification {
    team_id: i64,
    replaced_player_id: i64,
}

#[derive(Debug, Clone, Serialize)]
struct TransfertModification {
    modifications: Vec<WireModification>,
}

/// Body of `POST /myteam/team_value_evolution`. The `transfert_modification`
/// field name is the API's historical spelling.
#[derive(Debug, Clone, Serialize)]
struct EvolutionRequest<'a> {
    request: AuthRequest<'a>,
    transfert_modification: TransfertModification,
}

#[derive(Debug, Clone, Deserialize)]
struct TeamValueEvolution {
    evolution: Vec<EvolutionPoint>,
}

// ---------------------------------------------------------------------------
// Service trait
// ---------------------------------------------------------------------------

/// Seam between the session logic and the REST API, so the fetch
/// coordinator can be driven by a mock in tests.
#[async_trait]
pub trait ValuationService: Send + Sync {
    /// Fetch the value evolution for `team_code`, with the given
    /// hypothetical substitutions applied (empty slice for the baseline).
    async fn team_value_evolution(
        &self,
        team_code: &str,
        credentials: &Credentials,
        modifications: &[Modification],
    ) -> Result<Vec<EvolutionPoint>, ServiceError>;

    /// Fetch the latest player directory.
    async fn latest_players(&self) -> Result<Vec<PlayerStat>, ServiceError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

pub struct HttpValuationService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpValuationService {
    pub fn new(base_url: String) -> Self {
        HttpValuationService {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ServiceError::Http {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl ValuationService for HttpValuationService {
    async fn team_value_evolution(
        &self,
        team_code: &str,
        credentials: &Credentials,
        modifications: &[Modification],
    ) -> Result<Vec<EvolutionPoint>, ServiceError> {
        let url = format!("{}/myteam/team_value_evolution", self.base_url);
        let body = EvolutionRequest {
            request: AuthRequest {
                hm_user: &credentials.hm_user,
                hm_password: &credentials.hm_password,
            },
            transfert_modification: TransfertModification {
                modifications: modifications
                    .iter()
                    .map(|m| WireModification {
                        team_id: m.slot_assignment_id,
                        replaced_player_id: m.replacement_player_id,
                    })
                    .collect(),
            },
        };

        debug!(team_code, modifications = modifications.len(), "requesting team value evolution");

        let response = self
            .client
            .post(&url)
            .query(&[("team_code", team_code)])
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response)?;

        let body = response.text().await?;
        let evolution: TeamValueEvolution = serde_json::from_str(&body)?;
        Ok(evolution.evolution)
    }

    async fn latest_players(&self) -> Result<Vec<PlayerStat>, ServiceError> {
        let url = format!("{}/players/latest/", self.base_url);
        debug!("requesting latest player directory");

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response)?;

        let body = response.text().await?;
        let players: Vec<PlayerStat> = serde_json::from_str(&body)?;
        Ok(players)
    }
}
