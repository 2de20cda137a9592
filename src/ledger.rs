// Modification ledger: the ordered list of hypothetical substitutions
// applied to the squad for counterfactual valuation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::players::{find_player, PlayerStat};
use crate::timeline::{Assignment, AssignmentId, PlayerId};

/// One hypothetical substitution: the player occupying the referenced
/// assignment's slot is replaced by `replacement_player_id` for the whole
/// duration of that assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    pub slot_assignment_id: AssignmentId,
    pub replacement_player_id: PlayerId,
}

/// How a second modification referencing an already-modified slot is
/// treated.
///
/// The dashboard historically stacked duplicates (both entries kept, the
/// later one governing display), so `Stack` is the default. `Replace` keeps
/// a single entry per slot, overwriting in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateSlotPolicy {
    #[default]
    Stack,
    Replace,
}

/// Display row derived from one modification.
///
/// Lookups against the player directory are tolerant of stale references:
/// a missing player or assignment degrades to an `"Unknown"` label, never
/// an error.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptationRow {
    pub original_player: String,
    pub replacement_player: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Ordered sequence of hypothetical substitutions for the active session.
///
/// Owned exclusively by the analytics session; mutations are synchronous
/// and immediately visible to the next derived computation.
#[derive(Debug, Clone, Default)]
pub struct ModificationLedger {
    entries: Vec<Modification>,
    policy: DuplicateSlotPolicy,
}

impl ModificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicateSlotPolicy) -> Self {
        ModificationLedger {
            entries: Vec::new(),
            policy,
        }
    }

    /// Append a substitution to the end of the sequence.
    ///
    /// No role-compatibility validation happens here -- that is enforced
    /// upstream by the candidate-selection flow. Under `Replace`, an entry
    /// for the same slot is overwritten in place instead of appended.
    pub fn append(&mut self, modification: Modification) {
        match self.policy {
            DuplicateSlotPolicy::Stack => self.entries.push(modification),
            DuplicateSlotPolicy::Replace => {
                if let Some(existing) = self
                    .entries
                    .iter_mut()
                    .find(|m| m.slot_assignment_id == modification.slot_assignment_id)
                {
                    *existing = modification;
                } else {
                    self.entries.push(modification);
                }
            }
        }
    }

    /// Remove the entry at `index`; a no-op when out of bounds.
    ///
    /// UI-driven indices come from the rendered list, so an out-of-range
    /// index means the entry is already gone and is not an error.
    pub fn remove_at(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
        } else {
            debug!(index, len = self.entries.len(), "ignoring out-of-range modification removal");
        }
    }

    /// Empty the ledger. Called when the active team or session changes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn modifications(&self) -> &[Modification] {
        &self.entries
    }

    /// Resolve each modification into a display row.
    ///
    /// The original player is found through the referenced assignment's
    /// `player_id`; the replacement directly by its id. Either lookup
    /// missing produces the literal `"Unknown"`.
    pub fn derive(
        &self,
        assignments: &[Assignment],
        directory: &[PlayerStat],
    ) -> Vec<AdaptationRow> {
        self.entries
            .iter()
            .map(|m| {
                let assignment = assignments.iter().find(|a| a.id == m.slot_assignment_id);

                let original_player = assignment
                    .and_then(|a| find_player(directory, a.player_id))
                    .map(|info| info.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());

                let replacement_player = find_player(directory, m.replacement_player_id)
                    .map(|info| info.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());

                AdaptationRow {
                    original_player,
                    replacement_player,
                    from_date: assignment.and_then(|a| a.from_day()),
                    to_date: assignment.and_then(|a| a.to_day()),
                }
            })
            .collect()
    }
}
