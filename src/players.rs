// Player directory types and the role-compatibility candidate filter.

use serde::{Deserialize, Serialize};

use crate::timeline::{Assignment, PlayerId};

/// Identity of a player as reported by the stats directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    /// Position group, e.g. "FORWARD", "DEFENDER", "GOALIE".
    pub role: String,
}

/// Current valuation figures for a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub price: f64,
    pub estimated_value: f64,
}

/// One entry of the player directory: identity plus latest stats.
///
/// Stats may be absent for players without data in the current season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStat {
    pub player_info: PlayerInfo,
    pub player_stats: Option<PlayerStats>,
}

/// Look up a player's identity in the directory.
pub fn find_player(directory: &[PlayerStat], id: PlayerId) -> Option<&PlayerInfo> {
    directory
        .iter()
        .map(|p| &p.player_info)
        .find(|info| info.id == id)
}

/// Replacement candidates for the player occupying `slot_assignment`.
///
/// A pure role-equality predicate: every candidate shares the role of the
/// currently assigned player, and the assigned player is never a candidate
/// (self-replacement is disallowed). No price or availability filtering
/// happens here. When the assigned player is missing from the directory
/// there is no role to match against and the list is empty.
pub fn candidates_for<'a>(
    slot_assignment: &Assignment,
    directory: &'a [PlayerStat],
) -> Vec<&'a PlayerStat> {
    let Some(original) = find_player(directory, slot_assignment.player_id) else {
        return Vec::new();
    };
    let role = original.role.clone();

    directory
        .iter()
        .filter(|p| p.player_info.role == role && p.player_info.id != slot_assignment.player_id)
        .collect()
}
