use std::collections::HashMap;

use crate::domain::PlayerInfo;
use crate::registry::{PlayerUpdate, RegistryPlayer};

/// Classified output of one resolver pass.
///
/// Every input player lands in exactly one of `id_map` (matched),
/// `new_players` (to create) or `unresolved` (needs enrichment); a player
/// queued in `to_update` is also present in `id_map`.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Registry entries queued for a license-number correction.
    pub to_update: Vec<PlayerUpdate>,
    /// Temporary id → permanent registry id.
    pub id_map: HashMap<i64, i64>,
    /// Players absent from the registry with enough data to create them.
    pub new_players: Vec<PlayerInfo>,
    /// Players absent from the registry and still missing identity fields.
    pub unresolved: Vec<PlayerInfo>,
    /// Permanent registry id → display name.
    pub name_map: HashMap<i64, String>,
}

impl Resolution {
    /// Record that a local player matched an existing registry entry.
    pub fn record_match(&mut self, tmp_id: i64, candidate: &RegistryPlayer) {
        self.id_map.insert(tmp_id, candidate.id);
        self.name_map.insert(candidate.id, candidate.display_name());
    }

    /// Fold a later resolver pass into this one.
    pub fn merge(&mut self, other: Resolution) {
        self.to_update.extend(other.to_update);
        self.id_map.extend(other.id_map);
        self.new_players.extend(other.new_players);
        self.unresolved.extend(other.unresolved);
        self.name_map.extend(other.name_map);
    }
}
