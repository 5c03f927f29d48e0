// Player roster entities

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entities::Observation;
use crate::value_objects::{serde_log_time, SteamId};

/// One player identity and everything ever observed for it. Created on the
/// first observation of a steamID and mutated in place forever after; name
/// sets only grow, `last_seen` never moves backwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    #[serde(rename = "steamID")]
    pub steam_id: SteamId,
    pub display_names: BTreeSet<String>,
    pub character_names: BTreeSet<String>,
    pub session_count: u64,
    #[serde(with = "serde_log_time")]
    pub last_seen: NaiveDateTime,
}

impl PlayerRecord {
    pub fn first_observed(observation: &Observation) -> Self {
        Self {
            steam_id: observation.steam_id.clone(),
            display_names: BTreeSet::from([observation.display_name.clone()]),
            character_names: BTreeSet::from([observation.character_name.clone()]),
            session_count: 1,
            last_seen: observation.timestamp,
        }
    }
}

/// The durable player collection, keyed by steamID. The map key is the
/// record's own id, so uniqueness per steamID is structural.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: BTreeMap<SteamId, PlayerRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records. Should two records ever carry the
    /// same steamID, the later one wins, restoring the uniqueness invariant.
    pub fn from_records(records: Vec<PlayerRecord>) -> Self {
        let mut roster = Self::new();
        for record in records {
            roster.insert(record);
        }
        roster
    }

    pub fn to_records(&self) -> Vec<PlayerRecord> {
        self.players.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, steam_id: &SteamId) -> Option<&PlayerRecord> {
        self.players.get(steam_id)
    }

    pub fn get_mut(&mut self, steam_id: &SteamId) -> Option<&mut PlayerRecord> {
        self.players.get_mut(steam_id)
    }

    pub fn insert(&mut self, record: PlayerRecord) {
        self.players.insert(record.steam_id.clone(), record);
    }
}
