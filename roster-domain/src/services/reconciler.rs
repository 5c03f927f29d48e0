// Identity-merge policy. steamID is the only merge key; display and
// character names never split an identity. Replaying an already-folded
// observation changes nothing.

use crate::entities::{MergeStats, Observation, PlayerRecord, Roster};

/// Fold staged observations into the roster, in the order they were
/// encountered in the log.
pub fn apply_observations(roster: &mut Roster, staged: &[Observation]) -> MergeStats {
    let mut stats = MergeStats::default();
    for observation in staged {
        merge_observation(roster, observation, &mut stats);
    }
    stats
}

fn merge_observation(roster: &mut Roster, observation: &Observation, stats: &mut MergeStats) {
    match roster.get_mut(&observation.steam_id) {
        None => {
            roster.insert(PlayerRecord::first_observed(observation));
            stats.created += 1;
        }
        Some(record) => {
            record
                .display_names
                .insert(observation.display_name.clone());
            record
                .character_names
                .insert(observation.character_name.clone());
            // A strictly newer timestamp is the only thing that counts as a
            // new session; equal timestamps mean the sighting was already
            // folded (or shares the log's whole-second granularity).
            if observation.timestamp > record.last_seen {
                record.session_count += 1;
                record.last_seen = observation.timestamp;
                stats.sessions_counted += 1;
            }
            stats.merged += 1;
        }
    }
}
