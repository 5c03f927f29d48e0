// Ephemeral per-scan types

use chrono::NaiveDateTime;

use crate::value_objects::SteamId;

/// One qualifying join extracted during a scan: identity, resolved nickname,
/// character and the line-timestamp context it was seen under. Staged in log
/// order, consumed by the merge step, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub steam_id: SteamId,
    pub display_name: String,
    pub character_name: String,
    pub timestamp: NaiveDateTime,
}

/// What a merge pass did to the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Records created for previously unseen steamIDs.
    pub created: usize,
    /// Observations folded into existing records.
    pub merged: usize,
    /// Merges that qualified as a new session (strictly newer timestamp).
    pub sessions_counted: usize,
}
