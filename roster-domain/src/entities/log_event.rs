// Typed events extracted from console log lines

use chrono::NaiveDateTime;

use crate::value_objects::SteamId;

/// One fact a log line can assert. A `CharacterJoin` is only meaningful when
/// paired with the most recent unpaired `IdentitySighting` of the same scan;
/// any number of unrelated lines may sit between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    IdentitySighting { steam_id: SteamId },
    CharacterJoin { character_name: String },
}

/// Extractor output for a single line. The timestamp is parsed independently
/// of the event markers and is best-effort: most lines carry neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLine {
    pub event: Option<LogEvent>,
    pub timestamp: Option<NaiveDateTime>,
}
