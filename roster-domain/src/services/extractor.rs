// Console log line grammar: two fixed event markers plus an independent
// bracketed timestamp. Stateless, pure function of a line.

use chrono::NaiveDateTime;

use crate::entities::{LogEvent, ParsedLine};
use crate::value_objects::{parse_log_time, SteamId, STEAM_ID_LEN};

const IDENTITY_MARKER: &str = "received local Platform ID Steam_";
const JOIN_MARKER: &str = "Got character ZDOID from ";
const JOIN_NAME_TERMINATOR: &str = " :";

pub fn extract_line(line: &str) -> ParsedLine {
    ParsedLine {
        event: extract_event(line),
        timestamp: extract_timestamp(line),
    }
}

/// Ordered match: the identity marker wins over the join marker. The identity
/// token is the 17 characters immediately following the marker, shorter if
/// the line ends early, with no further validation.
fn extract_event(line: &str) -> Option<LogEvent> {
    if let Some((_, rest)) = line.split_once(IDENTITY_MARKER) {
        let token: String = rest.chars().take(STEAM_ID_LEN).collect();
        return Some(LogEvent::IdentitySighting {
            steam_id: SteamId::new(token),
        });
    }
    if let Some((_, rest)) = line.split_once(JOIN_MARKER) {
        let character_name = match rest.find(JOIN_NAME_TERMINATOR) {
            Some(end) => &rest[..end],
            None => rest,
        };
        return Some(LogEvent::CharacterJoin {
            character_name: character_name.to_string(),
        });
    }
    None
}

/// Text between the first `[` and the following `]`, parsed best-effort.
fn extract_timestamp(line: &str) -> Option<NaiveDateTime> {
    let open = line.find('[')?;
    let inner = &line[open + 1..];
    let close = inner.find(']')?;
    parse_log_time(&inner[..close])
}
