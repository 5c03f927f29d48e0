// Console rendering for the listing mode

use std::collections::BTreeSet;

use roster_domain::{format_log_time, PlayerRecord};

pub fn render_roster(players: &[PlayerRecord]) -> String {
    if players.is_empty() {
        return "No player information found.\n".to_string();
    }

    let mut out = String::new();
    for player in players {
        out.push_str(&format!("Player SteamID: {}\n", player.steam_id));
        out.push_str(&format!("Steam Names: {}\n", join_names(&player.display_names)));
        out.push_str(&format!("Characters: {}\n", join_names(&player.character_names)));
        out.push_str(&format!("Sessions: {}\n", player.session_count));
        out.push_str(&format!("Last Seen: {}\n", format_log_time(&player.last_seen)));
        out.push('\n');
    }
    out
}

fn join_names(names: &BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}
