// Read-only roster access for the listing mode

use roster_domain::{PlayerRecord, RosterRepository};

use crate::AppError;

/// Load the stored roster without scanning, most recently seen first.
/// Takes the repository directly so the listing mode needs no resolver.
pub async fn fetch_roster(repo: &dyn RosterRepository) -> Result<Vec<PlayerRecord>, AppError> {
    let roster = repo.load().await.map_err(AppError::Store)?;
    let mut records = roster.to_records();
    records.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use roster_domain::{parse_log_time, Observation, PlayerRecord, Roster, SteamId};

    use super::*;

    struct FixedRosterRepository {
        roster: Roster,
    }

    #[async_trait]
    impl RosterRepository for FixedRosterRepository {
        async fn load(&self) -> anyhow::Result<Roster> {
            Ok(self.roster.clone())
        }

        async fn save(&self, _roster: &Roster) -> anyhow::Result<()> {
            unreachable!("listing mode never writes")
        }
    }

    fn record(steam_id: &str, character: &str, raw_time: &str) -> PlayerRecord {
        PlayerRecord::first_observed(&Observation {
            steam_id: SteamId::new(steam_id),
            display_name: format!("steam-{character}"),
            character_name: character.to_string(),
            timestamp: parse_log_time(raw_time).expect("timestamp"),
        })
    }

    #[tokio::test]
    async fn roster_is_listed_most_recent_first() {
        let repo = FixedRosterRepository {
            roster: Roster::from_records(vec![
                record("11111111111111111", "Erik", "01/01/2024 10:00:00"),
                record("22222222222222222", "Freya", "02/01/2024 10:00:00"),
            ]),
        };

        let records = fetch_roster(&repo).await.expect("fetch");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].steam_id, SteamId::new("22222222222222222"));
        assert_eq!(records[1].steam_id, SteamId::new("11111111111111111"));
    }
}
