//! Lookups by a team's name at any point in the season.
//!
//! Standings rows are keyed by team id; the name on each row is only what
//! the team was called when it was computed. The rename log maps old names
//! back to the team.

use crate::models::{Team, TeamRename, TeamStanding};

/// Finds the team currently or previously called `name`. A current name
/// wins over a former one, and the latest rename wins among former names.
pub fn resolve_team_name(name: &str, teams: &[Team], renames: &[TeamRename]) -> Option<i32> {
    if let Some(team) = teams.iter().find(|team| team.name == name) {
        return Some(team.id);
    }
    renames
        .iter()
        .filter(|rename| rename.old_name == name)
        .max_by_key(|rename| (rename.renamed_at, rename.id))
        .map(|rename| rename.team_id)
}

#[derive(Debug, Serialize)]
pub struct HistoryRow {
    pub matches_played: i32,
    pub match_id: i32,
    /// Name at the time the row was computed.
    pub name: String,
    pub points: i32,
    pub goal_difference: i32,
}

#[derive(Debug, Serialize)]
pub struct TeamHistory {
    pub team_id: i32,
    pub name: String,
    pub former_names: Vec<String>,
    pub weeks: Vec<HistoryRow>,
}

pub fn view(team: &Team, renames: &[TeamRename], standings: &[TeamStanding]) -> TeamHistory {
    let mut own_renames: Vec<&TeamRename> = renames.iter().filter(|r| r.team_id == team.id).collect();
    own_renames.sort_by_key(|rename| (rename.renamed_at, rename.id));

    let mut weeks: Vec<HistoryRow> = standings
        .iter()
        .filter(|row| row.team_id == team.id)
        .map(|row| HistoryRow {
            matches_played: row.matches_played,
            match_id: row.match_id,
            name: row.name.clone(),
            points: row.points,
            goal_difference: row.goal_difference,
        })
        .collect();
    weeks.sort_by_key(|row| row.matches_played);

    TeamHistory {
        team_id: team.id,
        name: team.name.clone(),
        former_names: own_renames.into_iter().map(|r| r.old_name.clone()).collect(),
        weeks,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::controllers::fixture::{standing, teams};

    fn rename(id: i32, team_id: i32, old_name: &str, new_name: &str, day: u32) -> TeamRename {
        TeamRename {
            id,
            team_id,
            old_name: old_name.to_owned(),
            new_name: new_name.to_owned(),
            renamed_at: NaiveDate::from_ymd_opt(2025, 7, day).unwrap().and_hms_opt(12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn old_names_resolve_to_the_renamed_team() {
        let teams = teams(&["Propex FC", "Reckon FC"]);
        let renames = vec![
            rename(1, 1, "Procure FC", "Propex Athletic", 6),
            rename(2, 1, "Propex Athletic", "Propex FC", 13),
        ];

        assert_eq!(resolve_team_name("Reckon FC", &teams, &renames), Some(2));
        assert_eq!(resolve_team_name("Procure FC", &teams, &renames), Some(1));
        assert_eq!(resolve_team_name("Propex Athletic", &teams, &renames), Some(1));
        assert_eq!(resolve_team_name("Nobody", &teams, &renames), None);
    }

    #[test]
    fn current_name_beats_former_name() {
        // team 2 took the name team 1 dropped
        let teams = teams(&["Propex FC", "Procure FC"]);
        let renames = vec![rename(1, 1, "Procure FC", "Propex FC", 6)];
        assert_eq!(resolve_team_name("Procure FC", &teams, &renames), Some(2));
    }

    #[test]
    fn latest_rename_wins_among_former_names() {
        let teams = teams(&["A", "B"]);
        let renames = vec![rename(1, 1, "Old", "A", 6), rename(2, 2, "Old", "B", 20)];
        assert_eq!(resolve_team_name("Old", &teams, &renames), Some(2));
    }

    #[test]
    fn history_lists_rows_in_week_order() {
        let teams = teams(&["Propex FC"]);
        let renames = vec![rename(1, 1, "Procure FC", "Propex FC", 6)];
        let standings = vec![standing(1, 2, 4, 1, 3), standing(1, 1, 3, 2, 2), standing(2, 1, 0, -2, 0)];

        let history = view(&teams[0], &renames, &standings);
        assert_eq!(history.former_names, vec!["Procure FC"]);
        let weeks: Vec<i32> = history.weeks.iter().map(|w| w.matches_played).collect();
        assert_eq!(weeks, vec![1, 2]);
        assert_eq!(history.weeks[0].name, "old name 1");
    }
}
