use std::cmp::Ordering;

use crate::models::{Match, NewTeamStanding, StandingChanges, TeamStanding};

use super::StandingError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn classify(goals_for: i32, goals_against: i32) -> Self {
        match goals_for.cmp(&goals_against) {
            Ordering::Greater => Outcome::Win,
            Ordering::Equal => Outcome::Draw,
            Ordering::Less => Outcome::Loss,
        }
    }

    pub fn points(self) -> i32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }
}

/// Cumulative numbers carried by a standing row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StandingTotals {
    pub matches_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
}

impl StandingTotals {
    fn record(self, goals_for: i32, goals_against: i32) -> Self {
        let outcome = Outcome::classify(goals_for, goals_against);
        StandingTotals {
            matches_played: self.matches_played + 1,
            wins: self.wins + (outcome == Outcome::Win) as i32,
            draws: self.draws + (outcome == Outcome::Draw) as i32,
            losses: self.losses + (outcome == Outcome::Loss) as i32,
            goals_for: self.goals_for + goals_for,
            goals_against: self.goals_against + goals_against,
            goal_difference: self.goal_difference + (goals_for - goals_against),
            points: self.points + outcome.points(),
        }
    }

    pub fn into_changes(self, name: String, tournament_id: i32) -> StandingChanges {
        StandingChanges {
            name,
            matches_played: self.matches_played,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            goals_for: self.goals_for,
            goals_against: self.goals_against,
            goal_difference: self.goal_difference,
            points: self.points,
            tournament_id,
        }
    }

    pub fn into_new_row(self, team_id: i32, name: String, m: &Match) -> NewTeamStanding {
        NewTeamStanding {
            team_id,
            name,
            matches_played: self.matches_played,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            goals_for: self.goals_for,
            goals_against: self.goals_against,
            goal_difference: self.goal_difference,
            points: self.points,
            match_id: m.id,
            tournament_id: m.tournament_id,
        }
    }
}

impl<'a> From<&'a TeamStanding> for StandingTotals {
    fn from(row: &'a TeamStanding) -> Self {
        StandingTotals {
            matches_played: row.matches_played,
            wins: row.wins,
            draws: row.draws,
            losses: row.losses,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
            goal_difference: row.goal_difference,
            points: row.points,
        }
    }
}

/// Computes the complete totals of `team_id` after `m`, on top of the
/// team's previous standing (or nothing at the start of the season).
pub fn compute(
    m: &Match,
    team_id: i32,
    previous: Option<&TeamStanding>,
) -> Result<StandingTotals, StandingError> {
    let (goals_for, goals_against) = match m.score_for(team_id) {
        Some((Some(goals_for), Some(goals_against))) => (goals_for, goals_against),
        Some(_) => return Err(StandingError::IncompleteScore(m.id)),
        None => {
            return Err(StandingError::InvalidTeamReference {
                team_id,
                match_id: m.id,
            })
        }
    };

    let base = previous.map(StandingTotals::from).unwrap_or_default();
    Ok(base.record(goals_for, goals_against))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn result(home_score: Option<i32>, away_score: Option<i32>) -> Match {
        Match {
            id: 7,
            week_number: 1,
            match_date: NaiveDate::from_ymd_opt(2025, 6, 29).unwrap(),
            match_time: Some("6:00 PM".to_owned()),
            home_team_id: 1,
            away_team_id: 2,
            home_score,
            away_score,
            is_played: true,
            is_walkover: false,
            walkover_winner_id: None,
            mom_player_id: None,
            tournament_id: 1,
        }
    }

    fn previous(totals: StandingTotals) -> TeamStanding {
        TeamStanding {
            id: 1,
            team_id: 1,
            name: "Propex FC".to_owned(),
            matches_played: totals.matches_played,
            wins: totals.wins,
            draws: totals.draws,
            losses: totals.losses,
            goals_for: totals.goals_for,
            goals_against: totals.goals_against,
            goal_difference: totals.goal_difference,
            points: totals.points,
            match_id: 3,
            tournament_id: 1,
        }
    }

    #[test]
    fn home_win_from_scratch() {
        let totals = compute(&result(Some(2), Some(1)), 1, None).unwrap();
        assert_eq!(
            totals,
            StandingTotals {
                matches_played: 1,
                wins: 1,
                draws: 0,
                losses: 0,
                goals_for: 2,
                goals_against: 1,
                goal_difference: 1,
                points: 3,
            }
        );
    }

    #[test]
    fn away_side_reads_the_score_backwards() {
        let totals = compute(&result(Some(2), Some(1)), 2, None).unwrap();
        assert_eq!(totals.losses, 1);
        assert_eq!(totals.points, 0);
        assert_eq!(totals.goals_for, 1);
        assert_eq!(totals.goals_against, 2);
        assert_eq!(totals.goal_difference, -1);
    }

    #[test]
    fn draw_gives_both_sides_a_point() {
        let m = result(Some(1), Some(1));
        for &team in &[1, 2] {
            let totals = compute(&m, team, None).unwrap();
            assert_eq!(totals.draws, 1);
            assert_eq!(totals.points, 1);
            assert_eq!(totals.wins, 0);
            assert_eq!(totals.losses, 0);
        }
    }

    #[test]
    fn builds_on_previous_totals() {
        let before = previous(StandingTotals {
            matches_played: 3,
            wins: 1,
            draws: 1,
            losses: 1,
            goals_for: 4,
            goals_against: 7,
            goal_difference: -3,
            points: 4,
        });
        let totals = compute(&result(Some(0), Some(2)), 1, Some(&before)).unwrap();
        assert_eq!(totals.matches_played, 4);
        assert_eq!(totals.losses, 2);
        assert_eq!(totals.points, 4);
        assert_eq!(totals.goal_difference, -5);
        assert_eq!(totals.goals_against, 9);
    }

    #[test]
    fn missing_score_is_rejected() {
        match compute(&result(Some(2), None), 1, None) {
            Err(StandingError::IncompleteScore(7)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn outsider_is_rejected() {
        match compute(&result(Some(2), Some(0)), 9, None) {
            Err(StandingError::InvalidTeamReference { team_id: 9, match_id: 7 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
