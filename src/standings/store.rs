use crate::models::{Match, NewTeamStanding, StandingChanges, TeamStanding};

use super::StandingError;

/// Persistence used by the standings engine.
///
/// Implementations must keep (team, match) and
/// (team, tournament, matches played) unique and report a violation as
/// [`StandingError::DuplicateStandingRow`].
pub trait StandingStore {
    fn find_standing(&self, match_id: i32, team_id: i32)
        -> Result<Option<TeamStanding>, StandingError>;

    /// Rows of a team with exactly `matches_played`. More than one row means
    /// the uniqueness constraint was bypassed.
    fn find_standings_at(
        &self,
        team_id: i32,
        tournament_id: i32,
        matches_played: i32,
    ) -> Result<Vec<TeamStanding>, StandingError>;

    fn insert_standing(&self, row: &NewTeamStanding) -> Result<TeamStanding, StandingError>;

    fn update_standing(&self, existing: &TeamStanding, changes: &StandingChanges)
        -> Result<(), StandingError>;

    /// Deletes the rows of a match, except the ones of the listed teams.
    fn delete_match_standings(&self, match_id: i32, keep_team_ids: &[i32])
        -> Result<usize, StandingError>;

    /// Deletes a team's rows with at least `matches_played`.
    fn delete_team_standings_from(
        &self,
        team_id: i32,
        tournament_id: i32,
        matches_played: i32,
    ) -> Result<usize, StandingError>;

    fn delete_tournament_standings(&self, tournament_id: i32) -> Result<usize, StandingError>;

    /// Played or walkover matches of a team from `start_week` on, ordered by
    /// week, date, time and id.
    fn decided_matches_for_team(&self, team_id: i32, start_week: i32)
        -> Result<Vec<Match>, StandingError>;

    /// Played or walkover matches of a tournament in schedule order.
    fn decided_matches_for_tournament(&self, tournament_id: i32)
        -> Result<Vec<Match>, StandingError>;

    fn team_name(&self, team_id: i32) -> Result<String, StandingError>;
}

/// Schedule order of matches: week, then date, then kick-off slot.
pub fn schedule_order(a: &Match, b: &Match) -> std::cmp::Ordering {
    (a.week_number, a.match_date, &a.match_time, a.id).cmp(&(
        b.week_number,
        b.match_date,
        &b.match_time,
        b.id,
    ))
}
