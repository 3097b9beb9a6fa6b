//! Standing snapshots and the cascade that keeps them consistent.
//!
//! Every decided match stores one cumulative row per participant. A row for
//! week `n` is derived from the same team's row for week `n - 1`, so any
//! change to a result has to be replayed forward through the rest of the
//! season. All of that goes through a [`StandingStore`], which the caller is
//! expected to wrap in a single transaction per match edit.

mod calculator;
mod cascade;
mod store;
mod upsert;

use std::error::Error as StdError;

use crate::db::DbError;
use crate::models::Match;

pub use self::calculator::{compute, Outcome, StandingTotals};
pub use self::cascade::cascade;
pub use self::store::{schedule_order, StandingStore};
pub use self::upsert::upsert;

#[cfg(test)]
pub(crate) use self::store::memory::MemoryStore;

#[derive(Debug, Display)]
pub enum StandingError {
    #[display(
        fmt = "team {} has no standing before week {}, recompute its history",
        team_id,
        week
    )]
    MissingPreviousStanding { team_id: i32, week: i32 },

    #[display(fmt = "team {} did not take part in match {}", team_id, match_id)]
    InvalidTeamReference { team_id: i32, match_id: i32 },

    #[display(
        fmt = "team {} has more than one standing with {} matches played",
        team_id,
        matches_played
    )]
    DuplicateStandingRow { team_id: i32, matches_played: i32 },

    #[display(fmt = "match {} is decided but has no final score", _0)]
    IncompleteScore(i32),

    Store(DbError),
}

impl StdError for StandingError {}

impl From<DbError> for StandingError {
    fn from(err: DbError) -> Self {
        StandingError::Store(err)
    }
}

/// A team left without a row for a match because its own history has a
/// hole before that week.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SkippedStanding {
    pub team_id: i32,
    pub match_id: i32,
    pub week: i32,
}

/// Outcome of a standings update: how many matches were replayed and which
/// teams had to be left out.
#[derive(Debug, Default, PartialEq)]
pub struct StandingsReport {
    pub replayed: usize,
    pub skipped: Vec<SkippedStanding>,
}

impl StandingsReport {
    fn record(&mut self, skipped: Vec<SkippedStanding>) {
        self.replayed += 1;
        self.absorb(skipped);
    }

    fn absorb(&mut self, skipped: Vec<SkippedStanding>) {
        for entry in skipped {
            if !self.skipped.contains(&entry) {
                self.skipped.push(entry);
            }
        }
    }

    fn merge(&mut self, other: StandingsReport) {
        self.replayed += other.replayed;
        self.absorb(other.skipped);
    }

    /// Ids of the teams with at least one skipped row, ascending.
    pub fn skipped_teams(&self) -> Vec<i32> {
        let mut teams: Vec<i32> = self.skipped.iter().map(|entry| entry.team_id).collect();
        teams.sort();
        teams.dedup();
        teams
    }
}

/// Records the standings for a freshly saved result and replays both teams'
/// later weeks on top of it.
///
/// Must only run once the match and its goals and cards are persisted. A team
/// with a gap in its history is skipped and reported; its opponent is still
/// scored.
pub fn on_match_result_committed<S>(store: &S, m: &Match) -> Result<StandingsReport, StandingError>
where
    S: StandingStore + ?Sized,
{
    let mut report = StandingsReport::default();
    if !m.is_decided() {
        debug!("match {} is not decided, leaving standings alone", m.id);
        return Ok(report);
    }

    report.record(upsert(store, m)?);
    for &team_id in &m.team_ids() {
        report.merge(cascade(store, team_id, m.week_number)?);
    }
    info!(
        "standings updated for match {} (week {}, teams {} and {})",
        m.id, m.week_number, m.home_team_id, m.away_team_id
    );
    Ok(report)
}

/// Drops the standings derived from a result that no longer counts.
///
/// The match's own rows go, and so does every row of either team from that
/// week on, since those were built on top of it. The opponents those teams
/// met later keep their rows: their own histories are still whole. The read
/// side lists the truncated teams as missing for those weeks. Everything
/// comes back when the match is decided again. Returns the number of rows
/// removed.
pub fn on_match_result_withdrawn<S>(store: &S, m: &Match) -> Result<usize, StandingError>
where
    S: StandingStore + ?Sized,
{
    let mut removed = store.delete_match_standings(m.id, &[])?;
    for &team_id in &m.team_ids() {
        let truncated = store.delete_team_standings_from(team_id, m.tournament_id, m.week_number)?;
        if truncated > 0 {
            warn!(
                "standings for team {} truncated before week {} ({} rows) after match {} was withdrawn",
                team_id, m.week_number, truncated, m.id
            );
        }
        removed += truncated;
    }
    Ok(removed)
}

/// Rebuilds every standing of a tournament from week 1.
///
/// Matches are replayed in schedule order across all teams so that each
/// row's predecessor already exists when it is needed. Teams behind a
/// postponed match are skipped from that week on and listed in the report.
pub fn recompute_tournament<S>(store: &S, tournament_id: i32) -> Result<StandingsReport, StandingError>
where
    S: StandingStore + ?Sized,
{
    let cleared = store.delete_tournament_standings(tournament_id)?;
    let decided = store.decided_matches_for_tournament(tournament_id)?;
    debug!(
        "recomputing tournament {}: cleared {} rows, replaying {} matches",
        tournament_id,
        cleared,
        decided.len()
    );

    let mut report = StandingsReport::default();
    for m in &decided {
        report.record(upsert(store, m)?);
    }
    Ok(report)
}
