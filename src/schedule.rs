//! Fixture generation for a new season.
//!
//! Every team meets every other team twice, once at home and once away, and
//! plays exactly once per week. Standings are derived week by week, so a
//! schedule that left a team idle would leave a hole in its history.

use std::error::Error as StdError;

use chrono::{Duration, NaiveDate};

use crate::config::LeagueConfig;
use crate::models::MatchRecord;

#[derive(Debug, Display)]
pub enum ScheduleError {
    #[display(fmt = "a league needs at least two teams, got {}", _0)]
    TooFewTeams(usize),

    #[display(fmt = "{} teams would leave one team idle every week", _0)]
    OddTeamCount(usize),

    #[display(fmt = "{} matches per week but only {} kick-off slots", matches, slots)]
    NotEnoughSlots { matches: usize, slots: usize },
}

impl StdError for ScheduleError {}

/// Single round robin by the circle method: one team stays put while the
/// others rotate around it. Returns one list of (home, away) per week.
pub fn round_robin(team_ids: &[i32]) -> Vec<Vec<(i32, i32)>> {
    let n = team_ids.len();
    if n < 2 || n % 2 != 0 {
        return Vec::new();
    }

    let mut circle = team_ids.to_vec();
    let mut rounds = Vec::with_capacity(n - 1);
    for round in 0..n - 1 {
        let pairs = (0..n / 2)
            .map(|i| {
                let (a, b) = (circle[i], circle[n - 1 - i]);
                // alternate so the fixed team is not always at home
                if i == 0 && round % 2 == 1 {
                    (b, a)
                } else {
                    (a, b)
                }
            })
            .collect();
        rounds.push(pairs);

        if let Some(last) = circle.pop() {
            circle.insert(1, last);
        }
    }
    rounds
}

/// Dates of the first `weeks` match days, one week apart, skipping the
/// configured dates.
pub fn match_days(league: &LeagueConfig, weeks: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(weeks);
    let mut day = league.start_date;
    while days.len() < weeks {
        if !league.skip_dates.contains(&day) {
            days.push(day);
        }
        day = day + Duration::weeks(1);
    }
    days
}

/// Builds a double round robin for the given teams of a tournament.
pub fn generate(
    league: &LeagueConfig,
    tournament_id: i32,
    team_ids: &[i32],
) -> Result<Vec<MatchRecord>, ScheduleError> {
    let n = team_ids.len();
    if n < 2 {
        return Err(ScheduleError::TooFewTeams(n));
    }
    if n % 2 != 0 {
        return Err(ScheduleError::OddTeamCount(n));
    }
    let per_week = n / 2;
    if league.match_times.len() < per_week {
        return Err(ScheduleError::NotEnoughSlots {
            matches: per_week,
            slots: league.match_times.len(),
        });
    }

    let first_half = round_robin(team_ids);
    let second_half = first_half
        .iter()
        .map(|pairs| pairs.iter().map(|&(home, away)| (away, home)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let weeks = first_half.into_iter().chain(second_half).collect::<Vec<_>>();
    let days = match_days(league, weeks.len());

    let mut records = Vec::with_capacity(weeks.len() * per_week);
    for (week, (pairs, day)) in weeks.iter().zip(days).enumerate() {
        for (&(home, away), time) in pairs.iter().zip(&league.match_times) {
            records.push(MatchRecord {
                week_number: week as i32 + 1,
                match_date: day,
                match_time: Some(time.clone()),
                home_team_id: home,
                away_team_id: away,
                home_score: None,
                away_score: None,
                is_played: false,
                is_walkover: false,
                walkover_winner_id: None,
                mom_player_id: None,
                tournament_id,
            });
        }
    }
    info!(
        "generated {} matches over {} weeks for tournament {}",
        records.len(),
        weeks.len(),
        tournament_id
    );
    Ok(records)
}
