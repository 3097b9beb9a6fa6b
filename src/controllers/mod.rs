//! Everything between the HTTP layer and the database: the admin workflows
//! and the read models behind each page.
//!
//! The read models are plain functions over rows loaded up front, which
//! keeps the selection and ordering rules testable without a database.

pub mod entries;
pub mod fixtures;
pub mod history;
pub mod matches;
pub mod players;
pub mod results;
pub mod stats;
pub mod table;
pub mod team_of_the_week;

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::models::{Match, Player, Team, Tournament};

/// Picks the requested tournament, falling back to the first one.
pub fn pick_tournament(tournaments: &[Tournament], requested: Option<i32>) -> Option<&Tournament> {
    requested
        .and_then(|id| tournaments.iter().find(|t| t.id == id))
        .or_else(|| tournaments.iter().min_by_key(|t| t.id))
}

pub fn format_day(day: NaiveDate) -> String {
    day.format("%A, %d %B %Y").to_string()
}

/// "3 - Sunday, 13 July 2025" for every week, dated by its earliest match.
pub fn week_labels(matches: &[Match]) -> BTreeMap<i32, String> {
    let mut first_days: BTreeMap<i32, NaiveDate> = BTreeMap::new();
    for m in matches {
        let day = first_days.entry(m.week_number).or_insert(m.match_date);
        if m.match_date < *day {
            *day = m.match_date;
        }
    }
    first_days
        .into_iter()
        .map(|(week, day)| (week, format!("{} - {}", week, format_day(day))))
        .collect()
}

/// Name lookups for the teams and players of one tournament.
pub struct Directory<'a> {
    teams: HashMap<i32, &'a Team>,
    players: HashMap<i32, &'a Player>,
}

impl<'a> Directory<'a> {
    pub fn new(teams: &'a [Team], players: &'a [Player]) -> Self {
        Directory {
            teams: teams.iter().map(|team| (team.id, team)).collect(),
            players: players.iter().map(|player| (player.id, player)).collect(),
        }
    }

    /// Ids of every team, ascending.
    pub fn team_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.teams.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn team(&self, id: i32) -> Option<&'a Team> {
        self.teams.get(&id).cloned()
    }

    pub fn team_name(&self, id: i32) -> String {
        self.team(id)
            .map(|team| team.name.clone())
            .unwrap_or_else(|| format!("team #{}", id))
    }

    pub fn player(&self, id: i32) -> Option<&'a Player> {
        self.players.get(&id).cloned()
    }

    pub fn player_name(&self, id: i32) -> String {
        self.player(id)
            .map(|player| player.name.clone())
            .unwrap_or_else(|| format!("player #{}", id))
    }

    /// Team name of a player.
    pub fn player_team(&self, id: i32) -> Option<String> {
        self.player(id).map(|player| self.team_name(player.team_id))
    }
}

/// A match as shown on the fixtures and results pages.
#[derive(Clone, Debug, Serialize)]
pub struct MatchView {
    pub id: i32,
    pub week_number: i32,
    pub match_date: NaiveDate,
    pub match_time: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub is_played: bool,
    pub is_walkover: bool,
    pub walkover_winner: Option<String>,
    pub mom: Option<String>,
}

impl MatchView {
    pub fn new(m: &Match, dir: &Directory<'_>) -> Self {
        MatchView {
            id: m.id,
            week_number: m.week_number,
            match_date: m.match_date,
            match_time: m.match_time.clone(),
            home_team: dir.team_name(m.home_team_id),
            away_team: dir.team_name(m.away_team_id),
            home_score: m.home_score,
            away_score: m.away_score,
            is_played: m.is_played,
            is_walkover: m.is_walkover,
            walkover_winner: m.walkover_winner_id.map(|id| dir.team_name(id)),
            mom: m.mom_player_id.map(|id| dir.player_name(id)),
        }
    }
}
