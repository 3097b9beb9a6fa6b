use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use super::Directory;
use crate::models::TeamStanding;

#[derive(Debug, Serialize)]
pub struct TableRow {
    pub position: usize,
    pub team_id: i32,
    pub team: String,
    pub matches_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
    /// Places gained since the previous week, negative when dropped.
    pub movement: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct TableView {
    pub weeks: Vec<i32>,
    pub selected_week: i32,
    pub rows: Vec<TableRow>,
    /// Teams with no standing for the selected week while others have one,
    /// by name. Their history has a hole behind a postponed or withdrawn
    /// result.
    pub missing: Vec<String>,
}

/// Points, then goal difference, then goals scored, then name.
fn league_order(a: &TeamStanding, b: &TeamStanding, dir: &Directory<'_>) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_difference.cmp(&a.goal_difference))
        .then(b.goals_for.cmp(&a.goals_for))
        .then_with(|| dir.team_name(a.team_id).cmp(&dir.team_name(b.team_id)))
}

fn ranked<'a>(standings: &'a [TeamStanding], week: i32, dir: &Directory<'_>) -> Vec<&'a TeamStanding> {
    let mut rows: Vec<&TeamStanding> = standings
        .iter()
        .filter(|row| row.matches_played == week)
        .collect();
    rows.sort_by(|a, b| league_order(a, b, dir));
    rows
}

/// The league table after `requested_week` matches, or after the latest
/// week when none is requested.
pub fn view(standings: &[TeamStanding], dir: &Directory<'_>, requested_week: Option<i32>) -> TableView {
    let weeks: Vec<i32> = standings
        .iter()
        .map(|row| row.matches_played)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let selected_week = requested_week
        .or_else(|| weeks.last().cloned())
        .unwrap_or(1);

    let previous: HashMap<i32, usize> = ranked(standings, selected_week - 1, dir)
        .into_iter()
        .enumerate()
        .map(|(i, row)| (row.team_id, i + 1))
        .collect();

    let current = ranked(standings, selected_week, dir);
    let mut missing: Vec<String> = Vec::new();
    if !current.is_empty() {
        missing = dir
            .team_ids()
            .into_iter()
            .filter(|&id| !current.iter().any(|row| row.team_id == id))
            .map(|id| dir.team_name(id))
            .collect();
        missing.sort();
    }

    let rows = current
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let position = i + 1;
            TableRow {
                position,
                team_id: row.team_id,
                // renamed teams show their current name throughout
                team: dir.team_name(row.team_id),
                matches_played: row.matches_played,
                wins: row.wins,
                draws: row.draws,
                losses: row.losses,
                goals_for: row.goals_for,
                goals_against: row.goals_against,
                goal_difference: row.goal_difference,
                points: row.points,
                movement: previous
                    .get(&row.team_id)
                    .map(|&before| before as i32 - position as i32),
            }
        })
        .collect();

    TableView {
        weeks,
        selected_week,
        rows,
        missing,
    }
}
