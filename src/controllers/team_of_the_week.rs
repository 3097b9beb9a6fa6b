use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{format_day, Directory};
use crate::models::TeamOfTheWeek;

#[derive(Clone, Debug, Serialize)]
pub struct PickedPlayer {
    pub position: &'static str,
    pub player_id: i32,
    pub name: String,
    pub team: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TeamOfTheWeekView {
    pub week: i32,
    pub week_labels: BTreeMap<i32, String>,
    pub weekend_date: Option<NaiveDate>,
    /// Formatted weekend date, or "N/A" when the week has no pick.
    pub week_date: String,
    /// Empty when nobody was picked for the week.
    pub lineup: Vec<PickedPlayer>,
}

/// The latest week with a pick, or week 1 when there are none yet.
pub fn default_week(picks: &[TeamOfTheWeek]) -> i32 {
    picks.iter().map(|pick| pick.week_number).max().unwrap_or(1)
}

pub fn view(picks: &[TeamOfTheWeek], dir: &Directory<'_>, requested_week: Option<i32>) -> TeamOfTheWeekView {
    let week = requested_week.unwrap_or_else(|| default_week(picks));

    let mut week_labels: BTreeMap<i32, String> = picks
        .iter()
        .map(|pick| {
            let label = format!("{} - {}", pick.week_number, format_day(pick.weekend_date));
            (pick.week_number, label)
        })
        .collect();
    week_labels
        .entry(week)
        .or_insert_with(|| format!("{} - (No date)", week));

    let selected = picks.iter().find(|pick| pick.week_number == week);
    let lineup = selected
        .map(|pick| {
            pick.lineup()
                .iter()
                .map(|&(position, player_id)| PickedPlayer {
                    position,
                    player_id,
                    name: dir.player_name(player_id),
                    team: dir.player_team(player_id),
                })
                .collect()
        })
        .unwrap_or_default();

    TeamOfTheWeekView {
        week,
        week_labels,
        weekend_date: selected.map(|pick| pick.weekend_date),
        week_date: selected
            .map(|pick| format_day(pick.weekend_date))
            .unwrap_or_else(|| "N/A".to_owned()),
        lineup,
    }
}
