use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{format_day, week_labels, Directory, MatchView};
use crate::models::Match;

#[derive(Debug, Serialize)]
pub struct FixturesView {
    pub venue: String,
    pub week_labels: BTreeMap<i32, String>,
    pub selected_week: i32,
    pub week_date: Option<String>,
    pub max_week: i32,
    pub matches: Vec<MatchView>,
}

/// The week the fixtures page opens on: the next week with an unplayed
/// match from `today` on, else the latest played week, else week 1.
pub fn default_week(matches: &[Match], today: NaiveDate) -> i32 {
    let upcoming = matches
        .iter()
        .filter(|m| m.match_date >= today && !m.is_played)
        .min_by_key(|m| (m.week_number, m.match_date));
    if let Some(m) = upcoming {
        return m.week_number;
    }

    matches
        .iter()
        .filter(|m| m.is_played)
        .map(|m| m.week_number)
        .max()
        .unwrap_or(1)
}

/// `matches` must be in schedule order.
pub fn view(
    matches: &[Match],
    dir: &Directory<'_>,
    venue: &str,
    today: NaiveDate,
    requested_week: Option<i32>,
) -> FixturesView {
    let selected_week = requested_week.unwrap_or_else(|| default_week(matches, today));
    let week: Vec<&Match> = matches
        .iter()
        .filter(|m| m.week_number == selected_week)
        .collect();

    FixturesView {
        venue: venue.to_owned(),
        week_labels: week_labels(matches),
        selected_week,
        week_date: week.first().map(|m| format_day(m.match_date)),
        max_week: matches.iter().map(|m| m.week_number).max().unwrap_or(0),
        matches: week.into_iter().map(|m| MatchView::new(m, dir)).collect(),
    }
}
