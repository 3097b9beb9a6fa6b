use std::collections::BTreeMap;

use super::{format_day, week_labels, Directory, MatchView};
use crate::models::{Card, CardType, Goal, Match};

#[derive(Debug, Serialize)]
pub struct GoalLine {
    pub player: String,
    pub team: Option<String>,
    pub own_goal: bool,
    pub goals: i32,
}

#[derive(Debug, Serialize)]
pub struct CardLine {
    pub player: String,
    pub team: Option<String>,
    pub card_type: Option<CardType>,
}

#[derive(Debug, Serialize)]
pub struct ResultView {
    #[serde(rename = "match")]
    pub match_: MatchView,
    pub goals: Vec<GoalLine>,
    pub cards: Vec<CardLine>,
}

#[derive(Debug, Serialize)]
pub struct ResultsView {
    pub week_labels: BTreeMap<i32, String>,
    pub selected_week: i32,
    pub week_date: Option<String>,
    pub results: Vec<ResultView>,
}

/// Latest week with a decided match, or week 1 before the season starts.
pub fn default_week(matches: &[Match]) -> i32 {
    matches
        .iter()
        .filter(|m| m.is_decided())
        .map(|m| m.week_number)
        .max()
        .unwrap_or(1)
}

pub fn view(
    matches: &[Match],
    goals: &[Goal],
    cards: &[Card],
    dir: &Directory<'_>,
    requested_week: Option<i32>,
) -> ResultsView {
    let decided: Vec<Match> = matches.iter().filter(|m| m.is_decided()).cloned().collect();
    let selected_week = requested_week.unwrap_or_else(|| default_week(&decided));
    let week: Vec<&Match> = decided
        .iter()
        .filter(|m| m.week_number == selected_week)
        .collect();

    let results = week
        .iter()
        .map(|m| ResultView {
            match_: MatchView::new(m, dir),
            goals: goals
                .iter()
                .filter(|goal| goal.match_id == m.id)
                .map(|goal| GoalLine {
                    player: dir.player_name(goal.player_id),
                    team: dir.player_team(goal.player_id),
                    own_goal: goal.own_goal,
                    goals: goal.goals,
                })
                .collect(),
            cards: cards
                .iter()
                .filter(|card| card.match_id == m.id)
                .map(|card| CardLine {
                    player: dir.player_name(card.player_id),
                    team: dir.player_team(card.player_id),
                    card_type: card.kind(),
                })
                .collect(),
        })
        .collect();

    ResultsView {
        week_labels: week_labels(&decided),
        selected_week,
        week_date: week.first().map(|m| format_day(m.match_date)),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::fixture::{fixture, played, player, teams};

    #[test]
    fn defaults_to_latest_decided_week() {
        let mut walkover = fixture(3, 3, 2, 1);
        walkover.is_walkover = true;
        let matches = vec![played(1, 1, 1, 2, (1, 0)), fixture(2, 2, 1, 2), walkover];
        assert_eq!(default_week(&matches), 3);
        assert_eq!(default_week(&[fixture(1, 1, 1, 2)]), 1);
    }

    #[test]
    fn attaches_goals_and_cards() {
        let teams = teams(&["Reckon FC", "Sapphire Seven"]);
        let players = vec![player(10, "Aman", 1), player(20, "Dev", 2)];
        let dir = Directory::new(&teams, &players);

        let mut m = played(1, 1, 1, 2, (2, 1));
        m.mom_player_id = Some(10);
        let matches = vec![m, fixture(2, 2, 2, 1)];
        let goals = vec![
            Goal { id: 1, match_id: 1, player_id: 10, own_goal: false, goals: 2, tournament_id: 1 },
            Goal { id: 2, match_id: 1, player_id: 10, own_goal: true, goals: 1, tournament_id: 1 },
        ];
        let cards = vec![Card {
            id: 1,
            match_id: 1,
            player_id: 20,
            card_type: "YELLOW".to_owned(),
            tournament_id: 1,
        }];

        let view = view(&matches, &goals, &cards, &dir, None);
        assert_eq!(view.selected_week, 1);
        assert_eq!(view.results.len(), 1);
        let result = &view.results[0];
        assert_eq!(result.match_.mom.as_deref(), Some("Aman"));
        assert_eq!(result.goals.len(), 2);
        assert!(result.goals[1].own_goal);
        assert_eq!(result.cards[0].team.as_deref(), Some("Sapphire Seven"));
        assert_eq!(result.cards[0].card_type, Some(CardType::Yellow));
        // only decided weeks get a label
        assert_eq!(view.week_labels.keys().collect::<Vec<_>>(), vec![&1]);
    }
}
