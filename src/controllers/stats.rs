use std::collections::{BTreeMap, HashMap};

use super::Directory;
use crate::models::{Card, CardType, Goal, Match};

#[derive(Debug, PartialEq, Serialize)]
pub struct PlayerTally {
    pub player_id: i32,
    pub player: String,
    pub team: Option<String>,
    pub count: i32,
}

#[derive(Debug, Serialize)]
pub struct MomAward {
    pub match_id: i32,
    pub home_team: String,
    pub away_team: String,
    pub is_walkover: bool,
    pub player: Option<String>,
    pub team: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MomWeek {
    pub week: i32,
    pub awards: Vec<MomAward>,
}

#[derive(Debug, Serialize)]
pub struct StatsView {
    pub top_scorers: Vec<PlayerTally>,
    pub yellow_cards: Vec<PlayerTally>,
    pub red_cards: Vec<PlayerTally>,
    pub mom_by_week: Vec<MomWeek>,
}

/// Highest count first, ties by player name.
fn leaderboard(counts: HashMap<i32, i32>, dir: &Directory<'_>) -> Vec<PlayerTally> {
    let mut tallies: Vec<PlayerTally> = counts
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .map(|(player_id, count)| PlayerTally {
            player_id,
            player: dir.player_name(player_id),
            team: dir.player_team(player_id),
            count,
        })
        .collect();
    tallies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.player.cmp(&b.player)));
    tallies
}

fn card_counts(cards: &[Card], kind: CardType) -> HashMap<i32, i32> {
    let mut counts = HashMap::new();
    for card in cards.iter().filter(|card| card.kind() == Some(kind)) {
        *counts.entry(card.player_id).or_insert(0) += 1;
    }
    counts
}

pub fn view(matches: &[Match], goals: &[Goal], cards: &[Card], dir: &Directory<'_>) -> StatsView {
    // own goals count for the scoreline, not for the scorer
    let mut scored = HashMap::new();
    for goal in goals.iter().filter(|goal| !goal.own_goal) {
        *scored.entry(goal.player_id).or_insert(0) += goal.goals;
    }

    let mut weeks: BTreeMap<i32, Vec<MomAward>> = BTreeMap::new();
    for m in matches.iter().filter(|m| m.is_decided()) {
        weeks.entry(m.week_number).or_insert_with(Vec::new).push(MomAward {
            match_id: m.id,
            home_team: dir.team_name(m.home_team_id),
            away_team: dir.team_name(m.away_team_id),
            is_walkover: m.is_walkover,
            player: m.mom_player_id.map(|id| dir.player_name(id)),
            team: m.mom_player_id.and_then(|id| dir.player_team(id)),
        });
    }

    StatsView {
        top_scorers: leaderboard(scored, dir),
        yellow_cards: leaderboard(card_counts(cards, CardType::Yellow), dir),
        red_cards: leaderboard(card_counts(cards, CardType::Red), dir),
        mom_by_week: weeks
            .into_iter()
            .rev()
            .map(|(week, awards)| MomWeek { week, awards })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::fixture::{fixture, played, player, teams};

    fn goal(id: i32, player_id: i32, goals: i32, own_goal: bool) -> Goal {
        Goal {
            id,
            match_id: 1,
            player_id,
            own_goal,
            goals,
            tournament_id: 1,
        }
    }

    fn card(id: i32, player_id: i32, card_type: &str) -> Card {
        Card {
            id,
            match_id: 1,
            player_id,
            card_type: card_type.to_owned(),
            tournament_id: 1,
        }
    }

    #[test]
    fn scorers_ignore_own_goals() {
        let teams = teams(&["Reckon FC", "BKFC"]);
        let players = vec![player(1, "Aman", 1), player(2, "Bilal", 2), player(3, "Chirag", 2)];
        let dir = Directory::new(&teams, &players);
        let goals = vec![
            goal(1, 1, 2, false),
            goal(2, 2, 1, false),
            goal(3, 1, 1, false),
            goal(4, 3, 2, true),
        ];

        let view = view(&[], &goals, &[], &dir);
        let scorers: Vec<(&str, i32)> = view
            .top_scorers
            .iter()
            .map(|t| (t.player.as_str(), t.count))
            .collect();
        assert_eq!(scorers, vec![("Aman", 3), ("Bilal", 1)]);
        assert_eq!(view.top_scorers[1].team.as_deref(), Some("BKFC"));
    }

    #[test]
    fn cards_are_split_by_colour() {
        let teams = teams(&["Reckon FC"]);
        let players = vec![player(1, "Aman", 1), player(2, "Bilal", 1)];
        let dir = Directory::new(&teams, &players);
        let cards = vec![
            card(1, 1, "YELLOW"),
            card(2, 2, "YELLOW"),
            card(3, 2, "YELLOW"),
            card(4, 1, "RED"),
        ];

        let view = view(&[], &[], &cards, &dir);
        assert_eq!(view.yellow_cards[0].player, "Bilal");
        assert_eq!(view.yellow_cards[0].count, 2);
        assert_eq!(view.red_cards.len(), 1);
        assert_eq!(view.red_cards[0].player, "Aman");
    }

    #[test]
    fn mom_awards_latest_week_first() {
        let teams = teams(&["Reckon FC", "BKFC"]);
        let players = vec![player(1, "Aman", 1)];
        let dir = Directory::new(&teams, &players);
        let mut first = played(1, 1, 1, 2, (1, 0));
        first.mom_player_id = Some(1);
        let second = played(2, 2, 2, 1, (0, 0));
        let upcoming = fixture(3, 3, 1, 2);

        let view = view(&[first, second, upcoming], &[], &[], &dir);
        let weeks: Vec<i32> = view.mom_by_week.iter().map(|w| w.week).collect();
        assert_eq!(weeks, vec![2, 1]);
        let award = &view.mom_by_week[1].awards[0];
        assert_eq!(award.player.as_deref(), Some("Aman"));
        assert_eq!(award.team.as_deref(), Some("Reckon FC"));
        assert_eq!(view.mom_by_week[0].awards[0].player, None);
    }
}
