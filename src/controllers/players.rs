use super::{Directory, MatchView};
use crate::models::{Card, CardType, Goal, Match, Player, Team};

#[derive(Debug, Serialize)]
pub struct PlayersView {
    pub teams: Vec<Team>,
    pub selected_team: Option<Team>,
    pub players: Vec<Player>,
}

/// Teams of the tournament and the roster of one of them, the first by name
/// unless another is asked for.
pub fn view(teams: &[Team], players: &[Player], requested_team: Option<i32>) -> PlayersView {
    let mut teams = teams.to_vec();
    teams.sort_by(|a, b| a.name.cmp(&b.name));

    let selected_team = requested_team
        .and_then(|id| teams.iter().find(|team| team.id == id))
        .or_else(|| teams.first())
        .cloned();
    let mut roster: Vec<Player> = match &selected_team {
        Some(team) => players.iter().filter(|p| p.team_id == team.id).cloned().collect(),
        None => Vec::new(),
    };
    roster.sort_by(|a, b| a.name.cmp(&b.name));

    PlayersView {
        teams,
        selected_team,
        players: roster,
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileGoal {
    pub match_id: i32,
    pub week: i32,
    pub opponent: String,
    pub goals: i32,
    pub own_goal: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfileCard {
    pub match_id: i32,
    pub week: i32,
    pub card_type: Option<CardType>,
}

#[derive(Debug, Serialize)]
pub struct PlayerProfile {
    pub player: Player,
    pub team: String,
    pub total_goals: i32,
    pub goals: Vec<ProfileGoal>,
    pub cards: Vec<ProfileCard>,
    pub mom_matches: Vec<MatchView>,
}

/// A player's record in one tournament. `None` when the player is not part
/// of it.
pub fn profile(
    player_id: i32,
    dir: &Directory<'_>,
    matches: &[Match],
    goals: &[Goal],
    cards: &[Card],
) -> Option<PlayerProfile> {
    let player = dir.player(player_id)?;
    let find_match = |match_id: i32| matches.iter().find(|m| m.id == match_id);

    let goals: Vec<ProfileGoal> = goals
        .iter()
        .filter(|goal| goal.player_id == player_id)
        .filter_map(|goal| {
            let m = find_match(goal.match_id)?;
            let opponent = if m.home_team_id == player.team_id {
                m.away_team_id
            } else {
                m.home_team_id
            };
            Some(ProfileGoal {
                match_id: m.id,
                week: m.week_number,
                opponent: dir.team_name(opponent),
                goals: goal.goals,
                own_goal: goal.own_goal,
            })
        })
        .collect();

    let cards = cards
        .iter()
        .filter(|card| card.player_id == player_id)
        .filter_map(|card| {
            find_match(card.match_id).map(|m| ProfileCard {
                match_id: m.id,
                week: m.week_number,
                card_type: card.kind(),
            })
        })
        .collect();

    Some(PlayerProfile {
        player: player.clone(),
        team: dir.team_name(player.team_id),
        total_goals: goals.iter().filter(|g| !g.own_goal).map(|g| g.goals).sum(),
        goals,
        cards,
        mom_matches: matches
            .iter()
            .filter(|m| m.mom_player_id == Some(player_id))
            .map(|m| MatchView::new(m, dir))
            .collect(),
    })
}
