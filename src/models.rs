use chrono::{NaiveDate, NaiveDateTime};

use crate::schema::{
    cards, goals, matches, players, team_of_the_week, team_renames, team_standings, teams,
    tournaments,
};

/// Score awarded to the declared winner of a walkover.
pub const WALKOVER_SCORE: (i32, i32) = (3, 0);

#[derive(Clone, Debug, Queryable, Serialize)]
pub struct Tournament {
    pub id: i32,
    pub short_description: String,
    pub long_description: String,
    pub start_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Insertable)]
#[table_name = "tournaments"]
pub struct NewTournament {
    pub short_description: String,
    pub long_description: String,
    pub start_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Queryable, Serialize)]
pub struct Team {
    pub id: i32,
    pub name: String,
    pub tournament_id: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Insertable)]
#[table_name = "teams"]
pub struct NewTeam {
    pub name: String,
    pub tournament_id: Option<i32>,
}

/// One entry of the append-only rename log.
#[derive(Clone, Debug, Queryable, Serialize)]
pub struct TeamRename {
    pub id: i32,
    pub team_id: i32,
    pub old_name: String,
    pub new_name: String,
    pub renamed_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "team_renames"]
pub struct NewTeamRename {
    pub team_id: i32,
    pub old_name: String,
    pub new_name: String,
    pub renamed_at: NaiveDateTime,
}

#[derive(Clone, Debug, Queryable, Serialize)]
pub struct Player {
    pub id: i32,
    pub name: String,
    pub team_id: i32,
    pub tournament_id: i32,
}

#[derive(Clone, Debug, PartialEq, Insertable)]
#[table_name = "players"]
pub struct NewPlayer {
    pub name: String,
    pub team_id: i32,
    pub tournament_id: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct Match {
    pub id: i32,
    pub week_number: i32,
    pub match_date: NaiveDate,
    pub match_time: Option<String>,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub is_played: bool,
    pub is_walkover: bool,
    pub walkover_winner_id: Option<i32>,
    pub mom_player_id: Option<i32>,
    pub tournament_id: i32,
}

impl Match {
    /// A match counts towards the standings once it is played or awarded.
    pub fn is_decided(&self) -> bool {
        self.is_played || self.is_walkover
    }

    pub fn side_of(&self, team_id: i32) -> Option<Side> {
        if team_id == self.home_team_id {
            Some(Side::Home)
        } else if team_id == self.away_team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn team_ids(&self) -> [i32; 2] {
        [self.home_team_id, self.away_team_id]
    }

    /// (goals for, goals against) from the point of view of `team_id`.
    pub fn score_for(&self, team_id: i32) -> Option<(Option<i32>, Option<i32>)> {
        self.side_of(team_id).map(|side| match side {
            Side::Home => (self.home_score, self.away_score),
            Side::Away => (self.away_score, self.home_score),
        })
    }
}

/// Column values of a match row, used for both inserts and updates.
#[derive(Clone, Debug, PartialEq, Insertable, AsChangeset)]
#[table_name = "matches"]
#[changeset_options(treat_none_as_null = "true")]
pub struct MatchRecord {
    pub week_number: i32,
    pub match_date: NaiveDate,
    pub match_time: Option<String>,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub is_played: bool,
    pub is_walkover: bool,
    pub walkover_winner_id: Option<i32>,
    pub mom_player_id: Option<i32>,
    pub tournament_id: i32,
}

impl MatchRecord {
    /// Walkovers are never "played": the score is fixed at 3-0 for the
    /// declared winner, whatever the caller supplied.
    pub fn enforce_walkover(&mut self) {
        if !self.is_walkover {
            return;
        }
        self.is_played = false;
        let (winner, loser) = WALKOVER_SCORE;
        match self.walkover_winner_id {
            Some(id) if id == self.home_team_id => {
                self.home_score = Some(winner);
                self.away_score = Some(loser);
            }
            Some(id) if id == self.away_team_id => {
                self.home_score = Some(loser);
                self.away_score = Some(winner);
            }
            _ => {}
        }
    }
}

#[derive(Clone, Debug, Queryable, Serialize)]
pub struct Goal {
    pub id: i32,
    pub match_id: i32,
    pub player_id: i32,
    pub own_goal: bool,
    pub goals: i32,
    pub tournament_id: i32,
}

#[derive(Insertable)]
#[table_name = "goals"]
pub struct NewGoal {
    pub match_id: i32,
    pub player_id: i32,
    pub own_goal: bool,
    #[column_name = "goal_count"]
    pub goals: i32,
    pub tournament_id: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardType {
    Yellow,
    Red,
}

impl CardType {
    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Yellow => "YELLOW",
            CardType::Red => "RED",
        }
    }
}

#[derive(Clone, Debug, Queryable, Serialize)]
pub struct Card {
    pub id: i32,
    pub match_id: i32,
    pub player_id: i32,
    pub card_type: String,
    pub tournament_id: i32,
}

impl Card {
    pub fn kind(&self) -> Option<CardType> {
        match self.card_type.as_str() {
            "YELLOW" => Some(CardType::Yellow),
            "RED" => Some(CardType::Red),
            _ => None,
        }
    }
}

#[derive(Insertable)]
#[table_name = "cards"]
pub struct NewCard {
    pub match_id: i32,
    pub player_id: i32,
    pub card_type: String,
    pub tournament_id: i32,
}

/// Six players picked for one weekend of a tournament.
#[derive(Clone, Debug, Queryable, Serialize)]
pub struct TeamOfTheWeek {
    pub id: i32,
    pub week_number: i32,
    pub weekend_date: NaiveDate,
    pub striker_id: i32,
    pub left_mid_id: i32,
    pub right_mid_id: i32,
    pub left_defence_id: i32,
    pub right_defence_id: i32,
    pub goal_keeper_id: i32,
    pub tournament_id: i32,
}

impl TeamOfTheWeek {
    /// (position, player id) from the front line back.
    pub fn lineup(&self) -> [(&'static str, i32); 6] {
        [
            ("striker", self.striker_id),
            ("left_mid", self.left_mid_id),
            ("right_mid", self.right_mid_id),
            ("left_defence", self.left_defence_id),
            ("right_defence", self.right_defence_id),
            ("goal_keeper", self.goal_keeper_id),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Insertable)]
#[table_name = "team_of_the_week"]
pub struct NewTeamOfTheWeek {
    pub week_number: i32,
    pub weekend_date: NaiveDate,
    pub striker_id: i32,
    pub left_mid_id: i32,
    pub right_mid_id: i32,
    pub left_defence_id: i32,
    pub right_defence_id: i32,
    pub goal_keeper_id: i32,
    pub tournament_id: i32,
}

/// Cumulative totals of one team as of one match.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct TeamStanding {
    pub id: i32,
    pub team_id: i32,
    pub name: String,
    pub matches_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
    pub match_id: i32,
    pub tournament_id: i32,
}

#[derive(Clone, Debug, PartialEq, Insertable)]
#[table_name = "team_standings"]
pub struct NewTeamStanding {
    pub team_id: i32,
    pub name: String,
    pub matches_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
    pub match_id: i32,
    pub tournament_id: i32,
}

/// Everything on a standing row that a recomputation overwrites.
#[derive(Clone, Debug, PartialEq, AsChangeset)]
#[table_name = "team_standings"]
pub struct StandingChanges {
    pub name: String,
    pub matches_played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
    pub tournament_id: i32,
}
