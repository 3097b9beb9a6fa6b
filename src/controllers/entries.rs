//! Admin forms that register the things matches are played between:
//! tournaments, teams, players, and the weekly team-of-the-week pick.

use std::error::Error as StdError;

use chrono::NaiveDate;

use crate::db::{Db, DbError};
use crate::models::{
    NewPlayer, NewTeam, NewTeamOfTheWeek, NewTournament, Player, Team, TeamOfTheWeek, Tournament,
};

const DEFAULT_DESCRIPTION: &str = "No description provided.";

#[derive(Debug, Display)]
pub enum EntryError {
    #[display(fmt = "{}", _0)]
    Validation(String),
    Db(DbError),
}

impl StdError for EntryError {}

impl From<DbError> for EntryError {
    fn from(err: DbError) -> Self {
        EntryError::Db(err)
    }
}

fn invalid<T>(msg: impl Into<String>) -> Result<T, EntryError> {
    Err(EntryError::Validation(msg.into()))
}

/// Turns a unique violation into a validation message.
fn taken(err: DbError, what: String) -> EntryError {
    if err.is_unique_violation() {
        EntryError::Validation(format!("{} already exists", what))
    } else {
        EntryError::Db(err)
    }
}

fn required_name(field: &str, value: &str) -> Result<String, EntryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return invalid(format!("{} cannot be empty", field));
    }
    Ok(trimmed.to_owned())
}

#[derive(Clone, Debug, Deserialize)]
pub struct TournamentForm {
    pub short_description: String,
    pub long_description: Option<String>,
    pub start_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TeamForm {
    pub name: String,
    pub tournament_id: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlayerForm {
    pub name: String,
    pub team_id: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TeamOfTheWeekForm {
    pub tournament_id: i32,
    pub week_number: i32,
    pub weekend_date: NaiveDate,
    pub striker_id: i32,
    pub left_mid_id: i32,
    pub right_mid_id: i32,
    pub left_defence_id: i32,
    pub right_defence_id: i32,
    pub goal_keeper_id: i32,
}

pub fn validate_tournament(form: &TournamentForm) -> Result<NewTournament, EntryError> {
    let long_description = form
        .long_description
        .as_ref()
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION);
    Ok(NewTournament {
        short_description: required_name("short description", &form.short_description)?,
        long_description: long_description.to_owned(),
        start_date: form.start_date,
    })
}

pub fn validate_team(form: &TeamForm, tournaments: &[Tournament]) -> Result<NewTeam, EntryError> {
    let name = required_name("team name", &form.name)?;
    if let Some(id) = form.tournament_id {
        if !tournaments.iter().any(|t| t.id == id) {
            return invalid(format!("no tournament with id {}", id));
        }
    }
    Ok(NewTeam {
        name,
        tournament_id: form.tournament_id,
    })
}

/// A player is registered in the tournament of their team.
pub fn validate_player(form: &PlayerForm, team: Option<&Team>) -> Result<NewPlayer, EntryError> {
    let name = required_name("player name", &form.name)?;
    let team = match team {
        Some(team) => team,
        None => return invalid(format!("no team with id {}", form.team_id)),
    };
    let tournament_id = match team.tournament_id {
        Some(id) => id,
        None => return invalid(format!("team {} is not entered in a tournament", team.name)),
    };
    Ok(NewPlayer {
        name,
        team_id: team.id,
        tournament_id,
    })
}

/// Six different players of the tournament, for a week that has no pick yet.
pub fn validate_team_of_the_week(
    form: &TeamOfTheWeekForm,
    players: &[Player],
    picks: &[TeamOfTheWeek],
) -> Result<NewTeamOfTheWeek, EntryError> {
    if form.week_number < 1 {
        return invalid(format!("week number must be at least 1, got {}", form.week_number));
    }
    if picks.iter().any(|pick| pick.week_number == form.week_number) {
        return invalid(format!("week {} already has a team of the week", form.week_number));
    }

    let new = NewTeamOfTheWeek {
        week_number: form.week_number,
        weekend_date: form.weekend_date,
        striker_id: form.striker_id,
        left_mid_id: form.left_mid_id,
        right_mid_id: form.right_mid_id,
        left_defence_id: form.left_defence_id,
        right_defence_id: form.right_defence_id,
        goal_keeper_id: form.goal_keeper_id,
        tournament_id: form.tournament_id,
    };
    let picked = [
        new.striker_id,
        new.left_mid_id,
        new.right_mid_id,
        new.left_defence_id,
        new.right_defence_id,
        new.goal_keeper_id,
    ];
    for (i, &player_id) in picked.iter().enumerate() {
        if picked[..i].contains(&player_id) {
            return invalid(format!("player {} is picked twice", player_id));
        }
        if !players.iter().any(|p| p.id == player_id && p.tournament_id == form.tournament_id) {
            return invalid(format!("player {} is not in tournament {}", player_id, form.tournament_id));
        }
    }
    Ok(new)
}

pub fn create_tournament(db: &Db, form: &TournamentForm) -> Result<Tournament, EntryError> {
    let new = validate_tournament(form)?;
    let conn = db.get_conn()?;
    let tournament = conn.insert_tournament(&new)?;
    info!("created tournament {} ({:?})", tournament.id, tournament.short_description);
    Ok(tournament)
}

pub fn create_team(db: &Db, form: &TeamForm) -> Result<Team, EntryError> {
    let team = db.transaction(|conn| -> Result<_, EntryError> {
        let new = validate_team(form, &conn.get_tournaments()?)?;
        conn.insert_team(&new)
            .map_err(|err| taken(err, format!("team {:?}", new.name)))
    })?;
    info!("created team {} ({:?})", team.id, team.name);
    Ok(team)
}

pub fn create_player(db: &Db, form: &PlayerForm) -> Result<Player, EntryError> {
    let player = db.transaction(|conn| -> Result<_, EntryError> {
        let team = match conn.get_team(form.team_id) {
            Ok(team) => Some(team),
            Err(ref err) if err.is_not_found() => None,
            Err(err) => return Err(err.into()),
        };
        let new = validate_player(form, team.as_ref())?;
        Ok(conn.insert_player(&new)?)
    })?;
    info!("registered player {} for team {}", player.id, player.team_id);
    Ok(player)
}

pub fn create_team_of_the_week(db: &Db, form: &TeamOfTheWeekForm) -> Result<TeamOfTheWeek, EntryError> {
    let pick = db.transaction(|conn| -> Result<_, EntryError> {
        let players = conn.get_players(form.tournament_id)?;
        let picks = conn.get_team_of_the_week(form.tournament_id)?;
        let new = validate_team_of_the_week(form, &players, &picks)?;
        conn.insert_team_of_the_week(&new)
            .map_err(|err| taken(err, format!("team of the week for week {}", new.week_number)))
    })?;
    info!(
        "team of the week {} set for tournament {}",
        pick.week_number, pick.tournament_id
    );
    Ok(pick)
}
