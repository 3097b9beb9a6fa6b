use std::error::Error as StdError;
use std::sync::Arc;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::DatabaseErrorKind;
use diesel::result::Error::{self as DieselError, DatabaseError, RollbackTransaction};
use diesel_migrations::RunMigrationsError;

use crate::models::{
    Card, Goal, Match, MatchRecord, NewCard, NewGoal, NewPlayer, NewTeam, NewTeamOfTheWeek,
    NewTeamRename, NewTeamStanding, NewTournament, Player, StandingChanges, Team, TeamOfTheWeek,
    TeamRename, TeamStanding, Tournament,
};
use crate::standings::{StandingError, StandingStore};

embed_migrations!("migrations");

macro_rules! decided {
    () => {{
        use crate::schema::matches::dsl;
        dsl::is_played.eq(true).or(dsl::is_walkover.eq(true))
    }};
}

macro_rules! schedule_order {
    () => {{
        use crate::schema::matches::dsl;
        (
            dsl::week_number.asc(),
            dsl::match_date.asc(),
            dsl::match_time.asc(),
            dsl::id.asc(),
        )
    }};
}

#[derive(Clone)]
pub struct Db(Arc<Pool<ConnectionManager<PgConnection>>>);

pub struct DbConn(PooledConnection<ConnectionManager<PgConnection>>);

#[derive(Debug, Display)]
pub enum DbError {
    Pool(r2d2::Error),
    GetConn(r2d2::Error),
    Migration(RunMigrationsError),
    Transaction(DieselError),
    Health(DieselError),
    GetTournaments(DieselError),
    GetTeams(DieselError),
    GetPlayers(DieselError),
    GetMatches(DieselError),
    GetGoals(DieselError),
    GetCards(DieselError),
    GetStandings(DieselError),
    GetRenames(DieselError),
    GetTeamOfTheWeek(DieselError),
    InsertTournament(DieselError),
    InsertTeam(DieselError),
    InsertPlayer(DieselError),
    InsertTeamOfTheWeek(DieselError),
    InsertMatch(DieselError),
    UpdateMatch(DieselError),
    ReplaceEvents(DieselError),
    RenameTeam(DieselError),
    InsertStanding(DieselError),
    UpdateStanding(DieselError),
    DeleteStanding(DieselError),
}

impl StdError for DbError {}

impl DbError {
    /// Whether the failure was a lookup that matched no row.
    pub fn is_not_found(&self) -> bool {
        match self {
            DbError::GetTournaments(DieselError::NotFound)
            | DbError::GetTeams(DieselError::NotFound)
            | DbError::GetPlayers(DieselError::NotFound)
            | DbError::GetMatches(DieselError::NotFound) => true,
            _ => false,
        }
    }

    /// Whether an insert clashed with a unique constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::InsertTournament(DatabaseError(DatabaseErrorKind::UniqueViolation, _))
            | DbError::InsertTeam(DatabaseError(DatabaseErrorKind::UniqueViolation, _))
            | DbError::InsertPlayer(DatabaseError(DatabaseErrorKind::UniqueViolation, _))
            | DbError::InsertTeamOfTheWeek(DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => true,
            _ => false,
        }
    }
}

impl Db {
    pub fn connect(database_url: impl AsRef<str>) -> Result<Self, DbError> {
        let database_url = database_url.as_ref();
        let manager = ConnectionManager::new(database_url);
        let pool = Pool::new(manager).map_err(DbError::Pool)?;
        Ok(Db(Arc::new(pool)))
    }

    pub fn get_conn(&self) -> Result<DbConn, DbError> {
        self.0.get().map(DbConn).map_err(DbError::GetConn)
    }

    pub fn migrate(&self) -> Result<(), DbError> {
        let conn = self.get_conn()?;
        embedded_migrations::run(&conn.0).map_err(DbError::Migration)
    }

    /// Runs `f` inside a transaction on a fresh pooled connection.
    pub fn transaction<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&DbConn) -> Result<R, E>,
        E: From<DbError>,
    {
        let conn = self.get_conn()?;
        conn.transaction(f)
    }
}

impl DbConn {
    /// Runs `f` inside a transaction on this connection. Any error returned
    /// by `f` rolls the transaction back and is handed back unchanged.
    pub fn transaction<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&DbConn) -> Result<R, E>,
        E: From<DbError>,
    {
        let mut err = None;
        let result = self.0.transaction(|| match f(self) {
            Ok(v) => Ok(v),
            Err(e) => {
                err = Some(e);
                Err(RollbackTransaction)
            }
        });
        match result {
            Ok(v) => Ok(v),
            Err(diesel_err) => Err(err.unwrap_or_else(|| DbError::Transaction(diesel_err).into())),
        }
    }

    pub fn health_check(&self) -> Result<(), DbError> {
        diesel::sql_query("SELECT 1")
            .execute(&self.0)
            .map(|_| ())
            .map_err(DbError::Health)
    }

    pub fn get_tournaments(&self) -> Result<Vec<Tournament>, DbError> {
        use crate::schema::tournaments::dsl::{id, tournaments};
        tournaments
            .order(id.asc())
            .load(&self.0)
            .map_err(DbError::GetTournaments)
    }

    pub fn get_teams(&self, tournament: i32) -> Result<Vec<Team>, DbError> {
        use crate::schema::teams::dsl::{name, teams, tournament_id};
        teams
            .filter(tournament_id.eq(tournament))
            .order(name.asc())
            .load(&self.0)
            .map_err(DbError::GetTeams)
    }

    pub fn get_team(&self, team: i32) -> Result<Team, DbError> {
        use crate::schema::teams::dsl::teams;
        teams.find(team).first(&self.0).map_err(DbError::GetTeams)
    }

    pub fn get_players(&self, tournament: i32) -> Result<Vec<Player>, DbError> {
        use crate::schema::players::dsl::{name, players, tournament_id};
        players
            .filter(tournament_id.eq(tournament))
            .order(name.asc())
            .load(&self.0)
            .map_err(DbError::GetPlayers)
    }

    pub fn get_team_players(&self, team_ids: &[i32]) -> Result<Vec<Player>, DbError> {
        use crate::schema::players::dsl::{name, players, team_id};
        players
            .filter(team_id.eq_any(team_ids.to_vec()))
            .order(name.asc())
            .load(&self.0)
            .map_err(DbError::GetPlayers)
    }

    pub fn get_matches(&self, tournament: i32) -> Result<Vec<Match>, DbError> {
        use crate::schema::matches::dsl::{matches, tournament_id};
        matches
            .filter(tournament_id.eq(tournament))
            .order(schedule_order!())
            .load(&self.0)
            .map_err(DbError::GetMatches)
    }

    pub fn get_match(&self, match_id: i32) -> Result<Match, DbError> {
        use crate::schema::matches::dsl::matches;
        matches
            .find(match_id)
            .first(&self.0)
            .map_err(DbError::GetMatches)
    }

    pub fn get_goals(&self, tournament: i32) -> Result<Vec<Goal>, DbError> {
        use crate::schema::goals::dsl::{goals, id, tournament_id};
        goals
            .filter(tournament_id.eq(tournament))
            .order(id.asc())
            .load(&self.0)
            .map_err(DbError::GetGoals)
    }

    pub fn get_cards(&self, tournament: i32) -> Result<Vec<Card>, DbError> {
        use crate::schema::cards::dsl::{cards, id, tournament_id};
        cards
            .filter(tournament_id.eq(tournament))
            .order(id.asc())
            .load(&self.0)
            .map_err(DbError::GetCards)
    }

    pub fn get_standings(&self, tournament: i32) -> Result<Vec<TeamStanding>, DbError> {
        use crate::schema::team_standings::dsl::{id, matches_played, team_standings, tournament_id};
        team_standings
            .filter(tournament_id.eq(tournament))
            .order((matches_played.asc(), id.asc()))
            .load(&self.0)
            .map_err(DbError::GetStandings)
    }

    pub fn get_renames(&self) -> Result<Vec<TeamRename>, DbError> {
        use crate::schema::team_renames::dsl::{id, team_renames};
        team_renames
            .order(id.asc())
            .load(&self.0)
            .map_err(DbError::GetRenames)
    }

    pub fn get_team_of_the_week(&self, tournament: i32) -> Result<Vec<TeamOfTheWeek>, DbError> {
        use crate::schema::team_of_the_week::dsl::{team_of_the_week, tournament_id, week_number};
        team_of_the_week
            .filter(tournament_id.eq(tournament))
            .order(week_number.asc())
            .load(&self.0)
            .map_err(DbError::GetTeamOfTheWeek)
    }

    pub fn insert_tournament(&self, new: &NewTournament) -> Result<Tournament, DbError> {
        use crate::schema::tournaments;
        diesel::insert_into(tournaments::table)
            .values(new)
            .get_result(&self.0)
            .map_err(DbError::InsertTournament)
    }

    pub fn insert_team(&self, new: &NewTeam) -> Result<Team, DbError> {
        use crate::schema::teams;
        diesel::insert_into(teams::table)
            .values(new)
            .get_result(&self.0)
            .map_err(DbError::InsertTeam)
    }

    pub fn insert_player(&self, new: &NewPlayer) -> Result<Player, DbError> {
        use crate::schema::players;
        diesel::insert_into(players::table)
            .values(new)
            .get_result(&self.0)
            .map_err(DbError::InsertPlayer)
    }

    pub fn insert_team_of_the_week(&self, new: &NewTeamOfTheWeek) -> Result<TeamOfTheWeek, DbError> {
        use crate::schema::team_of_the_week;
        diesel::insert_into(team_of_the_week::table)
            .values(new)
            .get_result(&self.0)
            .map_err(DbError::InsertTeamOfTheWeek)
    }

    pub fn insert_match(&self, record: &MatchRecord) -> Result<Match, DbError> {
        use crate::schema::matches;
        diesel::insert_into(matches::table)
            .values(record)
            .get_result(&self.0)
            .map_err(DbError::InsertMatch)
    }

    pub fn insert_matches(&self, records: &[MatchRecord]) -> Result<usize, DbError> {
        use crate::schema::matches;
        diesel::insert_into(matches::table)
            .values(records)
            .execute(&self.0)
            .map_err(DbError::InsertMatch)
    }

    pub fn update_match(&self, match_id: i32, record: &MatchRecord) -> Result<Match, DbError> {
        use crate::schema::matches::dsl::matches;
        diesel::update(matches.find(match_id))
            .set(record)
            .get_result(&self.0)
            .map_err(DbError::UpdateMatch)
    }

    /// Replaces every goal and card of a match.
    pub fn replace_match_events(
        &self,
        match_id: i32,
        new_goals: &[NewGoal],
        new_cards: &[NewCard],
    ) -> Result<(), DbError> {
        use crate::schema::{cards, goals};
        diesel::delete(goals::table.filter(goals::match_id.eq(match_id)))
            .execute(&self.0)
            .map_err(DbError::ReplaceEvents)?;
        diesel::delete(cards::table.filter(cards::match_id.eq(match_id)))
            .execute(&self.0)
            .map_err(DbError::ReplaceEvents)?;
        if !new_goals.is_empty() {
            diesel::insert_into(goals::table)
                .values(new_goals)
                .execute(&self.0)
                .map_err(DbError::ReplaceEvents)?;
        }
        if !new_cards.is_empty() {
            diesel::insert_into(cards::table)
                .values(new_cards)
                .execute(&self.0)
                .map_err(DbError::ReplaceEvents)?;
        }
        Ok(())
    }

    /// Renames a team and appends the change to the rename log.
    pub fn rename_team(&self, team: i32, new_name: &str, now: NaiveDateTime) -> Result<TeamRename, DbError> {
        use crate::schema::team_renames;
        use crate::schema::teams::dsl::{name, teams};
        self.transaction(|conn| {
            let current = conn.get_team(team)?;
            diesel::update(teams.find(team))
                .set(name.eq(new_name))
                .execute(&conn.0)
                .map_err(DbError::RenameTeam)?;
            diesel::insert_into(team_renames::table)
                .values(&NewTeamRename {
                    team_id: team,
                    old_name: current.name,
                    new_name: new_name.to_owned(),
                    renamed_at: now,
                })
                .get_result(&conn.0)
                .map_err(DbError::RenameTeam)
        })
    }
}

fn duplicate_or(err: DieselError, team_id: i32, matches_played: i32, wrap: fn(DieselError) -> DbError) -> StandingError {
    match err {
        DatabaseError(DatabaseErrorKind::UniqueViolation, _) => StandingError::DuplicateStandingRow {
            team_id,
            matches_played,
        },
        err => StandingError::Store(wrap(err)),
    }
}

impl StandingStore for DbConn {
    fn find_standing(&self, match_id: i32, team_id: i32) -> Result<Option<TeamStanding>, StandingError> {
        use crate::schema::team_standings::dsl;
        dsl::team_standings
            .filter(dsl::match_id.eq(match_id).and(dsl::team_id.eq(team_id)))
            .first(&self.0)
            .optional()
            .map_err(DbError::GetStandings)
            .map_err(StandingError::Store)
    }

    fn find_standings_at(
        &self,
        team_id: i32,
        tournament_id: i32,
        matches_played: i32,
    ) -> Result<Vec<TeamStanding>, StandingError> {
        use crate::schema::team_standings::dsl;
        dsl::team_standings
            .filter(dsl::team_id.eq(team_id))
            .filter(dsl::tournament_id.eq(tournament_id))
            .filter(dsl::matches_played.eq(matches_played))
            .order(dsl::id.desc())
            .load(&self.0)
            .map_err(DbError::GetStandings)
            .map_err(StandingError::Store)
    }

    fn insert_standing(&self, row: &NewTeamStanding) -> Result<TeamStanding, StandingError> {
        use crate::schema::team_standings;
        diesel::insert_into(team_standings::table)
            .values(row)
            .get_result(&self.0)
            .map_err(|err| duplicate_or(err, row.team_id, row.matches_played, DbError::InsertStanding))
    }

    fn update_standing(&self, existing: &TeamStanding, changes: &StandingChanges) -> Result<(), StandingError> {
        use crate::schema::team_standings::dsl::team_standings;
        diesel::update(team_standings.find(existing.id))
            .set(changes)
            .execute(&self.0)
            .map(|_| ())
            .map_err(|err| duplicate_or(err, existing.team_id, changes.matches_played, DbError::UpdateStanding))
    }

    fn delete_match_standings(&self, match_id: i32, keep_team_ids: &[i32]) -> Result<usize, StandingError> {
        use crate::schema::team_standings::dsl;
        diesel::delete(
            dsl::team_standings
                .filter(dsl::match_id.eq(match_id))
                .filter(dsl::team_id.ne_all(keep_team_ids.to_vec())),
        )
        .execute(&self.0)
        .map_err(DbError::DeleteStanding)
        .map_err(StandingError::Store)
    }

    fn delete_team_standings_from(
        &self,
        team_id: i32,
        tournament_id: i32,
        matches_played: i32,
    ) -> Result<usize, StandingError> {
        use crate::schema::team_standings::dsl;
        diesel::delete(
            dsl::team_standings
                .filter(dsl::team_id.eq(team_id))
                .filter(dsl::tournament_id.eq(tournament_id))
                .filter(dsl::matches_played.ge(matches_played)),
        )
        .execute(&self.0)
        .map_err(DbError::DeleteStanding)
        .map_err(StandingError::Store)
    }

    fn delete_tournament_standings(&self, tournament_id: i32) -> Result<usize, StandingError> {
        use crate::schema::team_standings::dsl;
        diesel::delete(dsl::team_standings.filter(dsl::tournament_id.eq(tournament_id)))
            .execute(&self.0)
            .map_err(DbError::DeleteStanding)
            .map_err(StandingError::Store)
    }

    fn decided_matches_for_team(&self, team_id: i32, start_week: i32) -> Result<Vec<Match>, StandingError> {
        use crate::schema::matches::dsl;
        dsl::matches
            .filter(dsl::home_team_id.eq(team_id).or(dsl::away_team_id.eq(team_id)))
            .filter(dsl::week_number.ge(start_week))
            .filter(decided!())
            .order(schedule_order!())
            .load(&self.0)
            .map_err(DbError::GetMatches)
            .map_err(StandingError::Store)
    }

    fn decided_matches_for_tournament(&self, tournament_id: i32) -> Result<Vec<Match>, StandingError> {
        use crate::schema::matches::dsl;
        dsl::matches
            .filter(dsl::tournament_id.eq(tournament_id))
            .filter(decided!())
            .order(schedule_order!())
            .load(&self.0)
            .map_err(DbError::GetMatches)
            .map_err(StandingError::Store)
    }

    fn team_name(&self, team_id: i32) -> Result<String, StandingError> {
        use crate::schema::teams::dsl::{name, teams};
        teams
            .find(team_id)
            .select(name)
            .first(&self.0)
            .map_err(DbError::GetTeams)
            .map_err(StandingError::Store)
    }
}
