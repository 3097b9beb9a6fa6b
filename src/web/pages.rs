use chrono::Local;
use serde::Serialize;
use warp::http::StatusCode;
use warp::path;
use warp::{Filter, Rejection, Reply};

use crate::config::Config;
use crate::controllers::{
    self, fixtures, history, players, results, stats, table, team_of_the_week, Directory,
};
use crate::db::{Db, DbConn};
use crate::models::{Player, Team, Tournament};

use super::utils::{reject, WebError};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub tournament: Option<i32>,
    pub week: Option<i32>,
    pub team_id: Option<i32>,
    pub team: Option<String>,
}

/// Every page carries the tournament it was built for.
#[derive(Serialize)]
struct Page<T> {
    tournament: Tournament,
    #[serde(flatten)]
    view: T,
}

/// The selected tournament with its teams and players.
struct Season {
    tournament: Tournament,
    teams: Vec<Team>,
    players: Vec<Player>,
}

impl Season {
    fn load(conn: &DbConn, requested: Option<i32>) -> Result<Season, WebError> {
        let tournaments = conn.get_tournaments()?;
        let tournament = controllers::pick_tournament(&tournaments, requested)
            .cloned()
            .ok_or(WebError::NoTournament)?;
        let teams = conn.get_teams(tournament.id)?;
        let players = conn.get_players(tournament.id)?;
        Ok(Season {
            tournament,
            teams,
            players,
        })
    }

    fn directory(&self) -> Directory<'_> {
        Directory::new(&self.teams, &self.players)
    }

    fn page<T>(&self, view: T) -> Page<T> {
        Page {
            tournament: self.tournament.clone(),
            view,
        }
    }
}

fn respond<T: Serialize>(result: Result<T, WebError>) -> Result<impl Reply, Rejection> {
    result.map(|body| warp::reply::json(&body)).map_err(reject)
}

fn fixtures_page(db: &Db, config: &Config, query: &PageQuery) -> Result<impl Serialize, WebError> {
    let conn = db.get_conn()?;
    let season = Season::load(&conn, query.tournament)?;
    let matches = conn.get_matches(season.tournament.id)?;
    let today = Local::now().date_naive();
    let view = fixtures::view(&matches, &season.directory(), &config.league.venue, today, query.week);
    Ok(season.page(view))
}

fn results_page(db: &Db, query: &PageQuery) -> Result<impl Serialize, WebError> {
    let conn = db.get_conn()?;
    let season = Season::load(&conn, query.tournament)?;
    let matches = conn.get_matches(season.tournament.id)?;
    let goals = conn.get_goals(season.tournament.id)?;
    let cards = conn.get_cards(season.tournament.id)?;
    let view = results::view(&matches, &goals, &cards, &season.directory(), query.week);
    Ok(season.page(view))
}

fn table_page(db: &Db, query: &PageQuery) -> Result<impl Serialize, WebError> {
    let conn = db.get_conn()?;
    let season = Season::load(&conn, query.tournament)?;
    let standings = conn.get_standings(season.tournament.id)?;
    let view = table::view(&standings, &season.directory(), query.week);
    Ok(season.page(view))
}

fn stats_page(db: &Db, query: &PageQuery) -> Result<impl Serialize, WebError> {
    let conn = db.get_conn()?;
    let season = Season::load(&conn, query.tournament)?;
    let matches = conn.get_matches(season.tournament.id)?;
    let goals = conn.get_goals(season.tournament.id)?;
    let cards = conn.get_cards(season.tournament.id)?;
    let view = stats::view(&matches, &goals, &cards, &season.directory());
    Ok(season.page(view))
}

fn players_page(db: &Db, query: &PageQuery) -> Result<impl Serialize, WebError> {
    let conn = db.get_conn()?;
    let season = Season::load(&conn, query.tournament)?;
    let view = players::view(&season.teams, &season.players, query.team_id);
    Ok(season.page(view))
}

fn profile_page(db: &Db, player_id: i32, query: &PageQuery) -> Result<impl Serialize, WebError> {
    let conn = db.get_conn()?;
    let season = Season::load(&conn, query.tournament)?;
    let matches = conn.get_matches(season.tournament.id)?;
    let goals = conn.get_goals(season.tournament.id)?;
    let cards = conn.get_cards(season.tournament.id)?;
    let view = players::profile(player_id, &season.directory(), &matches, &goals, &cards)
        .ok_or_else(|| WebError::NotFound(format!("player {}", player_id)))?;
    Ok(season.page(view))
}

fn history_page(db: &Db, query: &PageQuery) -> Result<impl Serialize, WebError> {
    let conn = db.get_conn()?;
    let season = Season::load(&conn, query.tournament)?;
    let name = query
        .team
        .as_ref()
        .ok_or_else(|| WebError::NotFound("team".to_owned()))?;
    let renames = conn.get_renames()?;
    let team = history::resolve_team_name(name, &season.teams, &renames)
        .and_then(|id| season.teams.iter().find(|team| team.id == id))
        .ok_or_else(|| WebError::NotFound(format!("team {:?}", name)))?;
    let standings = conn.get_standings(season.tournament.id)?;
    let view = history::view(team, &renames, &standings);
    Ok(season.page(view))
}

fn team_of_the_week_page(db: &Db, query: &PageQuery) -> Result<impl Serialize, WebError> {
    let conn = db.get_conn()?;
    let season = Season::load(&conn, query.tournament)?;
    let picks = conn.get_team_of_the_week(season.tournament.id)?;
    let view = team_of_the_week::view(&picks, &season.directory(), query.week);
    Ok(season.page(view))
}

fn read_page() -> impl Filter<Extract = (Db, PageQuery), Error = Rejection> + Clone {
    warp::ext::get::<Db>().and(warp::query::<PageQuery>())
}

pub fn fixtures() -> Resp!() {
    warp::ext::get::<Config>()
        .and(read_page())
        .and_then(|config: Config, db: Db, query: PageQuery| {
            respond(fixtures_page(&db, &config, &query))
        })
        .boxed()
}

pub fn results() -> Resp!() {
    read_page()
        .and_then(|db: Db, query: PageQuery| respond(results_page(&db, &query)))
        .boxed()
}

pub fn table() -> Resp!() {
    read_page()
        .and_then(|db: Db, query: PageQuery| respond(table_page(&db, &query)))
        .boxed()
}

pub fn stats() -> Resp!() {
    read_page()
        .and_then(|db: Db, query: PageQuery| respond(stats_page(&db, &query)))
        .boxed()
}

pub fn players() -> Resp!() {
    read_page()
        .and_then(|db: Db, query: PageQuery| respond(players_page(&db, &query)))
        .boxed()
}

pub fn history() -> Resp!() {
    read_page()
        .and_then(|db: Db, query: PageQuery| respond(history_page(&db, &query)))
        .boxed()
}

pub fn team_of_the_week() -> Resp!() {
    read_page()
        .and_then(|db: Db, query: PageQuery| respond(team_of_the_week_page(&db, &query)))
        .boxed()
}

fn player_path() -> impl Filter<Extract = (i32,), Error = Rejection> + Clone {
    path!("player" / i32).and(warp::path::end())
}

/// `GET /player/<id>`
pub fn player_profile() -> Resp!() {
    player_path()
        .and(warp::get2())
        .and(read_page())
        .and_then(|player_id: i32, db: Db, query: PageQuery| {
            respond(profile_page(&db, player_id, &query))
        })
        .boxed()
}

pub fn healthz() -> Resp!() {
    warp::ext::get::<Db>()
        .map(|db: Db| {
            let healthy = db.get_conn().and_then(|conn| conn.health_check());
            match healthy {
                Ok(()) => warp::reply::with_status("OK", StatusCode::OK),
                Err(err) => {
                    error!("health check failed: {}", err);
                    warp::reply::with_status("unhealthy", StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        })
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_path_takes_a_numeric_id() {
        assert!(warp::test::request().path("/player/7").matches(&player_path()));
        assert!(!warp::test::request().path("/player/seven").matches(&player_path()));
        assert!(!warp::test::request().path("/player/7/goals").matches(&player_path()));
    }

    #[test]
    fn views_are_sent_as_json() {
        let reply = respond(Ok(vec![1, 2, 3])).unwrap().into_response();
        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(reply.headers()["content-type"], "application/json");
    }

    #[test]
    fn failures_become_rejections() {
        let result = respond::<()>(Err(WebError::NoTournament));
        assert!(result.is_err());
    }
}
