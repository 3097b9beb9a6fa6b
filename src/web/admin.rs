use serde::de::DeserializeOwned;
use warp::http::{HeaderMap, StatusCode};
use warp::{Filter, Rejection};

use crate::config::Config;
use crate::controllers::entries::{
    self, EntryError, PlayerForm, TeamForm, TeamOfTheWeekForm, TournamentForm,
};
use crate::controllers::matches::{self, MatchForm};
use crate::db::Db;

use super::utils::{reject, WebError};

const ADMIN_KEY_HEADER: &str = "x-admin-key";

fn authorized(headers: &HeaderMap, config: &Config) -> bool {
    headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |key| key == config.secret_key)
}

/// The pool and the JSON body of a request that carries the admin key.
fn admin_body<T>() -> impl Filter<Extract = (Db, T), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send + 'static,
{
    warp::ext::get::<Db>()
        .and(warp::ext::get::<Config>())
        .and(warp::header::headers_cloned())
        .and_then(|db: Db, config: Config, headers: HeaderMap| -> Result<Db, Rejection> {
            if !authorized(&headers, &config) {
                warn!("rejected admin request with a bad admin key");
                return Err(reject(WebError::Unauthorized));
            }
            Ok(db)
        })
        .and(warp::body::json())
}

fn entry_error(err: EntryError) -> Rejection {
    reject(WebError::Entry(err))
}

/// `POST /admin/matches`: create or overwrite a match with its goals and
/// cards.
pub fn save_match() -> Resp!() {
    admin_body::<MatchForm>()
        .and_then(|db: Db, form: MatchForm| -> Result<_, Rejection> {
            let saved = matches::save_match(&db, &form)
                .map_err(WebError::Match)
                .map_err(reject)?;
            Ok(warp::reply::json(&saved))
        })
        .boxed()
}

pub fn create_tournament() -> Resp!() {
    admin_body::<TournamentForm>()
        .and_then(|db: Db, form: TournamentForm| -> Result<_, Rejection> {
            let tournament = entries::create_tournament(&db, &form).map_err(entry_error)?;
            Ok(warp::reply::with_status(warp::reply::json(&tournament), StatusCode::CREATED))
        })
        .boxed()
}

pub fn create_team() -> Resp!() {
    admin_body::<TeamForm>()
        .and_then(|db: Db, form: TeamForm| -> Result<_, Rejection> {
            let team = entries::create_team(&db, &form).map_err(entry_error)?;
            Ok(warp::reply::with_status(warp::reply::json(&team), StatusCode::CREATED))
        })
        .boxed()
}

pub fn create_player() -> Resp!() {
    admin_body::<PlayerForm>()
        .and_then(|db: Db, form: PlayerForm| -> Result<_, Rejection> {
            let player = entries::create_player(&db, &form).map_err(entry_error)?;
            Ok(warp::reply::with_status(warp::reply::json(&player), StatusCode::CREATED))
        })
        .boxed()
}

/// `POST /admin/team-of-the-week`
pub fn create_team_of_the_week() -> Resp!() {
    admin_body::<TeamOfTheWeekForm>()
        .and_then(|db: Db, form: TeamOfTheWeekForm| -> Result<_, Rejection> {
            let pick = entries::create_team_of_the_week(&db, &form).map_err(entry_error)?;
            Ok(warp::reply::with_status(warp::reply::json(&pick), StatusCode::CREATED))
        })
        .boxed()
}
