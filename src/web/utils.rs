use std::error::Error as StdError;

use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::controllers::entries::EntryError;
use crate::controllers::matches::MatchError;
use crate::db::DbError;

macro_rules! Resp {
    () => { warp::filters::BoxedFilter<(impl warp::Reply,)> };
}

macro_rules! route_any {
    ($hm:ident $hp:tt => $h:expr $(, $tm:ident $tp:tt => $t:expr)* $(,)*) => {{
        use ::warp::Filter;
        route_any!(@internal @path $hm $hp).and($h)
            $(.or(route_any!(@internal @path $tm $tp).and($t)))*
    }};

    (@internal @method GET) => {{ warp::get2() }};
    (@internal @method POST) => {{ warp::post2() }};
    (@internal @path $m:ident ()) => {{
        warp::path::end().and(route_any!(@internal @method $m))
    }};
    (@internal @path $m:ident $p:tt) => {{
        use warp::path;
        path! $p
            .and(warp::path::end())
            .and(route_any!(@internal @method $m))
    }};
}

pub fn set<T: 'static + Clone + Send + Sync>(
    t: T,
) -> impl Clone + Filter<Extract = (), Error = Rejection> {
    warp::any()
        .map(move || warp::ext::set(t.clone()))
        .and_then(|()| -> Result<(), Rejection> { Ok(()) })
        .untuple_one()
}

#[derive(Debug, Display)]
pub enum WebError {
    Db(DbError),
    Match(MatchError),
    Entry(EntryError),

    #[display(fmt = "no tournament has been set up")]
    NoTournament,

    #[display(fmt = "{} not found", _0)]
    NotFound(String),

    #[display(fmt = "missing or wrong admin key")]
    Unauthorized,
}

impl StdError for WebError {}

impl From<DbError> for WebError {
    fn from(err: DbError) -> Self {
        if err.is_not_found() {
            WebError::NotFound("record".to_owned())
        } else {
            WebError::Db(err)
        }
    }
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Match(MatchError::Validation(_)) | WebError::Entry(EntryError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            WebError::Unauthorized => StatusCode::UNAUTHORIZED,
            WebError::NoTournament | WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Db(_) | WebError::Match(MatchError::Db(_)) | WebError::Entry(EntryError::Db(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub fn reject(err: WebError) -> Rejection {
    warp::reject::custom(err)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Turns our own rejections into `{"error": ...}` bodies; anything else is
/// left to warp.
pub fn recover(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(err) = err.find_cause::<WebError>() {
        let status = err.status();
        if status.is_server_error() {
            error!("request failed: {}", err);
        } else {
            debug!("request rejected: {}", err);
        }
        let body = ErrorBody {
            error: err.to_string(),
        };
        return Ok(warp::reply::with_status(warp::reply::json(&body), status));
    }
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        let validation = WebError::Match(MatchError::Validation("bad week".to_owned()));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.to_string(), "bad week");
        assert_eq!(WebError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(WebError::NotFound("player 4".to_owned()).status(), StatusCode::NOT_FOUND);
        assert_eq!(WebError::NoTournament.status(), StatusCode::NOT_FOUND);

        let taken = WebError::Entry(EntryError::Validation("team \"BKFC\" already exists".to_owned()));
        assert_eq!(taken.status(), StatusCode::BAD_REQUEST);
        let broken = WebError::Entry(EntryError::Db(DbError::InsertTeam(diesel::result::Error::RollbackTransaction)));
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_rows_are_not_found() {
        let err = WebError::from(DbError::GetMatches(diesel::result::Error::NotFound));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = WebError::from(DbError::GetMatches(diesel::result::Error::RollbackTransaction));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
