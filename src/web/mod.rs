#[macro_use]
mod utils;

mod admin;
mod pages;

use warp::Filter;

use crate::config::Config;
use crate::db::Db;

use self::utils::set;

pub use self::utils::WebError;

/// Serves the league until the process exits.
pub fn run(config: Config, db: Db) {
    let bind_addr = config.bind_addr;
    let ext = set(db).and(set(config));

    let routes = route_any!(
        GET() => pages::fixtures(),
        GET("fixtures") => pages::fixtures(),
        GET("results") => pages::results(),
        GET("table") => pages::table(),
        GET("stats") => pages::stats(),
        GET("players") => pages::players(),
        GET("history") => pages::history(),
        GET("team-of-the-week") => pages::team_of_the_week(),
        GET("healthz") => pages::healthz(),
        POST("admin" / "matches") => admin::save_match(),
        POST("admin" / "tournaments") => admin::create_tournament(),
        POST("admin" / "teams") => admin::create_team(),
        POST("admin" / "players") => admin::create_player(),
        POST("admin" / "team-of-the-week") => admin::create_team_of_the_week(),
    )
    .or(pages::player_profile());

    info!("listening on {}", bind_addr);
    warp::serve(ext.and(routes).recover(utils::recover)).run(bind_addr)
}
