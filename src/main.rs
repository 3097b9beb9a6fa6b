#[macro_use]
extern crate log;

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use chrono::Utc;
use league::standings::{self, StandingError, StandingsReport};
use league::{schedule, web};
use league::{Config, Db, DbError};
use structopt::StructOpt;

#[derive(StructOpt)]
struct Opt {
    #[structopt(flatten)]
    cmd: Command,

    #[structopt(long = "config")]
    config: PathBuf,
}

#[derive(StructOpt)]
enum Command {
    /// Serve the league pages and the admin API.
    #[structopt(name = "run")]
    Run,

    /// Apply pending database migrations.
    #[structopt(name = "migrate")]
    Migrate,

    /// Generate the fixtures of a tournament that has none yet.
    #[structopt(name = "schedule")]
    Schedule {
        #[structopt(long = "tournament")]
        tournament: i32,
    },

    /// Rebuild every standing of a tournament from week 1.
    #[structopt(name = "recompute")]
    Recompute {
        #[structopt(long = "tournament")]
        tournament: i32,
    },

    /// Rename a team, keeping its old name in the rename log.
    #[structopt(name = "rename")]
    Rename {
        #[structopt(long = "team")]
        team: i32,

        #[structopt(long = "name")]
        name: String,
    },
}

fn main() {
    env_logger::builder().default_format_timestamp(false).init();
    let opt = Opt::from_args();

    // read the config file
    let mut file = File::open(opt.config).expect("config file couldn't be opened");
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .expect("failed to read config");
    let config: Config = toml::from_slice(contents.as_slice()).expect("couldn't parse config");

    // connect to the db
    let db = Db::connect(&config.db).expect("couldn't connect to the db");

    match opt.cmd {
        Command::Run => web::run(config, db),
        Command::Migrate => {
            db.migrate().expect("failed to migrate");
        }
        Command::Schedule { tournament } => {
            let inserted = db
                .transaction(|conn| -> Result<usize, DbError> {
                    if !conn.get_matches(tournament)?.is_empty() {
                        warn!("tournament {} already has fixtures, not scheduling", tournament);
                        return Ok(0);
                    }
                    let team_ids: Vec<i32> = conn
                        .get_teams(tournament)?
                        .into_iter()
                        .map(|team| team.id)
                        .collect();
                    match schedule::generate(&config.league, tournament, &team_ids) {
                        Ok(records) => conn.insert_matches(&records),
                        Err(err) => {
                            error!("can't schedule tournament {}: {}", tournament, err);
                            Ok(0)
                        }
                    }
                })
                .expect("failed to schedule");
            info!("inserted {} matches", inserted);
        }
        Command::Recompute { tournament } => {
            let report = db
                .transaction(|conn| -> Result<StandingsReport, StandingError> {
                    standings::recompute_tournament(conn, tournament)
                })
                .expect("failed to recompute standings");
            for skipped in &report.skipped {
                warn!(
                    "team {} has no standing for match {} (week {}): an earlier match is undecided",
                    skipped.team_id, skipped.match_id, skipped.week
                );
            }
            info!(
                "replayed {} matches for tournament {}, {} teams incomplete",
                report.replayed,
                tournament,
                report.skipped_teams().len()
            );
        }
        Command::Rename { team, name } => {
            let conn = db.get_conn().expect("couldn't get a connection");
            let rename = conn
                .rename_team(team, &name, Utc::now().naive_utc())
                .expect("failed to rename team");
            info!("renamed {:?} to {:?}", rename.old_name, rename.new_name);
        }
    }
}
