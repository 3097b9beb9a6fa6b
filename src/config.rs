use std::net::SocketAddr;

use chrono::NaiveDate;

/// Fixed facts about how a league season is laid out.
///
/// Built once from the config file and passed to whatever needs it; nothing
/// reads these values from globals.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LeagueConfig {
    /// Date of week 1.
    pub start_date: NaiveDate,
    /// Kick-off slots of a match day, in order.
    pub match_times: Vec<String>,
    pub venue: String,
    /// Match days that are skipped; the schedule moves on by a week.
    #[serde(default)]
    pub skip_dates: Vec<NaiveDate>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub db: String,
    pub bind_addr: SocketAddr,
    pub secret_key: String,
    pub league: LeagueConfig,
}
