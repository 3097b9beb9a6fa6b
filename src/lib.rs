#[macro_use]
extern crate derive_more;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod config;
pub mod controllers;
pub mod db;
pub mod models;
pub mod schedule;
pub mod schema;
pub mod standings;
pub mod web;

pub use crate::config::{Config, LeagueConfig};
pub use crate::db::{Db, DbConn, DbError};
