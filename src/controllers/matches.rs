use std::error::Error as StdError;

use chrono::NaiveDate;

use crate::db::{Db, DbError};
use crate::models::{CardType, Match, MatchRecord, NewCard, NewGoal, Player, Team};
use crate::standings::{self, StandingError, StandingStore, StandingsReport};

#[derive(Debug, Display)]
pub enum MatchError {
    #[display(fmt = "{}", _0)]
    Validation(String),
    Db(DbError),
}

impl StdError for MatchError {}

impl From<DbError> for MatchError {
    fn from(err: DbError) -> Self {
        MatchError::Db(err)
    }
}

fn invalid<T>(msg: impl Into<String>) -> Result<T, MatchError> {
    Err(MatchError::Validation(msg.into()))
}

fn one() -> i32 {
    1
}

#[derive(Clone, Debug, Deserialize)]
pub struct GoalForm {
    pub player_id: i32,
    #[serde(default)]
    pub own_goal: bool,
    #[serde(default = "one")]
    pub goals: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CardForm {
    pub player_id: i32,
    pub card_type: CardType,
}

/// A match as submitted by an administrator. Without an `id` a new match
/// is created; with one, that match is overwritten.
#[derive(Clone, Debug, Deserialize)]
pub struct MatchForm {
    pub id: Option<i32>,
    pub tournament_id: i32,
    pub week_number: i32,
    pub match_date: NaiveDate,
    pub match_time: Option<String>,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    #[serde(default)]
    pub is_played: bool,
    #[serde(default)]
    pub is_walkover: bool,
    pub walkover_winner_id: Option<i32>,
    pub mom_player_id: Option<i32>,
    #[serde(default)]
    pub goals: Vec<GoalForm>,
    #[serde(default)]
    pub cards: Vec<CardForm>,
}

/// A form that passed validation, ready to be written.
#[derive(Debug)]
pub struct ValidatedMatch {
    pub record: MatchRecord,
    goals: Vec<GoalForm>,
    cards: Vec<CardForm>,
}

impl ValidatedMatch {
    pub fn events(&self, match_id: i32) -> (Vec<NewGoal>, Vec<NewCard>) {
        let tournament_id = self.record.tournament_id;
        let goals = self
            .goals
            .iter()
            .map(|goal| NewGoal {
                match_id,
                player_id: goal.player_id,
                own_goal: goal.own_goal,
                goals: goal.goals,
                tournament_id,
            })
            .collect();
        let cards = self
            .cards
            .iter()
            .map(|card| NewCard {
                match_id,
                player_id: card.player_id,
                card_type: card.card_type.as_str().to_owned(),
                tournament_id,
            })
            .collect();
        (goals, cards)
    }
}

/// Checks a form against the tournament's teams and the players of the two
/// sides, then applies the walkover rule.
pub fn validate(form: &MatchForm, teams: &[Team], players: &[Player]) -> Result<ValidatedMatch, MatchError> {
    if form.week_number < 1 {
        return invalid(format!("week number must be at least 1, got {}", form.week_number));
    }
    if form.home_team_id == form.away_team_id {
        return invalid("home and away teams must be different");
    }
    for &team_id in &[form.home_team_id, form.away_team_id] {
        if !teams.iter().any(|team| team.id == team_id) {
            return invalid(format!("team {} is not in tournament {}", team_id, form.tournament_id));
        }
    }

    let sides = [form.home_team_id, form.away_team_id];
    let check_player = |player_id: i32, role: &str| -> Result<(), MatchError> {
        let playing = players.iter().any(|p| {
            p.id == player_id && p.tournament_id == form.tournament_id && sides.contains(&p.team_id)
        });
        if playing {
            Ok(())
        } else {
            invalid(format!("{} {} does not play for either team", role, player_id))
        }
    };

    if form.is_walkover {
        match form.walkover_winner_id {
            None => return invalid("a walkover needs a winner"),
            Some(winner) if !sides.contains(&winner) => {
                return invalid(format!("walkover winner {} is not in this match", winner))
            }
            Some(_) => {}
        }
    } else {
        if form.walkover_winner_id.is_some() {
            return invalid("only walkovers have a walkover winner");
        }
        if form.is_played && (form.home_score.is_none() || form.away_score.is_none()) {
            return invalid("a played match needs both scores");
        }
    }
    if form.home_score.map_or(false, |s| s < 0) || form.away_score.map_or(false, |s| s < 0) {
        return invalid("scores cannot be negative");
    }

    if let Some(mom) = form.mom_player_id {
        check_player(mom, "man of the match")?;
    }
    for goal in &form.goals {
        if goal.goals < 1 {
            return invalid(format!("goal entry for player {} must count at least 1", goal.player_id));
        }
        check_player(goal.player_id, "scorer")?;
    }
    for card in &form.cards {
        check_player(card.player_id, "booked player")?;
    }

    let mut record = MatchRecord {
        week_number: form.week_number,
        match_date: form.match_date,
        match_time: form.match_time.clone(),
        home_team_id: form.home_team_id,
        away_team_id: form.away_team_id,
        home_score: form.home_score,
        away_score: form.away_score,
        is_played: form.is_played,
        is_walkover: form.is_walkover,
        walkover_winner_id: form.walkover_winner_id,
        mom_player_id: form.mom_player_id,
        tournament_id: form.tournament_id,
    };
    record.enforce_walkover();

    Ok(ValidatedMatch {
        record,
        goals: form.goals.clone(),
        cards: form.cards.clone(),
    })
}

/// Brings the standings in line with a match that went from `previous` to
/// `current`.
///
/// A result that stops counting, or moves to another week or other teams,
/// is withdrawn first.
pub fn update_standings<S>(store: &S, previous: Option<&Match>, current: &Match) -> Result<StandingsReport, StandingError>
where
    S: StandingStore + ?Sized,
{
    if let Some(prev) = previous {
        let moved = prev.week_number != current.week_number
            || prev.team_ids() != current.team_ids()
            || prev.tournament_id != current.tournament_id;
        if prev.is_decided() && (!current.is_decided() || moved) {
            standings::on_match_result_withdrawn(store, prev)?;
        }
    }
    standings::on_match_result_committed(store, current)
}

#[derive(Debug, Serialize)]
pub struct SavedMatch {
    #[serde(rename = "match")]
    pub match_: Match,
    pub standings_updated: bool,
    /// Teams whose standings could not be brought up to date because an
    /// earlier match of theirs is still undecided.
    pub skipped_teams: Vec<i32>,
}

/// Saves a match with its goals and cards, then updates the standings.
///
/// The match is committed on its own first. A standings failure rolls back
/// only the standings and is reported through `standings_updated`. Teams
/// with a gap in their history are left out and listed in `skipped_teams`.
pub fn save_match(db: &Db, form: &MatchForm) -> Result<SavedMatch, MatchError> {
    let (saved, previous) = db.transaction(|conn| -> Result<_, MatchError> {
        let previous = match form.id {
            Some(id) => {
                let existing = conn.get_match(id).map_err(|err| {
                    if err.is_not_found() {
                        MatchError::Validation(format!("no match with id {}", id))
                    } else {
                        MatchError::Db(err)
                    }
                })?;
                if existing.tournament_id != form.tournament_id {
                    return invalid(format!("match {} belongs to another tournament", id));
                }
                Some(existing)
            }
            None => None,
        };

        let teams = conn.get_teams(form.tournament_id)?;
        let players = conn.get_team_players(&[form.home_team_id, form.away_team_id])?;
        let validated = validate(form, &teams, &players)?;

        let saved = match &previous {
            Some(prev) => conn.update_match(prev.id, &validated.record)?,
            None => conn.insert_match(&validated.record)?,
        };
        let (goals, cards) = validated.events(saved.id);
        conn.replace_match_events(saved.id, &goals, &cards)?;
        Ok((saved, previous))
    })?;
    info!("saved match {} (week {})", saved.id, saved.week_number);

    let (standings_updated, skipped_teams) =
        match db.transaction(|conn| update_standings(conn, previous.as_ref(), &saved)) {
            Ok(report) => {
                let skipped = report.skipped_teams();
                if !skipped.is_empty() {
                    warn!(
                        "match {} left teams {:?} without standings until their earlier matches are decided",
                        saved.id, skipped
                    );
                }
                (true, skipped)
            }
            Err(err) => {
                warn!(
                    "match {} was saved but its standings were not: {}; run `recompute --tournament {}`",
                    saved.id, err, saved.tournament_id
                );
                (false, Vec::new())
            }
        };

    Ok(SavedMatch {
        match_: saved,
        standings_updated,
        skipped_teams,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::fixture::{player, teams};
    use crate::standings::MemoryStore;

    fn form(json: &str) -> MatchForm {
        serde_json::from_str(json).unwrap()
    }

    fn base() -> MatchForm {
        form(
            r#"{
                "tournament_id": 1,
                "week_number": 2,
                "match_date": "2025-07-06",
                "match_time": "6:00 PM",
                "home_team_id": 1,
                "away_team_id": 2,
                "home_score": 2,
                "away_score": 1,
                "is_played": true
            }"#,
        )
    }

    fn sides() -> (Vec<Team>, Vec<Player>) {
        let teams = teams(&["Reckon FC", "BKFC", "Sapphire Seven"]);
        let players = vec![player(10, "Aman", 1), player(20, "Bilal", 2), player(30, "Chirag", 3)];
        (teams, players)
    }

    fn rejected(form: &MatchForm) -> String {
        let (teams, players) = sides();
        match validate(form, &teams, &players) {
            Err(MatchError::Validation(msg)) => msg,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn form_defaults() {
        let form = form(
            r#"{
                "tournament_id": 1,
                "week_number": 1,
                "match_date": "2025-06-29",
                "home_team_id": 1,
                "away_team_id": 2,
                "goals": [{ "player_id": 10 }],
                "cards": [{ "player_id": 20, "card_type": "RED" }]
            }"#,
        );
        assert_eq!(form.id, None);
        assert!(!form.is_played);
        assert!(!form.is_walkover);
        assert_eq!(form.goals[0].goals, 1);
        assert!(!form.goals[0].own_goal);
        assert_eq!(form.cards[0].card_type, CardType::Red);
    }

    #[test]
    fn valid_result_keeps_its_events() {
        let (teams, players) = sides();
        let mut form = base();
        form.mom_player_id = Some(10);
        form.goals.push(GoalForm { player_id: 10, own_goal: false, goals: 2 });
        form.cards.push(CardForm { player_id: 20, card_type: CardType::Yellow });

        let validated = validate(&form, &teams, &players).unwrap();
        assert!(validated.record.is_played);
        let (goals, cards) = validated.events(42);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].match_id, 42);
        assert_eq!(cards[0].card_type, "YELLOW");
    }

    #[test]
    fn walkover_overrides_caller_scores() {
        let (teams, players) = sides();
        let mut form = base();
        form.is_walkover = true;
        form.walkover_winner_id = Some(2);
        form.home_score = Some(5);

        let record = validate(&form, &teams, &players).unwrap().record;
        assert_eq!((record.home_score, record.away_score), (Some(0), Some(3)));
        assert!(!record.is_played);
    }

    #[test]
    fn rejects_bad_forms() {
        let mut same = base();
        same.away_team_id = 1;
        assert!(rejected(&same).contains("different"));

        let mut week = base();
        week.week_number = 0;
        assert!(rejected(&week).contains("week"));

        let mut outsider = base();
        outsider.away_team_id = 9;
        assert!(rejected(&outsider).contains("team 9"));

        let mut no_winner = base();
        no_winner.is_walkover = true;
        assert!(rejected(&no_winner).contains("winner"));

        let mut wrong_winner = base();
        wrong_winner.is_walkover = true;
        wrong_winner.walkover_winner_id = Some(3);
        assert!(rejected(&wrong_winner).contains("winner 3"));

        let mut no_score = base();
        no_score.away_score = None;
        assert!(rejected(&no_score).contains("both scores"));
    }

    #[test]
    fn rejects_players_from_other_teams() {
        let mut mom = base();
        mom.mom_player_id = Some(30);
        assert!(rejected(&mom).contains("man of the match 30"));

        let mut scorer = base();
        scorer.goals.push(GoalForm { player_id: 30, own_goal: false, goals: 1 });
        assert!(rejected(&scorer).contains("scorer 30"));

        let mut zero = base();
        zero.goals.push(GoalForm { player_id: 10, own_goal: false, goals: 0 });
        assert!(rejected(&zero).contains("at least 1"));

        let mut booked = base();
        booked.cards.push(CardForm { player_id: 99, card_type: CardType::Red });
        assert!(rejected(&booked).contains("booked player 99"));
    }

    #[test]
    fn score_correction_updates_in_place() {
        let store = MemoryStore::with_teams(&["A", "B"]);
        let before = store.play(1, 1, 2, 1, 1);
        update_standings(&store, None, &before).unwrap();
        let id = store.standing(1, before.id).unwrap().id;

        let after = store.set_score(before.id, 2, 1);
        update_standings(&store, Some(&before), &after).unwrap();
        let row = store.standing(1, after.id).unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.points, 3);
        assert_eq!(store.standings().len(), 2);
    }

    #[test]
    fn unplaying_withdraws_the_result() {
        let store = MemoryStore::with_teams(&["A", "B"]);
        let before = store.play(1, 1, 2, 1, 0);
        update_standings(&store, None, &before).unwrap();

        let after = store.unplay(before.id);
        update_standings(&store, Some(&before), &after).unwrap();
        assert!(store.standings().is_empty());
    }

    #[test]
    fn moving_a_match_to_other_teams_drops_old_rows() {
        let store = MemoryStore::with_teams(&["A", "B", "C"]);
        let before = store.play(1, 1, 2, 1, 0);
        update_standings(&store, None, &before).unwrap();

        let after = store.edit(before.id, |m| m.away_team_id = 3);
        update_standings(&store, Some(&before), &after).unwrap();
        assert!(store.standing(2, after.id).is_none());
        assert_eq!(store.standing(3, after.id).unwrap().losses, 1);
    }

    #[test]
    fn result_after_a_postponed_match_scores_the_other_side() {
        let store = MemoryStore::with_teams(&["A", "B", "C", "D"]);
        store.play(1, 1, 2, 1, 0);
        store.play(1, 3, 4, 1, 1);
        store.play(2, 1, 4, 2, 0);
        store.fixture(2, 2, 3);

        let m = store.play(3, 1, 3, 0, 1);
        let report = store
            .transaction(|s| {
                standings::recompute_tournament(s, 1)?;
                update_standings(s, None, &m)
            })
            .unwrap();
        assert_eq!(report.skipped_teams(), vec![3]);
        assert_eq!(store.standing(1, m.id).unwrap().losses, 1);
    }

    #[test]
    fn saved_match_reports_skipped_teams() {
        let saved = SavedMatch {
            match_: crate::controllers::fixture::fixture(7, 3, 1, 3),
            standings_updated: true,
            skipped_teams: vec![3],
        };
        let body = serde_json::to_value(&saved).unwrap();
        assert_eq!(body["match"]["id"], 7);
        assert_eq!(body["standings_updated"], true);
        assert_eq!(body["skipped_teams"], serde_json::json!([3]));
    }
}
