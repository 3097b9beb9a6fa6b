use crate::models::{Match, TeamStanding};

use super::{compute, SkippedStanding, StandingError, StandingStore};

/// Writes the standing rows of both participants of a decided match.
///
/// Existing rows for the match are overwritten in place so their ids stay
/// stable. Rows left over from a participant that is no longer in the match
/// are removed first. A participant with no row for the week before is left
/// out, along with any row it had for this match, and returned; the other
/// participant is still written.
pub fn upsert<S>(store: &S, m: &Match) -> Result<Vec<SkippedStanding>, StandingError>
where
    S: StandingStore + ?Sized,
{
    let teams = m.team_ids();
    let stale = store.delete_match_standings(m.id, &teams)?;
    if stale > 0 {
        debug!("removed {} standings of former participants of match {}", stale, m.id);
    }

    let mut skipped = Vec::new();
    for &team_id in &teams {
        let existing = store.find_standing(m.id, team_id)?;
        let previous = match previous_standing(store, m, team_id) {
            Ok(previous) => previous,
            Err(StandingError::MissingPreviousStanding { team_id, week }) => {
                warn!(
                    "team {} has no standing before week {}, leaving it out of match {}",
                    team_id, week, m.id
                );
                if existing.is_some() {
                    let others: Vec<i32> = teams.iter().cloned().filter(|&t| t != team_id).collect();
                    store.delete_match_standings(m.id, &others)?;
                }
                skipped.push(SkippedStanding {
                    team_id,
                    match_id: m.id,
                    week,
                });
                continue;
            }
            Err(err) => return Err(err),
        };
        let totals = compute(m, team_id, previous.as_ref())?;
        let name = store.team_name(team_id)?;

        match existing {
            Some(row) => {
                store.update_standing(&row, &totals.into_changes(name, m.tournament_id))?;
            }
            None => {
                store.insert_standing(&totals.into_new_row(team_id, name, m))?;
            }
        }
    }
    Ok(skipped)
}

/// The team's row for the week before `m`, or `None` in week 1.
fn previous_standing<S>(
    store: &S,
    m: &Match,
    team_id: i32,
) -> Result<Option<TeamStanding>, StandingError>
where
    S: StandingStore + ?Sized,
{
    let matches_played = m.week_number - 1;
    if matches_played <= 0 {
        return Ok(None);
    }

    let mut rows = store.find_standings_at(team_id, m.tournament_id, matches_played)?;
    match rows.len() {
        0 => Err(StandingError::MissingPreviousStanding {
            team_id,
            week: m.week_number,
        }),
        1 => Ok(rows.pop()),
        _ => Err(StandingError::DuplicateStandingRow {
            team_id,
            matches_played,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::MemoryStore;

    #[test]
    fn overwrites_in_place() {
        let store = MemoryStore::with_teams(&["Bon Bon FC", "Cell Kraft FC"]);
        let m = store.play(1, 1, 2, 1, 0);
        upsert(&store, &m).unwrap();
        let first = store.standing(1, m.id).unwrap();

        let m = store.set_score(m.id, 0, 2);
        upsert(&store, &m).unwrap();
        let second = store.standing(1, m.id).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.losses, 1);
        assert_eq!(second.wins, 0);
        assert_eq!(store.standings().len(), 2);
    }

    #[test]
    fn gap_skips_only_that_team() {
        let store = MemoryStore::with_teams(&["A", "B", "C", "D"]);
        store.play(1, 1, 2, 1, 0);
        store.play(1, 3, 4, 1, 0);
        store.play(2, 1, 4, 0, 0);
        // B v C of week 2 is postponed
        store.fixture(2, 2, 3);
        recompute(&store);
        let m = store.play(3, 1, 3, 2, 2);

        let skipped = upsert(&store, &m).unwrap();
        assert_eq!(
            skipped,
            vec![SkippedStanding { team_id: 3, match_id: m.id, week: 3 }]
        );
        assert_eq!(store.standing(1, m.id).unwrap().matches_played, 3);
        assert!(store.standing(3, m.id).is_none());
    }

    #[test]
    fn gap_removes_the_stale_row_of_that_team() {
        let store = MemoryStore::with_teams(&["A", "B", "C", "D"]);
        store.play(1, 1, 2, 1, 0);
        let c_v_d = store.play(1, 3, 4, 1, 0);
        let m = store.play(2, 1, 3, 2, 2);
        recompute(&store);
        assert!(store.standing(3, m.id).is_some());

        // C's week-1 result no longer counts
        store.unplay(c_v_d.id);
        store.delete_match_standings(c_v_d.id, &[]).unwrap();

        let skipped = upsert(&store, &m).unwrap();
        assert_eq!(skipped.len(), 1);
        assert!(store.standing(3, m.id).is_none());
        assert_eq!(store.standing(1, m.id).unwrap().draws, 1);
    }

    #[test]
    fn duplicate_previous_rows_are_reported() {
        let store = MemoryStore::with_teams(&["A", "B"]);
        let w1 = store.play(1, 1, 2, 1, 0);
        upsert(&store, &w1).unwrap();
        let mut copy = store.standing(1, w1.id).unwrap();
        copy.id = 999;
        copy.match_id = 998;
        store.force_insert(copy);

        let w2 = store.play(2, 2, 1, 1, 1);
        match upsert(&store, &w2) {
            Err(StandingError::DuplicateStandingRow { team_id: 1, matches_played: 1 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn swapped_participant_loses_its_row() {
        let store = MemoryStore::with_teams(&["A", "B", "C"]);
        let m = store.play(1, 1, 2, 1, 0);
        upsert(&store, &m).unwrap();

        let m = store.edit(m.id, |m| m.away_team_id = 3);
        upsert(&store, &m).unwrap();

        assert!(store.standing(2, m.id).is_none());
        assert_eq!(store.standing(3, m.id).unwrap().losses, 1);
    }

    #[test]
    fn row_carries_current_team_name() {
        let store = MemoryStore::with_teams(&["Sarco FC (LUFC)", "BKFC"]);
        let m = store.play(1, 1, 2, 0, 0);
        upsert(&store, &m).unwrap();
        assert_eq!(store.standing(1, m.id).unwrap().name, "Sarco FC (LUFC)");
    }

    fn recompute(store: &MemoryStore) {
        crate::standings::recompute_tournament(store, 1).unwrap();
    }
}
