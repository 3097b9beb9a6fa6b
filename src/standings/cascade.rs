use super::{upsert, StandingError, StandingStore, StandingsReport};

/// Replays every decided match of `team_id` from `start_week` onwards, in
/// schedule order.
///
/// Order matters: each row is built on the previous week's row, so applying
/// a later week first would bake stale totals into it.
pub fn cascade<S>(store: &S, team_id: i32, start_week: i32) -> Result<StandingsReport, StandingError>
where
    S: StandingStore + ?Sized,
{
    let matches = store.decided_matches_for_team(team_id, start_week)?;
    debug!(
        "cascading standings of team {} from week {} over {} matches",
        team_id,
        start_week,
        matches.len()
    );

    let mut report = StandingsReport::default();
    for m in &matches {
        report.record(upsert(store, m)?);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::{recompute_tournament, MemoryStore};

    fn season() -> MemoryStore {
        let store = MemoryStore::with_teams(&["A", "B", "C", "D"]);
        store.play(1, 1, 2, 2, 0);
        store.play(1, 3, 4, 1, 3);
        store.play(2, 3, 1, 1, 1);
        store.play(2, 4, 2, 0, 0);
        store.play(3, 1, 4, 0, 2);
        store.play(3, 2, 3, 5, 1);
        recompute_tournament(&store, 1).unwrap();
        store
    }

    #[test]
    fn running_twice_changes_nothing() {
        let store = season();
        assert_eq!(cascade(&store, 1, 1).unwrap().replayed, 3);
        let once = store.standings();
        assert_eq!(cascade(&store, 1, 1).unwrap().replayed, 3);
        assert_eq!(store.standings(), once);
        assert_eq!(once.len(), 12);
    }

    #[test]
    fn only_later_weeks_are_replayed() {
        let store = season();
        assert_eq!(cascade(&store, 2, 2).unwrap().replayed, 2);
        assert_eq!(cascade(&store, 2, 4).unwrap().replayed, 0);
    }

    #[test]
    fn unplayed_matches_are_skipped() {
        let store = season();
        store.fixture(4, 1, 2);
        assert_eq!(cascade(&store, 1, 1).unwrap().replayed, 3);
    }

    #[test]
    fn gap_stops_the_team_but_not_its_opponents() {
        let store = season();
        let extra = store.play(4, 1, 3, 1, 0);
        store.play(4, 2, 4, 0, 0);
        cascade(&store, 1, 4).unwrap();
        // team 3's rows from week 2 on are gone
        store.delete_team_standings_from(3, 1, 2).unwrap();

        let report = cascade(&store, 1, 1).unwrap();
        assert_eq!(report.replayed, 4);
        assert_eq!(report.skipped_teams(), vec![3]);
        assert_eq!(store.standing(1, extra.id).unwrap().matches_played, 4);
        assert!(store.standing(3, extra.id).is_none());
    }

    #[test]
    fn replays_in_schedule_order() {
        let store = MemoryStore::with_teams(&["A", "B"]);
        // inserted out of order on purpose
        let late = store.play(2, 2, 1, 0, 1);
        let early = store.play(1, 1, 2, 3, 3);

        assert_eq!(cascade(&store, 1, 1).unwrap().replayed, 2);
        let row = store.standing(1, late.id).unwrap();
        assert_eq!(row.matches_played, 2);
        assert_eq!(row.points, 4);
        assert_eq!(row.goals_for, 4);
        assert_eq!(store.standing(1, early.id).unwrap().draws, 1);
    }
}
