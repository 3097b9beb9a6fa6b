table! {
    cards (id) {
        id -> Int4,
        match_id -> Int4,
        player_id -> Int4,
        card_type -> Varchar,
        tournament_id -> Int4,
    }
}

table! {
    goals (id) {
        id -> Int4,
        match_id -> Int4,
        player_id -> Int4,
        own_goal -> Bool,
        #[sql_name = "goals"]
        goal_count -> Int4,
        tournament_id -> Int4,
    }
}

table! {
    matches (id) {
        id -> Int4,
        week_number -> Int4,
        match_date -> Date,
        match_time -> Nullable<Varchar>,
        home_team_id -> Int4,
        away_team_id -> Int4,
        home_score -> Nullable<Int4>,
        away_score -> Nullable<Int4>,
        is_played -> Bool,
        is_walkover -> Bool,
        walkover_winner_id -> Nullable<Int4>,
        mom_player_id -> Nullable<Int4>,
        tournament_id -> Int4,
    }
}

table! {
    players (id) {
        id -> Int4,
        name -> Varchar,
        team_id -> Int4,
        tournament_id -> Int4,
    }
}

table! {
    team_renames (id) {
        id -> Int4,
        team_id -> Int4,
        old_name -> Varchar,
        new_name -> Varchar,
        renamed_at -> Timestamp,
    }
}

table! {
    team_standings (id) {
        id -> Int4,
        team_id -> Int4,
        name -> Varchar,
        matches_played -> Int4,
        wins -> Int4,
        draws -> Int4,
        losses -> Int4,
        goals_for -> Int4,
        goals_against -> Int4,
        goal_difference -> Int4,
        points -> Int4,
        match_id -> Int4,
        tournament_id -> Int4,
    }
}

table! {
    team_of_the_week (id) {
        id -> Int4,
        week_number -> Int4,
        weekend_date -> Date,
        striker_id -> Int4,
        left_mid_id -> Int4,
        right_mid_id -> Int4,
        left_defence_id -> Int4,
        right_defence_id -> Int4,
        goal_keeper_id -> Int4,
        tournament_id -> Int4,
    }
}

table! {
    teams (id) {
        id -> Int4,
        name -> Varchar,
        tournament_id -> Nullable<Int4>,
    }
}

table! {
    tournaments (id) {
        id -> Int4,
        short_description -> Varchar,
        long_description -> Text,
        start_date -> Nullable<Date>,
    }
}

joinable!(cards -> matches (match_id));
joinable!(cards -> players (player_id));
joinable!(goals -> matches (match_id));
joinable!(goals -> players (player_id));
joinable!(matches -> tournaments (tournament_id));
joinable!(players -> teams (team_id));
joinable!(team_of_the_week -> tournaments (tournament_id));
joinable!(team_renames -> teams (team_id));
joinable!(team_standings -> matches (match_id));
joinable!(team_standings -> teams (team_id));
joinable!(teams -> tournaments (tournament_id));

allow_tables_to_appear_in_same_query!(
    cards,
    goals,
    matches,
    players,
    team_of_the_week,
    team_renames,
    team_standings,
    teams,
    tournaments,
);
