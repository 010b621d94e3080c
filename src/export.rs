//! CSV export of admin listings.

use chrono::NaiveDate;

use crate::{GameRecord, UserRecord};

pub const USER_HEADERS: [&str; 10] = [
    "ID",
    "Username",
    "Email",
    "Total Score",
    "Games Played",
    "Prediction Accuracy",
    "AI Success Rate",
    "Is Admin",
    "Is Active",
    "Created At",
];

pub const GAME_HEADERS: [&str; 10] = [
    "ID",
    "Username",
    "Agent Type",
    "Prediction",
    "Actual Steps",
    "Succeeded",
    "Score",
    "Total Reward",
    "Timestamp",
    "GIF URL",
];

/// Renders users as CSV; empty input renders as an empty string.
pub fn users_csv(users: &[UserRecord]) -> String {
    let rows = users.iter().map(|user| {
        vec![
            user.id.to_string(),
            user.username.clone(),
            user.email.clone().unwrap_or_default(),
            user.total_score.unwrap_or(0).to_string(),
            user.games_played.unwrap_or(0).to_string(),
            user.prediction_accuracy.unwrap_or(0.0).to_string(),
            user.ai_success_rate.unwrap_or(0.0).to_string(),
            user.is_admin.to_string(),
            user.is_active.to_string(),
            user.created_at.clone().unwrap_or_default(),
        ]
    });
    to_csv(&USER_HEADERS, rows)
}

/// Renders games as CSV; empty input renders as an empty string.
pub fn games_csv(games: &[GameRecord]) -> String {
    let rows = games.iter().map(|game| {
        vec![
            game.id.to_string(),
            game.username.clone(),
            game.agent_type.clone(),
            game.prediction.to_string(),
            game.actual_steps.to_string(),
            game.succeeded.to_string(),
            game.score.to_string(),
            game.total_reward.unwrap_or(0.0).to_string(),
            game.timestamp.clone(),
            game.gif_url.clone().unwrap_or_default(),
        ]
    });
    to_csv(&GAME_HEADERS, rows)
}

/// `<prefix>_export_<YYYY-MM-DD>.csv`
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Export file name stamped with today's UTC date.
pub fn export_filename_today(prefix: &str) -> String {
    export_filename(prefix, chrono::Utc::now().date_naive())
}

fn to_csv<I>(headers: &[&str], rows: I) -> String
where
    I: Iterator<Item = Vec<String>>,
{
    let mut rows = rows.peekable();
    if rows.peek().is_none() {
        return String::new();
    }

    let mut lines = vec![headers.join(",")];
    lines.extend(rows.map(|row| {
        row.iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",")
    }));
    lines.join("\n")
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{export_filename, games_csv, users_csv};
    use crate::{GameRecord, UserRecord};

    fn game(username: &str) -> GameRecord {
        GameRecord {
            id: 7,
            username: username.to_owned(),
            agent_type: "DDQN".to_owned(),
            prediction: 45,
            actual_steps: 43,
            succeeded: true,
            score: 3,
            total_reward: None,
            timestamp: "2024-05-01T10:00:00".to_owned(),
            gif_url: Some("/video/run_1.gif".to_owned()),
        }
    }

    #[test]
    fn empty_listing_is_empty_string() {
        assert_eq!(users_csv(&[]), "");
        assert_eq!(games_csv(&[]), "");
    }

    #[test]
    fn games_render_with_headers() {
        let csv = games_csv(&[game("kit")]);
        assert_eq!(
            csv,
            "ID,Username,Agent Type,Prediction,Actual Steps,Succeeded,Score,Total Reward,Timestamp,GIF URL\n\
             7,kit,DDQN,45,43,true,3,0,2024-05-01T10:00:00,/video/run_1.gif"
        );
    }

    #[test]
    fn fields_with_commas_or_quotes_are_quoted() {
        let csv = games_csv(&[game("kit, \"the\" fox")]);
        let row = csv.lines().nth(1).expect("data row");
        assert!(row.starts_with("7,\"kit, \"\"the\"\" fox\",DDQN"));
    }

    #[test]
    fn users_default_missing_numbers_to_zero() {
        let user = UserRecord {
            id: 1,
            username: "kit".to_owned(),
            email: Some("kit@example.com".to_owned()),
            total_score: None,
            games_played: Some(4),
            prediction_accuracy: None,
            ai_success_rate: Some(0.5),
            is_admin: false,
            is_active: true,
            created_at: Some("2024-01-01T00:00:00".to_owned()),
            last_login: None,
        };
        let csv = users_csv(&[user]);
        assert_eq!(
            csv.lines().nth(1),
            Some("1,kit,kit@example.com,0,4,0,0.5,false,true,2024-01-01T00:00:00")
        );
    }

    #[test]
    fn filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
        assert_eq!(export_filename("users", date), "users_export_2024-03-09.csv");
    }
}
