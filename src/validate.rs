//! Client-side input checks run before a form is submitted.

use std::sync::OnceLock;

use regex::Regex;

use crate::game::{PREDICTION_MAX, PREDICTION_MIN};

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 30;
pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const PASSWORD_MAX_LENGTH: usize = 128;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("username pattern is valid"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    let length = username.chars().count();
    (USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length)
        && username_pattern().is_match(username)
}

/// Parses a prediction field; `None` when it is not an integer in range.
pub fn parse_prediction(input: &str) -> Option<i64> {
    input
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|value| (PREDICTION_MIN..=PREDICTION_MAX).contains(value))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordCheck {
    pub is_valid: bool,
    pub strength: PasswordStrength,
    pub issues: Vec<String>,
}

/// Checks length limits and rates strength.
///
/// One strength point each for: 8+ characters, a lowercase letter, an
/// uppercase letter, a digit, a symbol. Valid passwords have no issues and
/// at least two points.
pub fn check_password(password: &str) -> PasswordCheck {
    if password.is_empty() {
        return PasswordCheck {
            is_valid: false,
            strength: PasswordStrength::Weak,
            issues: vec!["Password is required".to_owned()],
        };
    }

    let length = password.chars().count();
    let mut issues = Vec::new();
    if length < PASSWORD_MIN_LENGTH {
        issues.push(format!(
            "Password must be at least {PASSWORD_MIN_LENGTH} characters"
        ));
    }
    if length > PASSWORD_MAX_LENGTH {
        issues.push(format!(
            "Password must be less than {PASSWORD_MAX_LENGTH} characters"
        ));
    }

    let score = [
        length >= 8,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ]
    .into_iter()
    .filter(|hit| *hit)
    .count();

    let strength = match score {
        0 | 1 => PasswordStrength::Weak,
        2 | 3 => PasswordStrength::Fair,
        4 => PasswordStrength::Good,
        _ => PasswordStrength::Strong,
    };

    PasswordCheck {
        is_valid: issues.is_empty() && score >= 2,
        strength,
        issues,
    }
}

/// Collects every problem with a registration form.
pub fn check_registration(username: &str, email: &str, password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if !is_valid_username(username) {
        errors.push("Invalid username format".to_owned());
    }
    if !is_valid_email(email) {
        errors.push("Invalid email format".to_owned());
    }
    let password = check_password(password);
    if !password.is_valid {
        errors.extend(password.issues);
    }
    errors
}
