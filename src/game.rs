//! Prediction game rules shared by the game screen and the admin views.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Smallest accepted prediction. `0` means "the agent will fail".
pub const PREDICTION_MIN: i64 = 0;
/// Largest accepted prediction.
pub const PREDICTION_MAX: i64 = 120;

/// The agents a player can bet on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    Ddqn,
    D3qn,
}

impl Agent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ddqn => "ddqn",
            Self::D3qn => "d3qn",
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Agent {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ddqn" => Ok(Self::Ddqn),
            "d3qn" => Ok(Self::D3qn),
            other => Err(format!("unknown agent '{other}'")),
        }
    }
}

/// How risky a prediction is; riskier zones pay more when they hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskZone {
    /// Prediction `0`: the agent will not reach the goal.
    Failure,
    Impossible,
    Minimum,
    Safe,
    Probable,
    Struggle,
    FailureZone,
    Unknown,
}

impl RiskZone {
    pub fn for_prediction(prediction: i64) -> Self {
        match prediction {
            0 => Self::Failure,
            1..=29 => Self::Impossible,
            30..=34 => Self::Minimum,
            35..=55 => Self::Safe,
            56..=65 => Self::Probable,
            66..=85 => Self::Struggle,
            86..=120 => Self::FailureZone,
            _ => Self::Unknown,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Failure => "💀 FAILURE PREDICTION (3 points if correct)",
            Self::Impossible => "🚫 IMPOSSIBLE ZONE - Agent can't solve this fast (10% points)",
            Self::Minimum => "⚡ MINIMUM POSSIBLE - Extremely optimistic (70% points)",
            Self::Safe => "🎯 SAFE ZONE - Most predictable range (40% points)",
            Self::Probable => "🟠 PROBABLE ZONE - Still likely (70% points)",
            Self::Struggle => "🔥 STRUGGLE ZONE - Agent having difficulty (150% points!)",
            Self::FailureZone => "💀 FAILURE ZONE - Approaching timeout (200% points!)",
            Self::Unknown => "❓ Unknown prediction range",
        }
    }

    /// Multiplier applied to the accuracy score.
    fn multiplier(self) -> f64 {
        match self {
            Self::Impossible => 0.1,
            Self::Safe => 0.4,
            Self::Minimum | Self::Probable => 0.7,
            Self::Struggle => 1.5,
            Self::FailureZone => 2.0,
            Self::Failure | Self::Unknown => 1.0,
        }
    }

    fn explanation_suffix(self) -> &'static str {
        match self {
            Self::Safe => " (Safe zone penalty applied)",
            Self::Impossible => " (Impossible zone - heavy penalty)",
            Self::Struggle => " (Struggle zone bonus!)",
            Self::FailureZone => " (Failure zone bonus!)",
            _ => "",
        }
    }
}

/// Display rule for the points a prediction would earn.
///
/// Mirrors the server's accuracy bands and zone multipliers. Prediction `0`
/// is the client's "agent will fail" bet; the scoring endpoint does not
/// accept it, so that branch only feeds the result screen.
pub fn preview_score(prediction: i64, actual_steps: i64, succeeded: bool) -> i64 {
    if prediction == 0 {
        return if succeeded { 0 } else { 3 };
    }

    let base = match (prediction - actual_steps).abs() {
        0 => 10,
        1..=5 => 8,
        6..=10 => 5,
        _ => 0,
    };
    if base == 0 {
        return 0;
    }

    let multiplier = match prediction {
        p if p > PREDICTION_MAX => RiskZone::FailureZone.multiplier(),
        p if p < PREDICTION_MIN => RiskZone::Impossible.multiplier(),
        p => RiskZone::for_prediction(p).multiplier(),
    };
    ((f64::from(base) * multiplier) as i64).max(1)
}

/// One-line summary of how a prediction fared.
pub fn score_explanation(prediction: i64, actual_steps: i64, succeeded: bool) -> String {
    if prediction == 0 {
        return if succeeded {
            "❌ The agent actually succeeded, no points this time.".to_owned()
        } else {
            "🎯 PERFECT! You predicted the failure correctly!".to_owned()
        };
    }

    let difference = (prediction - actual_steps).abs();
    let accuracy = match difference {
        0 => "BULL'S EYE! Perfect prediction!".to_owned(),
        1..=5 => format!("CLOSE! Only {difference} steps off."),
        6..=10 => format!("DECENT! {difference} steps off."),
        _ => format!("OFF TARGET - {difference} steps difference."),
    };
    let suffix = RiskZone::for_prediction(prediction).explanation_suffix();

    format!("🚀 {accuracy}{suffix}")
}

/// Display name of an environment action id from a step log.
pub fn action_name(action_id: u32) -> String {
    match action_id {
        0 => "Turn Left ↶".to_owned(),
        1 => "Turn Right ↷".to_owned(),
        2 => "Move Forward ↑".to_owned(),
        5 => "Open/Close Door 🚪".to_owned(),
        other => format!("Action {other}"),
    }
}
