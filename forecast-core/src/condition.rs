use serde::{Deserialize, Serialize};

/// Simplified weather category shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    #[default]
    Clear,
    Cloudy,
    Fog,
    Rain,
    Storm,
    Snow,
}

/// Provider weather codes and the condition each one maps to.
pub const CODE_TABLE: &[(i64, Condition)] = &[
    (1000, Condition::Clear),
    (1100, Condition::Clear),
    (1001, Condition::Cloudy),
    (1101, Condition::Cloudy),
    (1102, Condition::Cloudy),
    (2000, Condition::Fog),
    (2100, Condition::Fog),
    (4000, Condition::Rain),
    (4001, Condition::Rain),
    (4200, Condition::Rain),
    (4201, Condition::Storm),
    (8000, Condition::Storm),
    (5000, Condition::Snow),
    (5001, Condition::Snow),
    (5100, Condition::Snow),
    (5101, Condition::Snow),
];

impl Condition {
    /// Map a provider code; anything outside [`CODE_TABLE`] is `Clear`.
    pub fn from_code(code: i64) -> Self {
        CODE_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, cond)| *cond)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "CLEAR",
            Condition::Cloudy => "CLOUDY",
            Condition::Fog => "FOG",
            Condition::Rain => "RAIN",
            Condition::Storm => "STORM",
            Condition::Snow => "SNOW",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::Cloudy,
            Condition::Fog,
            Condition::Rain,
            Condition::Storm,
            Condition::Snow,
        ]
    }

    /// Rain or storm.
    pub fn is_wet(&self) -> bool {
        matches!(self, Condition::Rain | Condition::Storm)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
