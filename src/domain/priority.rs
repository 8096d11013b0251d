//! Priority levels for items.
//!
//! Each level carries a severity weight: lower weight = more urgent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PrioritError;

/// Priority of an item, ordered by severity weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    VeryHigh,
    High,
    Med,
    Low,
    #[default]
    VeryLow,
}

impl Priority {
    /// All levels, most urgent first
    pub const ALL: [Priority; 5] = [
        Priority::VeryHigh,
        Priority::High,
        Priority::Med,
        Priority::Low,
        Priority::VeryLow,
    ];

    /// Severity weight (1 = most urgent, 5 = least)
    pub fn weight(&self) -> i64 {
        match self {
            Priority::VeryHigh => 1,
            Priority::High => 2,
            Priority::Med => 3,
            Priority::Low => 4,
            Priority::VeryLow => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::VeryHigh => "VERY_HIGH",
            Priority::High => "HIGH",
            Priority::Med => "MED",
            Priority::Low => "LOW",
            Priority::VeryLow => "VERY_LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = PrioritError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "veryhigh" | "1" => Ok(Priority::VeryHigh),
            "high" | "2" => Ok(Priority::High),
            "med" | "medium" | "3" => Ok(Priority::Med),
            "low" | "4" => Ok(Priority::Low),
            "verylow" | "5" => Ok(Priority::VeryLow),
            _ => Err(PrioritError::InvalidPriority(s.to_string())),
        }
    }
}
