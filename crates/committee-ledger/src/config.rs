use std::fmt;
use std::str::FromStr;

use committee_core::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Strict,
    Permissive,
}

impl FromStr for ValidationMode {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            other => Err(LedgerError::malformed(format!(
                "unknown validation mode {other:?}, expected strict or permissive"
            ))),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Permissive => f.write_str("permissive"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    pub validation: ValidationMode,
    pub due_day: u32,
    /// When false, mutations queue no domain events.
    pub capture_events: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            validation: ValidationMode::Strict,
            due_day: 10,
            capture_events: true,
        }
    }
}

impl LedgerConfig {
    pub fn permissive() -> Self {
        Self {
            validation: ValidationMode::Permissive,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if !(1..=28).contains(&self.due_day) {
            return Err(LedgerError::malformed(format!(
                "due day must be between 1 and 28, got {}",
                self.due_day
            )));
        }
        Ok(())
    }
}
