//! Instrument domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// A tradable instrument. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    /// Ticker symbol, e.g. "AAPL". Unique.
    pub symbol: String,
    /// Display name, e.g. "Apple Inc.".
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input model for registering a new instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstrument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub symbol: String,
    pub name: String,
}

impl NewInstrument {
    /// Validates the new instrument data.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Instrument symbol cannot be empty".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Instrument name cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}
