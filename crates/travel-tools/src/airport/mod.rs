//! Airport Directory
//!
//! Lookup of airports by 4-letter ICAO code.

mod client;

pub use client::AirportApiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TravelError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirportInfo {
    #[serde(rename = "ICAO")]
    pub icao: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub last_update: Option<String>,
}

#[async_trait]
pub trait AirportDirectory: Send + Sync {
    /// `icao` is already normalized, see [`normalize_icao`]
    async fn lookup(&self, icao: &str) -> Result<AirportInfo>;
}

/// Trim and upper-case an ICAO code, rejecting anything but 4 characters
pub fn normalize_icao(raw: &str) -> Result<String> {
    let code = raw.trim().to_uppercase();
    if code.chars().count() != 4 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TravelError::InvalidInput(
            "invalid ICAO code: must be 4 characters".into(),
        ));
    }
    Ok(code)
}
