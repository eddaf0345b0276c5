//! airport-web.appspot.com client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{AirportDirectory, AirportInfo};
use crate::error::{Result, TravelError};

const DEFAULT_BASE_URL: &str = "https://airport-web.appspot.com/_ah/api/airportsapi/v1/airports";

pub struct AirportApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl AirportApiClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[derive(Deserialize)]
struct NotFoundBody {
    error: NotFoundDetail,
}

#[derive(Deserialize)]
struct NotFoundDetail {
    message: String,
}

#[async_trait]
impl AirportDirectory for AirportApiClient {
    async fn lookup(&self, icao: &str) -> Result<AirportInfo> {
        tracing::debug!(icao, "Looking up airport");

        let response = self
            .client
            .get(format!("{}/{}", self.base_url.trim_end_matches('/'), icao))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match status {
            StatusCode::OK => Ok(serde_json::from_str(&body)?),
            StatusCode::NOT_FOUND => {
                let what = serde_json::from_str::<NotFoundBody>(&body)
                    .map(|b| b.error.message)
                    .unwrap_or_else(|_| format!("airport {icao}"));
                Err(TravelError::NotFound(what))
            }
            other => Err(TravelError::Api {
                status: other.as_u16(),
                message: body,
            }),
        }
    }
}
