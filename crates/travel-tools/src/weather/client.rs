//! weatherapi.com client

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::models::ApiErrorBody;
use super::{CurrentWeather, Forecast, ForecastQuery, WeatherService};
use crate::error::{Result, TravelError};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

pub struct WeatherApiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherApiClient {
    /// A missing key is reported per request, not at construction
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(TravelError::MissingApiKey("WEATHER_API_KEY"))?;

        let response = self
            .client
            .get(format!("{}/{}", self.base_url.trim_end_matches('/'), path))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("key", key), ("lang", "en")])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => format!("{} (code {})", parsed.error.message, parsed.error.code),
                Err(_) => body,
            };
            return Err(TravelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Query string for `forecast.json`
fn forecast_params(query: &ForecastQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.location.clone()),
        ("days", query.days.to_string()),
    ];
    if let Some(hour) = query.hour {
        params.push(("hour", hour.to_string()));
    }
    if let Some(date) = query.date {
        params.push(("dt", date.format("%Y-%m-%d").to_string()));
    }
    params
}

#[async_trait]
impl WeatherService for WeatherApiClient {
    async fn current(&self, location: &str) -> Result<CurrentWeather> {
        tracing::debug!(location, "Fetching current weather");
        self.get("current.json", &[("q", location.to_string())]).await
    }

    async fn forecast(&self, query: &ForecastQuery) -> Result<Forecast> {
        tracing::debug!(location = %query.location, days = query.days, "Fetching forecast");
        self.get("forecast.json", &forecast_params(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let client = WeatherApiClient::with_base_url(None, "http://127.0.0.1:9").unwrap();
        assert!(!client.has_api_key());

        let err = client.current("Barcelona").await.unwrap_err();
        assert!(matches!(err, TravelError::MissingApiKey("WEATHER_API_KEY")));
        assert!(err.to_string().contains("WEATHER_API_KEY"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        assert!(!WeatherApiClient::new(Some("  ".into())).unwrap().has_api_key());
        assert!(WeatherApiClient::new(Some("abc".into())).unwrap().has_api_key());
    }

    #[test]
    fn test_forecast_params() {
        let mut query = ForecastQuery::new("Paris");
        assert_eq!(
            forecast_params(&query),
            vec![("q", "Paris".to_string()), ("days", "3".to_string())]
        );

        query.hour = Some(14);
        query.date = NaiveDate::from_ymd_opt(2025, 7, 1);
        let params = forecast_params(&query);
        assert!(params.contains(&("hour", "14".to_string())));
        assert!(params.contains(&("dt", "2025-07-01".to_string())));
    }
}
