//! Weather Integration
//!
//! Current conditions and forecasts. The only backend today is
//! weatherapi.com.

mod client;
mod models;

pub use client::WeatherApiClient;
pub use models::{
    Condition, Current, CurrentWeather, DaySummary, Forecast, ForecastDay, ForecastDays,
    HourForecast, Location,
};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;

/// Forecast request parameters
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastQuery {
    pub location: String,
    /// Number of days, 1-14
    pub days: u8,
    /// Restrict each day to this hour (0-23)
    pub hour: Option<u8>,
    /// Forecast a single date instead of the next `days`
    pub date: Option<NaiveDate>,
}

impl ForecastQuery {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            days: 3,
            hour: None,
            date: None,
        }
    }
}

/// Weather data source (Strategy pattern)
#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn current(&self, location: &str) -> Result<CurrentWeather>;

    async fn forecast(&self, query: &ForecastQuery) -> Result<Forecast>;
}
