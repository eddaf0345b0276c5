//! weatherapi.com response shapes, trimmed to the fields the tools report

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Current {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_dir: String,
    pub humidity: u8,
    pub cloud: u8,
    #[serde(default)]
    pub condition: Condition,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location: Location,
    pub current: Current,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    #[serde(default)]
    pub daily_chance_of_rain: u8,
    #[serde(default)]
    pub condition: Condition,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HourForecast {
    /// Local time, `YYYY-MM-DD HH:MM`
    pub time: String,
    pub temp_c: f64,
    #[serde(default)]
    pub chance_of_rain: u8,
    #[serde(default)]
    pub condition: Condition,
}

impl HourForecast {
    /// The `HH:MM` part of `time`
    pub fn clock(&self) -> &str {
        self.time
            .split_once(' ')
            .map(|(_, clock)| clock)
            .unwrap_or(&self.time)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub day: DaySummary,
    #[serde(default)]
    pub hour: Vec<HourForecast>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ForecastDays {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Forecast {
    pub location: Location,
    #[serde(default)]
    pub forecast: ForecastDays,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}
