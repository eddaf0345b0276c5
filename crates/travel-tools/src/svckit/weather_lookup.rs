//! Weather Tools
//!
//! Current conditions and multi-day forecasts.

use std::sync::Arc;

use agent_core::{
    tool::{parse_arguments, ParameterSchema},
    Result as CoreResult, Tool, ToolResult, ToolSchema,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::weather::{CurrentWeather, Forecast, ForecastQuery, WeatherService};

/// Tool for current weather at a location
pub struct WeatherTool {
    weather: Arc<dyn WeatherService>,
}

impl WeatherTool {
    pub fn new(weather: Arc<dyn WeatherService>) -> Self {
        Self { weather }
    }
}

#[derive(Deserialize)]
struct WeatherArgs {
    location: String,
}

fn describe_current(w: &CurrentWeather) -> String {
    format!(
        "Weather in {}, {}: {}, Temperature: {:.1}°C, Feels like: {:.1}°C, Wind: {:.1} km/h {}, Humidity: {}%, Cloud coverage: {}%",
        w.location.name,
        w.location.country,
        w.current.condition.text,
        w.current.temp_c,
        w.current.feelslike_c,
        w.current.wind_kph,
        w.current.wind_dir,
        w.current.humidity,
        w.current.cloud,
    )
}

#[async_trait]
impl Tool for WeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_weather".into(),
            description: "Get the current weather at the given location".into(),
            parameters: vec![ParameterSchema::required(
                "location",
                "string",
                "City name or coordinates",
            )],
        }
    }

    async fn execute(&self, arguments: &str) -> CoreResult<ToolResult> {
        let Ok(args) = parse_arguments::<WeatherArgs>(arguments) else {
            return Ok(ToolResult::failure(
                "get_weather",
                "failed to parse location parameter",
            ));
        };

        match self.weather.current(&args.location).await {
            Ok(weather) => Ok(ToolResult::success("get_weather", describe_current(&weather))),
            Err(e) => {
                tracing::error!(location = %args.location, "Failed to get weather: {}", e);
                Ok(ToolResult::failure(
                    "get_weather",
                    format!("failed to get weather: {e}"),
                ))
            }
        }
    }
}

/// Tool for daily or hourly forecasts
pub struct ForecastTool {
    weather: Arc<dyn WeatherService>,
}

impl ForecastTool {
    pub fn new(weather: Arc<dyn WeatherService>) -> Self {
        Self { weather }
    }
}

#[derive(Deserialize)]
struct ForecastArgs {
    location: String,
    #[serde(default)]
    days: Option<u8>,
    #[serde(default)]
    hour: Option<u8>,
    #[serde(default)]
    date: Option<String>,
}

impl ForecastArgs {
    fn into_query(self) -> Result<ForecastQuery, &'static str> {
        let date = match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| "invalid date format, use YYYY-MM-DD")?,
            ),
            None => None,
        };
        if self.hour.is_some_and(|h| h > 23) {
            return Err("hour must be between 0 and 23");
        }

        Ok(ForecastQuery {
            location: self.location,
            days: self.days.filter(|&d| d > 0).unwrap_or(3),
            hour: self.hour,
            date,
        })
    }
}

fn describe_forecast(forecast: &Forecast, hourly: bool) -> String {
    let mut out = format!(
        "Forecast for {}, {}:\n",
        forecast.location.name, forecast.location.country
    );

    for day in &forecast.forecast.forecastday {
        match day.hour.first().filter(|_| hourly) {
            // The API narrows `hour` to the requested one
            Some(h) => {
                out.push_str(&format!(
                    "- {} {}: {}, Temp: {:.1}°C, Rain: {}%\n",
                    day.date,
                    h.clock(),
                    h.condition.text,
                    h.temp_c,
                    h.chance_of_rain
                ));
            }
            None => {
                out.push_str(&format!(
                    "- {}: {}, Max: {:.1}°C, Min: {:.1}°C, Rain: {}%\n",
                    day.date,
                    day.day.condition.text,
                    day.day.maxtemp_c,
                    day.day.mintemp_c,
                    day.day.daily_chance_of_rain
                ));
            }
        }
    }
    out
}

#[async_trait]
impl Tool for ForecastTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_forecast".into(),
            description: "Get the weather forecast for a location".into(),
            parameters: vec![
                ParameterSchema::required("location", "string", "City name or coordinates"),
                ParameterSchema {
                    default: Some(serde_json::json!(3)),
                    ..ParameterSchema::optional("days", "integer", "Number of days (1-14)")
                },
                ParameterSchema::optional(
                    "hour",
                    "integer",
                    "Specific hour (0-23) to get the forecast for",
                ),
                ParameterSchema::optional(
                    "date",
                    "string",
                    "Specific date in YYYY-MM-DD format. Must be within the next 14 days.",
                ),
            ],
        }
    }

    async fn execute(&self, arguments: &str) -> CoreResult<ToolResult> {
        let Ok(args) = parse_arguments::<ForecastArgs>(arguments) else {
            return Ok(ToolResult::failure("get_forecast", "failed to parse arguments"));
        };

        let query = match args.into_query() {
            Ok(query) => query,
            Err(message) => return Ok(ToolResult::failure("get_forecast", message)),
        };

        match self.weather.forecast(&query).await {
            Ok(forecast) => Ok(ToolResult::success(
                "get_forecast",
                describe_forecast(&forecast, query.hour.is_some()),
            )),
            Err(e) => {
                tracing::error!(location = %query.location, "Failed to get forecast: {}", e);
                Ok(ToolResult::failure(
                    "get_forecast",
                    format!("failed to get forecast: {e}"),
                ))
            }
        }
    }
}
