//! # travel-tools
//!
//! Tools for a travel assistant: current weather, forecasts, airport
//! lookups and public holidays.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  svckit (agent_core::Tool)                                  │
//! │  get_weather  get_forecast  get_airport_info  get_holidays  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  WeatherService    AirportDirectory    HolidayCalendar      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  weatherapi.com    airport-web API     ICS feed             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every upstream failure reaches the model as result text, never as an
//! error that would end the reasoning loop.

pub mod airport;
pub mod error;
pub mod holidays;
pub mod svckit;
pub mod weather;

use std::sync::Arc;

use agent_core::ToolRegistry;

pub use error::{Result, TravelError};

use airport::{AirportApiClient, AirportDirectory};
use holidays::{HolidayCalendar, IcsCalendarClient};
use weather::{WeatherApiClient, WeatherService};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{AirportTool, ForecastTool, HolidaysTool, WeatherTool};
}

/// Backends shared by the travel tools
#[derive(Clone)]
pub struct TravelServices {
    pub weather: Arc<dyn WeatherService>,
    pub airports: Arc<dyn AirportDirectory>,
    pub holidays: Arc<dyn HolidayCalendar>,
}

impl TravelServices {
    /// Live HTTP backends; a missing weather key is reported per call
    pub fn http(weather_api_key: Option<String>, calendar_link: impl Into<String>) -> Result<Self> {
        Ok(Self {
            weather: Arc::new(WeatherApiClient::new(weather_api_key)?),
            airports: Arc::new(AirportApiClient::new()?),
            holidays: Arc::new(IcsCalendarClient::new(calendar_link)?),
        })
    }

    /// Add all travel tools to `registry`
    pub fn register(&self, registry: &mut ToolRegistry) {
        registry.register(tools::WeatherTool::new(Arc::clone(&self.weather)));
        registry.register(tools::ForecastTool::new(Arc::clone(&self.weather)));
        registry.register(tools::AirportTool::new(Arc::clone(&self.airports)));
        registry.register(tools::HolidaysTool::new(Arc::clone(&self.holidays)));
    }
}
