//! Service Kit - Agent Tools
//!
//! Travel tools that implement `agent_core::Tool` over the service traits.

mod airport_lookup;
mod holiday_lookup;
mod weather_lookup;

pub use airport_lookup::AirportTool;
pub use holiday_lookup::HolidaysTool;
pub use weather_lookup::{ForecastTool, WeatherTool};
