//! Holiday Lookup Tool

use std::sync::Arc;

use agent_core::{
    tool::{parse_arguments, ParameterSchema},
    Result as CoreResult, Tool, ToolResult, ToolSchema,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::holidays::{HolidayCalendar, HolidayFilter};

/// Tool for local bank and public holidays
pub struct HolidaysTool {
    calendar: Arc<dyn HolidayCalendar>,
}

impl HolidaysTool {
    pub fn new(calendar: Arc<dyn HolidayCalendar>) -> Self {
        Self { calendar }
    }
}

#[derive(Deserialize)]
struct HolidaysArgs {
    #[serde(default)]
    before_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    after_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    max_count: Option<usize>,
}

impl HolidaysArgs {
    fn filter(&self) -> HolidayFilter {
        HolidayFilter {
            before: self.before_date.map(|d| d.to_utc()),
            after: self.after_date.map(|d| d.to_utc()),
            max_count: self.max_count.unwrap_or(0),
        }
    }
}

#[async_trait]
impl Tool for HolidaysTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_holidays".into(),
            description: "Gets local bank and public holidays. Each line is a single holiday in the format 'YYYY-MM-DD: Holiday Name'.".into(),
            parameters: vec![
                ParameterSchema::optional(
                    "before_date",
                    "string",
                    "Optional date in RFC3339 format to get holidays before this date. If not provided, all holidays will be returned.",
                ),
                ParameterSchema::optional(
                    "after_date",
                    "string",
                    "Optional date in RFC3339 format to get holidays after this date. If not provided, all holidays will be returned.",
                ),
                ParameterSchema::optional(
                    "max_count",
                    "integer",
                    "Optional maximum number of holidays to return. If not provided, all holidays will be returned.",
                ),
            ],
        }
    }

    async fn execute(&self, arguments: &str) -> CoreResult<ToolResult> {
        let args = match parse_arguments::<HolidaysArgs>(arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(ToolResult::failure(
                    "get_holidays",
                    format!("failed to parse tool call arguments: {e}"),
                ))
            }
        };

        let holidays = match self.calendar.holidays().await {
            Ok(holidays) => holidays,
            Err(e) => {
                tracing::error!("Failed to load holiday events: {}", e);
                return Ok(ToolResult::failure("get_holidays", "failed to load holiday events"));
            }
        };

        let lines: Vec<String> = args
            .filter()
            .apply(&holidays)
            .into_iter()
            .map(ToString::to_string)
            .collect();

        Ok(ToolResult::success("get_holidays", lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TravelError};
    use crate::holidays::Holiday;
    use chrono::NaiveDate;

    struct FakeCalendar(Option<Vec<Holiday>>);

    #[async_trait]
    impl HolidayCalendar for FakeCalendar {
        async fn holidays(&self) -> Result<Vec<Holiday>> {
            self.0
                .clone()
                .ok_or_else(|| TravelError::Calendar("unreachable feed".into()))
        }
    }

    fn calendar() -> FakeCalendar {
        let holidays = [(1, 1, "New Year's Day"), (1, 6, "Epiphany"), (6, 24, "Sant Joan"), (12, 25, "Christmas Day")]
            .into_iter()
            .map(|(m, d, name)| Holiday {
                date: NaiveDate::from_ymd_opt(2025, m, d).unwrap(),
                name: name.into(),
            })
            .collect();
        FakeCalendar(Some(holidays))
    }

    #[tokio::test]
    async fn test_all_holidays_without_arguments() {
        let tool = HolidaysTool::new(Arc::new(calendar()));
        let result = tool.execute("").await.unwrap();

        assert!(result.success);
        assert_eq!(
            result.output,
            "2025-01-01: New Year's Day\n2025-01-06: Epiphany\n2025-06-24: Sant Joan\n2025-12-25: Christmas Day"
        );
    }

    #[tokio::test]
    async fn test_window_and_max_count() {
        let tool = HolidaysTool::new(Arc::new(calendar()));
        let result = tool
            .execute(r#"{"after_date":"2025-01-02T00:00:00Z","before_date":"2025-12-31T00:00:00+01:00","max_count":2}"#)
            .await
            .unwrap();

        assert_eq!(result.output, "2025-01-06: Epiphany\n2025-06-24: Sant Joan");
    }

    #[tokio::test]
    async fn test_bad_arguments_and_unreachable_feed() {
        let tool = HolidaysTool::new(Arc::new(calendar()));
        let result = tool.execute(r#"{"after_date":"next week"}"#).await.unwrap();
        assert!(result.output.starts_with("failed to parse tool call arguments"));

        let tool = HolidaysTool::new(Arc::new(FakeCalendar(None)));
        let result = tool.execute("{}").await.unwrap();
        assert!(!result.success);
        assert_eq!(result.output, "failed to load holiday events");
    }

    #[tokio::test]
    async fn test_after_date_later_the_same_day_excludes_that_holiday() {
        let tool = HolidaysTool::new(Arc::new(calendar()));

        let result = tool
            .execute(r#"{"after_date":"2025-06-24T12:00:00Z"}"#)
            .await
            .unwrap();
        assert_eq!(result.output, "2025-12-25: Christmas Day");

        let result = tool
            .execute(r#"{"after_date":"2025-06-24T00:00:00Z","max_count":1}"#)
            .await
            .unwrap();
        assert_eq!(result.output, "2025-06-24: Sant Joan");
    }
}
