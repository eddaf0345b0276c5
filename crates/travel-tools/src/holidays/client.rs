//! Remote ICS feed

use std::time::Duration;

use async_trait::async_trait;

use super::{parse_holidays, Holiday, HolidayCalendar};
use crate::error::{Result, TravelError};

pub const DEFAULT_CALENDAR_LINK: &str = "https://www.officeholidays.com/ics/spain/catalonia";

/// Downloads and parses the feed on every call
pub struct IcsCalendarClient {
    client: reqwest::Client,
    link: String,
}

impl IcsCalendarClient {
    pub fn new(link: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            link: link.into(),
        })
    }

    pub fn link(&self) -> &str {
        &self.link
    }
}

#[async_trait]
impl HolidayCalendar for IcsCalendarClient {
    async fn holidays(&self) -> Result<Vec<Holiday>> {
        tracing::info!(link = %self.link, "Loading calendar");

        let response = self.client.get(&self.link).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TravelError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_holidays(&body)
    }
}
