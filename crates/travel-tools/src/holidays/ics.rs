//! Holiday extraction from an iCalendar document
//!
//! Parsing (line unfolding, parameters, escapes) is done by `icalendar`.
//! Only `VEVENT`s with an all-day `DTSTART` and a `SUMMARY` become holidays.

use icalendar::{Calendar, CalendarComponent, Component, DatePerhapsTime, EventLike};

use super::Holiday;
use crate::error::{Result, TravelError};

/// Parse all-day events from an ICS document, in feed order
pub fn parse_holidays(source: &str) -> Result<Vec<Holiday>> {
    if !source
        .lines()
        .any(|l| l.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR"))
    {
        return Err(TravelError::Calendar("missing BEGIN:VCALENDAR".into()));
    }

    let calendar: Calendar = source.parse().map_err(TravelError::Calendar)?;

    let holidays = calendar
        .components
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(event),
            _ => None,
        })
        .filter_map(|event| {
            let Some(DatePerhapsTime::Date(date)) = event.get_start() else {
                return None;
            };
            let name = event.get_summary()?.trim();
            (!name.is_empty()).then(|| Holiday {
                date,
                name: name.to_string(),
            })
        })
        .collect();

    Ok(holidays)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Holidays//EN\r\n\
BEGIN:VEVENT\r\n\
UID:newyear@holidays\r\n\
DTSTART;VALUE=DATE:20250101\r\n\
SUMMARY:New Year's Day\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:santjoan@holidays\r\n\
SUMMARY:Sant Joan (Catalonia)\r\n\
DTSTART;VALUE=DATE:20250624\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:meeting@holidays\r\n\
DTSTART:20250701T090000Z\r\n\
SUMMARY:Staff meeting\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:diada@holidays\r\n\
DTSTART;VALUE=DATE:20250911\r\n\
SUMMARY:National Day of\r\n  Catalonia\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_parse_all_day_events() {
        let holidays = parse_holidays(FEED).unwrap();
        let rendered: Vec<String> = holidays.iter().map(Holiday::to_string).collect();

        assert_eq!(
            rendered,
            vec![
                "2025-01-01: New Year's Day",
                "2025-06-24: Sant Joan (Catalonia)",
                "2025-09-11: National Day of Catalonia",
            ]
        );
    }

    #[test]
    fn test_rejects_non_calendar() {
        let err = parse_holidays("<html>not found</html>").unwrap_err();
        assert!(matches!(err, TravelError::Calendar(_)));
    }

    #[test]
    fn test_event_without_summary_is_skipped() {
        let feed = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:x\r\nDTSTART;VALUE=DATE:20250101\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        assert!(parse_holidays(feed).unwrap().is_empty());
    }
}
