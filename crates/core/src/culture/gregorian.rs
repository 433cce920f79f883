//! Proleptic Gregorian culture backed by chrono.

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt::Write;

use super::error::CultureError;
use super::traits::Culture;
use super::types::{CalendarKind, CultureDefinition, Instant, JDN_CE_OFFSET};

/// A culture using the proleptic Gregorian calendar.
///
/// Input grammar: a bare integer is a Julian Day Number; anything else is
/// matched against the date-time formats, then the date formats, in the
/// order the definition lists them.
#[derive(Debug, Clone)]
pub struct GregorianCulture {
    id: String,
    name: Option<String>,
    date_formats: Vec<String>,
    datetime_formats: Vec<String>,
}

impl GregorianCulture {
    /// Creates a culture with the default ISO formats.
    pub fn new(id: impl Into<String>) -> Self {
        Self::build(id.into(), CultureDefinition::default())
    }

    /// Creates a culture from a definition, rejecting non-Gregorian calendars.
    pub fn from_definition(
        id: impl Into<String>,
        definition: CultureDefinition,
    ) -> Result<Self, CultureError> {
        match CalendarKind::from_name(&definition.calendar) {
            Some(CalendarKind::Gregorian) => Ok(Self::build(id.into(), definition)),
            None => Err(CultureError::UnsupportedCalendar {
                calendar: definition.calendar,
            }),
        }
    }

    fn build(id: String, definition: CultureDefinition) -> Self {
        Self {
            id,
            name: definition.name,
            date_formats: definition.date_formats,
            datetime_formats: definition.datetime_formats,
        }
    }

    /// Display name, falling back to the id.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    fn instant_from(&self, datetime: NaiveDateTime) -> Instant {
        let date = datetime.date();
        Instant {
            culture: self.id.clone(),
            julian_day: i64::from(date.num_days_from_ce()) + JDN_CE_OFFSET,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: datetime.hour(),
            minute: datetime.minute(),
            second: datetime.second(),
            day_of_week: date.weekday().number_from_monday(),
        }
    }
}

/// Converts a Julian Day Number to a Gregorian date.
pub fn date_from_julian_day(julian_day: i64) -> Result<NaiveDate, CultureError> {
    julian_day
        .checked_sub(JDN_CE_OFFSET)
        .and_then(|days| i32::try_from(days).ok())
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or(CultureError::OutOfRange { julian_day })
}

impl Culture for GregorianCulture {
    fn id(&self) -> &str {
        &self.id
    }

    fn parse_instant(&self, text: &str) -> Result<Instant, CultureError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CultureError::parse(text, "input is empty"));
        }

        if let Ok(julian_day) = text.parse::<i64>() {
            let date = date_from_julian_day(julian_day)?;
            return Ok(self.instant_from(date.and_time(NaiveTime::MIN)));
        }

        let mut last_error = None;

        for format in &self.datetime_formats {
            match NaiveDateTime::parse_from_str(text, format) {
                Ok(datetime) => return Ok(self.instant_from(datetime)),
                Err(e) => last_error = Some(e),
            }
        }

        for format in &self.date_formats {
            match NaiveDate::parse_from_str(text, format) {
                Ok(date) => return Ok(self.instant_from(date.and_time(NaiveTime::MIN))),
                Err(e) => last_error = Some(e),
            }
        }

        let reason = match last_error {
            Some(e) => format!("no format of culture {} matched ({})", self.id, e),
            None => format!("culture {} has no input formats", self.id),
        };
        Err(CultureError::parse(text, reason))
    }

    fn format_instant(&self, instant: &Instant, pattern: &str) -> Result<String, CultureError> {
        let invalid = || CultureError::InvalidPattern {
            pattern: pattern.to_string(),
        };

        let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(invalid());
        }

        let date = date_from_julian_day(instant.julian_day)?;
        let time = NaiveTime::from_hms_opt(instant.hour, instant.minute, instant.second)
            .ok_or(CultureError::OutOfRange {
                julian_day: instant.julian_day,
            })?;

        // Specifiers that need an offset (%z, %Z) fail at render time on naive values.
        let mut out = String::new();
        write!(out, "{}", date.and_time(time).format_with_items(items.iter()))
            .map_err(|_| invalid())?;
        Ok(out)
    }
}
