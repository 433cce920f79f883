//! Types for the culture module.

use serde::{Deserialize, Serialize};

/// Offset between chrono's day count from the common era and the Julian Day Number.
///
/// 0001-01-01 (proleptic Gregorian) is CE day 1 and JDN 1721426.
pub const JDN_CE_OFFSET: i64 = 1_721_425;

/// A point in time produced by a culture's parser.
///
/// `julian_day` is the linear day count; the remaining fields are the civil
/// components of the same instant in the producing culture's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instant {
    /// Id of the culture that produced this instant.
    pub culture: String,
    /// Julian Day Number of the civil date.
    pub julian_day: i64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// ISO weekday, Monday = 1 through Sunday = 7.
    pub day_of_week: u32,
}

/// Calendars a culture definition can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarKind {
    Gregorian,
}

impl CalendarKind {
    /// Parses a calendar name as it appears in a definition file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "gregorian" => Some(Self::Gregorian),
            _ => None,
        }
    }
}

/// On-disk description of a culture (`<data_dir>/<id>.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CultureDefinition {
    /// Calendar name; only "gregorian" is implemented.
    #[serde(default = "default_calendar")]
    pub calendar: String,

    /// Human readable name.
    #[serde(default)]
    pub name: Option<String>,

    /// strftime patterns accepted for dates, tried in order.
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,

    /// strftime patterns accepted for date-times, tried before dates.
    #[serde(default = "default_datetime_formats")]
    pub datetime_formats: Vec<String>,
}

fn default_calendar() -> String {
    "gregorian".to_string()
}

fn default_date_formats() -> Vec<String> {
    vec!["%Y-%m-%d".to_string()]
}

fn default_datetime_formats() -> Vec<String> {
    vec![
        "%Y-%m-%dT%H:%M:%S".to_string(),
        "%Y-%m-%d %H:%M:%S".to_string(),
        "%Y-%m-%dT%H:%M".to_string(),
    ]
}

impl Default for CultureDefinition {
    fn default() -> Self {
        Self {
            calendar: default_calendar(),
            name: None,
            date_formats: default_date_formats(),
            datetime_formats: default_datetime_formats(),
        }
    }
}

impl CultureDefinition {
    /// Adds date formats after the existing ones.
    pub fn with_date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats.extend(formats.into_iter().map(Into::into));
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_defaults_from_toml() {
        let def: CultureDefinition = toml::from_str("").unwrap();
        assert_eq!(def.calendar, "gregorian");
        assert_eq!(def.date_formats, vec!["%Y-%m-%d"]);
        assert_eq!(def.datetime_formats.len(), 3);
    }

    #[test]
    fn test_definition_custom_formats() {
        let toml = r#"
calendar = "gregorian"
name = "Day first"
date_formats = ["%d/%m/%Y"]
"#;
        let def: CultureDefinition = toml::from_str(toml).unwrap();
        assert_eq!(def.name.as_deref(), Some("Day first"));
        assert_eq!(def.date_formats, vec!["%d/%m/%Y"]);
    }

    #[test]
    fn test_calendar_kind_from_name() {
        assert_eq!(CalendarKind::from_name("Gregorian"), Some(CalendarKind::Gregorian));
        assert_eq!(CalendarKind::from_name("hebrew"), None);
    }

    #[test]
    fn test_instant_json_has_every_field() {
        let instant = Instant {
            culture: "gregorian".to_string(),
            julian_day: 2_460_311,
            year: 2024,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            day_of_week: 1,
        };
        let value = serde_json::to_value(&instant).unwrap();
        for field in [
            "culture",
            "julian_day",
            "year",
            "month",
            "day",
            "hour",
            "minute",
            "second",
            "day_of_week",
        ] {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
    }
}
