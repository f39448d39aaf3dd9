//! Calendar values and the clock used to seed new pickers.
//!
//! Date arithmetic is delegated to `chrono`. Every update returns a new value;
//! nothing here mutates in place, so a value handed from one stage to another
//! can never be changed behind the receiver's back.
use std::fmt::{self, Write as _};

use chrono::{
    Datelike, Days, Local, Months, NaiveDate, NaiveTime, Timelike,
    format::{Item, StrftimeItems},
};

use crate::error::CalendarError;

/// A valid calendar date expressed as year, month, and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DateValue(NaiveDate);

/// Date component addressed by [`DateValue::with_field`] and
/// [`DateValue::add_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    /// Calendar year.
    Year,
    /// Month of the year (1-12).
    Month,
    /// Day of the month (1-31).
    Day,
}

impl DateField {
    fn name(self) -> &'static str {
        match self {
            DateField::Year => "year",
            DateField::Month => "month",
            DateField::Day => "day",
        }
    }
}

impl DateValue {
    /// Creates a date if the values are valid.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day of the month (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the ISO weekday number, 1 for Monday through 7 for Sunday.
    pub fn weekday_number(&self) -> u32 {
        self.0.weekday().number_from_monday()
    }

    /// Returns the number of days in this date's month.
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Returns the first day of this date's month.
    pub fn first_of_month(&self) -> Self {
        Self::clamped(self.year(), self.month(), 1)
    }

    /// Returns the last day of this date's month.
    pub fn last_of_month(&self) -> Self {
        Self::clamped(self.year(), self.month(), self.days_in_month())
    }

    /// Returns true when both dates fall in the same month of the same year.
    pub fn same_month(&self, other: &DateValue) -> bool {
        self.year() == other.year() && self.month() == other.month()
    }

    /// Returns a copy with one field replaced.
    ///
    /// Replacing the year or month keeps the day when possible and clamps it
    /// to the last day of the resulting month otherwise (Feb 29 becomes
    /// Feb 28 in a common year). Replacing the day fails when the day does not
    /// exist in the month.
    pub fn with_field(&self, field: DateField, value: i32) -> Result<Self, CalendarError> {
        let out_of_range = || CalendarError::OutOfRange {
            field: field.name(),
            value: value as i64,
        };
        match field {
            DateField::Year => NaiveDate::from_ymd_opt(
                value,
                self.month(),
                self.day().min(days_in_month(value, self.month())),
            )
            .map(Self)
            .ok_or_else(out_of_range),
            DateField::Month => {
                let month = u32::try_from(value).map_err(|_| out_of_range())?;
                if !(1..=12).contains(&month) {
                    return Err(out_of_range());
                }
                let day = self.day().min(days_in_month(self.year(), month));
                Self::new(self.year(), month, day).ok_or_else(out_of_range)
            }
            DateField::Day => {
                let day = u32::try_from(value).map_err(|_| out_of_range())?;
                Self::new(self.year(), self.month(), day).ok_or_else(out_of_range)
            }
        }
    }

    /// Returns a copy moved by `delta` units of `field`.
    ///
    /// Month and year arithmetic carries across year boundaries and clamps
    /// the day to the end of the target month.
    pub fn add_field(&self, field: DateField, delta: i32) -> Result<Self, CalendarError> {
        let out_of_range = || CalendarError::OutOfRange {
            field: field.name(),
            value: delta as i64,
        };
        let magnitude = delta.unsigned_abs();
        let moved = match field {
            DateField::Year => {
                let months = magnitude.checked_mul(12).ok_or_else(out_of_range)?;
                shift_months(self.0, delta.is_negative(), months)
            }
            DateField::Month => shift_months(self.0, delta.is_negative(), magnitude),
            DateField::Day => {
                let days = Days::new(u64::from(magnitude));
                if delta.is_negative() {
                    self.0.checked_sub_days(days)
                } else {
                    self.0.checked_add_days(days)
                }
            }
        };
        moved.map(Self).ok_or_else(out_of_range)
    }

    /// Formats the date with a strftime-style pattern.
    pub fn format(&self, pattern: &str) -> Result<String, CalendarError> {
        render_pattern(self.0.format(pattern), pattern)
    }

    /// Returns the underlying chrono date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    fn clamped(year: i32, month: u32, day: u32) -> Self {
        // Callers pass a month and year taken from an existing valid date.
        Self::new(year, month, day.clamp(1, days_in_month(year, month)))
            .unwrap_or(Self(NaiveDate::MIN))
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clock time with minute precision, in 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeValue {
    hour: u32,
    minute: u32,
}

impl TimeValue {
    /// Creates a time if the hour is 0-23 and the minute is 0-59.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub(crate) fn new_unchecked(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Returns a copy with the hour replaced.
    pub fn with_hour(&self, hour: u32) -> Result<Self, CalendarError> {
        Self::new(hour, self.minute).ok_or(CalendarError::OutOfRange {
            field: "hour",
            value: i64::from(hour),
        })
    }

    /// Returns a copy with the minute replaced.
    pub fn with_minute(&self, minute: u32) -> Result<Self, CalendarError> {
        Self::new(self.hour, minute).ok_or(CalendarError::OutOfRange {
            field: "minute",
            value: i64::from(minute),
        })
    }

    /// Formats the time with a strftime-style pattern.
    pub fn format(&self, pattern: &str) -> Result<String, CalendarError> {
        render_pattern(self.as_naive().format(pattern), pattern)
    }

    /// Returns the time as a chrono value at zero seconds.
    pub fn as_naive(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for TimeValue {
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Source of the current date and time used to seed a picker.
pub trait Clock: Send + Sync {
    /// Returns today's date.
    fn today(&self) -> DateValue;

    /// Returns the current time of day.
    fn now(&self) -> TimeValue;
}

/// Clock reading the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DateValue {
        DateValue(Local::now().date_naive())
    }

    fn now(&self) -> TimeValue {
        TimeValue::from(Local::now().time())
    }
}

/// Clock that always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    date: DateValue,
    time: TimeValue,
}

impl FixedClock {
    /// Creates a clock pinned to `date` and `time`.
    pub fn new(date: DateValue, time: TimeValue) -> Self {
        Self { date, time }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> DateValue {
        self.date
    }

    fn now(&self) -> TimeValue {
        self.time
    }
}

fn shift_months(date: NaiveDate, backward: bool, months: u32) -> Option<NaiveDate> {
    if backward {
        date.checked_sub_months(Months::new(months))
    } else {
        date.checked_add_months(Months::new(months))
    }
}

/// Checks that `pattern` can format a [`DateValue`].
///
/// Unsupported specifiers and time-of-day specifiers are rejected.
pub fn validate_date_pattern(pattern: &str) -> Result<(), CalendarError> {
    reject_unsupported(pattern)?;
    DateValue(NaiveDate::default()).format(pattern).map(drop)
}

/// Checks that `pattern` can format a [`TimeValue`].
///
/// Unsupported specifiers and calendar specifiers are rejected.
pub fn validate_time_pattern(pattern: &str) -> Result<(), CalendarError> {
    reject_unsupported(pattern)?;
    TimeValue::new_unchecked(0, 0).format(pattern).map(drop)
}

fn reject_unsupported(pattern: &str) -> Result<(), CalendarError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(CalendarError::InvalidFormat(pattern.to_owned()));
    }
    Ok(())
}

fn render_pattern(formatted: impl fmt::Display, pattern: &str) -> Result<String, CalendarError> {
    let mut out = String::new();
    write!(out, "{formatted}").map_err(|_| CalendarError::InvalidFormat(pattern.to_owned()))?;
    Ok(out)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> DateValue {
        DateValue::new(year, month, day).expect("valid test date")
    }

    #[test]
    fn test_validate_patterns() {
        assert!(validate_date_pattern("%m/%d/%Y").is_ok());
        assert!(validate_time_pattern("%I:%M %p").is_ok());
        assert_eq!(
            validate_date_pattern("%Y-%"),
            Err(CalendarError::InvalidFormat("%Y-%".to_owned()))
        );
        assert_eq!(
            validate_date_pattern("%Y %H:%M"),
            Err(CalendarError::InvalidFormat("%Y %H:%M".to_owned()))
        );
        assert_eq!(
            validate_time_pattern("%H:%M %d"),
            Err(CalendarError::InvalidFormat("%H:%M %d".to_owned()))
        );
    }

    #[test]
    fn test_date_rejects_invalid_components() {
        assert!(DateValue::new(2023, 2, 29).is_none());
        assert!(DateValue::new(2024, 13, 1).is_none());
        assert!(DateValue::new(2024, 4, 31).is_none());
        assert!(DateValue::new(2024, 2, 29).is_some());
    }

    #[test]
    fn test_weekday_numbers() {
        // 2024-02-01 is a Thursday, 2024-03-03 a Sunday.
        assert_eq!(date(2024, 2, 1).weekday_number(), 4);
        assert_eq!(date(2024, 3, 3).weekday_number(), 7);
        assert_eq!(date(2024, 1, 29).weekday_number(), 1);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(date(2024, 2, 10).days_in_month(), 29);
        assert_eq!(date(2023, 2, 10).days_in_month(), 28);
        assert_eq!(date(1900, 2, 1).days_in_month(), 28);
        assert_eq!(date(2000, 2, 1).days_in_month(), 29);
        assert_eq!(date(2024, 4, 1).days_in_month(), 30);
        assert_eq!(date(2024, 12, 1).days_in_month(), 31);
    }

    #[test]
    fn test_with_field_clamps_day_for_year_and_month() {
        let leap_day = date(2024, 2, 29);
        assert_eq!(
            leap_day.with_field(DateField::Year, 2023).unwrap(),
            date(2023, 2, 28)
        );
        let end_of_january = date(2024, 1, 31);
        assert_eq!(
            end_of_january.with_field(DateField::Month, 4).unwrap(),
            date(2024, 4, 30)
        );
        assert!(end_of_january.with_field(DateField::Month, 0).is_err());
        assert!(end_of_january.with_field(DateField::Day, 32).is_err());
        assert_eq!(
            end_of_january.with_field(DateField::Day, 2).unwrap(),
            date(2024, 1, 2)
        );
    }

    #[test]
    fn test_add_field_carries_across_years() {
        assert_eq!(
            date(2024, 12, 15).add_field(DateField::Month, 1).unwrap(),
            date(2025, 1, 15)
        );
        assert_eq!(
            date(2024, 1, 15).add_field(DateField::Month, -1).unwrap(),
            date(2023, 12, 15)
        );
        assert_eq!(
            date(2024, 3, 31).add_field(DateField::Month, -1).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            date(2024, 3, 1).add_field(DateField::Day, -1).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            date(2024, 2, 29).add_field(DateField::Year, 1).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_updates_return_new_values() {
        let original = date(2024, 6, 10);
        let moved = original.add_field(DateField::Day, 5).unwrap();
        assert_eq!(original, date(2024, 6, 10));
        assert_eq!(moved, date(2024, 6, 15));
    }

    #[test]
    fn test_format_patterns() {
        assert_eq!(date(2024, 2, 9).format("%m/%d/%Y").unwrap(), "02/09/2024");
        assert_eq!(date(2024, 2, 9).format("%B").unwrap(), "February");
        assert!(date(2024, 2, 9).format("%Q").is_err());

        let time = TimeValue::new(0, 5).unwrap();
        assert_eq!(time.format("%I:%M %p").unwrap(), "12:05 AM");
        assert_eq!(TimeValue::new(13, 45).unwrap().format("%H:%M").unwrap(), "13:45");
    }

    #[test]
    fn test_time_value_bounds() {
        assert!(TimeValue::new(24, 0).is_none());
        assert!(TimeValue::new(23, 60).is_none());
        let time = TimeValue::new(23, 59).unwrap();
        assert!(time.with_hour(24).is_err());
        assert_eq!(time.with_minute(0).unwrap(), TimeValue::new(23, 0).unwrap());
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(date(2024, 5, 6), TimeValue::new(9, 30).unwrap());
        assert_eq!(clock.today(), date(2024, 5, 6));
        assert_eq!(clock.now().hour(), 9);
    }
}
