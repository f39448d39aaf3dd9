//! Display order of the weekday columns.
use std::str::FromStr;

use crate::error::PickerError;

const DAYS_PER_WEEK: usize = 7;

/// A permutation of the ISO weekday numbers 1 (Monday) to 7 (Sunday).
///
/// The first entry is the weekday that starts every calendar row and the last
/// entry the weekday that ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayOrder([u32; DAYS_PER_WEEK]);

impl WeekdayOrder {
    /// Weeks starting on Monday.
    pub const MONDAY_FIRST: WeekdayOrder = WeekdayOrder([1, 2, 3, 4, 5, 6, 7]);
    /// Weeks starting on Sunday.
    pub const SUNDAY_FIRST: WeekdayOrder = WeekdayOrder([7, 1, 2, 3, 4, 5, 6]);

    /// Validates and wraps a weekday order.
    ///
    /// The slice must contain exactly seven distinct numbers in 1-7.
    pub fn new(days: &[u32]) -> Result<Self, PickerError> {
        let days: [u32; DAYS_PER_WEEK] =
            days.try_into().map_err(|_| PickerError::InvalidWeekdayOrder {
                reason: format!("expected 7 entries, got {}", days.len()),
            })?;
        let mut seen = [false; DAYS_PER_WEEK];
        for &day in &days {
            if !(1..=7).contains(&day) {
                return Err(PickerError::InvalidWeekdayOrder {
                    reason: format!("weekday {day} is outside 1-7"),
                });
            }
            let slot = &mut seen[day as usize - 1];
            if *slot {
                return Err(PickerError::InvalidWeekdayOrder {
                    reason: format!("weekday {day} appears more than once"),
                });
            }
            *slot = true;
        }
        Ok(Self(days))
    }

    /// Returns the zero-based column of `weekday`, or `None` outside 1-7.
    pub fn position_of(&self, weekday: u32) -> Option<usize> {
        self.0.iter().position(|&day| day == weekday)
    }

    /// Returns the weekday that starts each row.
    pub fn first(&self) -> u32 {
        self.0[0]
    }

    /// Returns the weekday that ends each row.
    pub fn last(&self) -> u32 {
        self.0[DAYS_PER_WEEK - 1]
    }

    /// Returns the index of the last column.
    pub fn last_index(&self) -> usize {
        DAYS_PER_WEEK - 1
    }

    /// Returns the weekday numbers in display order.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Returns short weekday labels in display order.
    pub fn labels(&self) -> [&'static str; DAYS_PER_WEEK] {
        self.0.map(weekday_short_label)
    }
}

impl Default for WeekdayOrder {
    fn default() -> Self {
        Self::MONDAY_FIRST
    }
}

impl FromStr for WeekdayOrder {
    type Err = PickerError;

    /// Parses a comma separated list such as `7,1,2,3,4,5,6`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u32>()
                    .map_err(|_| PickerError::InvalidWeekdayOrder {
                        reason: format!("`{}` is not a weekday number", part.trim()),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&days)
    }
}

fn weekday_short_label(day: u32) -> &'static str {
    match day {
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        _ => "Sun",
    }
}
