//! Wraparound stepping for the hour, minute, and year-row tracks.
//!
//! Everything here is a pure computation; callers re-render afterwards.

/// Hours shown on a 12-hour dial.
const HOURS_PER_DIAL: i64 = 12;
/// Minutes in an hour.
const MINUTES_PER_HOUR: i64 = 60;

/// Direction of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward smaller values (-1).
    Backward,
    /// Toward larger values (+1).
    Forward,
}

impl Direction {
    /// Maps the sign of a wheel or drag delta to a direction.
    ///
    /// Returns `None` for a zero delta.
    pub fn from_delta(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(Direction::Forward)
        } else if delta < 0.0 {
            Some(Direction::Backward)
        } else {
            None
        }
    }

    /// Returns -1 or +1.
    pub fn signum(self) -> i32 {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }
}

/// Indicates whether a 12-hour value is before or after noon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    /// Ante meridiem (before noon).
    Am,
    /// Post meridiem (after noon).
    Pm,
}

impl Meridiem {
    /// Returns the button label.
    pub fn label(self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }
}

/// Steps a 12-hour display value (1-12) by `interval` in `direction`.
///
/// 12 steps forward to 1 and 1 steps backward to 12. The meridiem is not
/// involved.
pub fn step_hour(display_hour: u32, interval: u32, direction: Direction) -> u32 {
    let zero_based = i64::from(display_hour.clamp(1, 12)) - 1;
    let delta = i64::from(interval) * i64::from(direction.signum());
    ((zero_based + delta).rem_euclid(HOURS_PER_DIAL) + 1) as u32
}

/// Steps a minute (0-59) by `interval` in `direction`, wrapping modulo 60.
pub fn step_minute(minute: u32, interval: u32, direction: Direction) -> u32 {
    let delta = i64::from(interval) * i64::from(direction.signum());
    (i64::from(minute.min(59)) + delta).rem_euclid(MINUTES_PER_HOUR) as u32
}

/// Steps the year-row shift by one row. The shift is unbounded.
pub fn shift_year_rows(shift: i32, direction: Direction) -> i32 {
    shift.saturating_add(direction.signum())
}

/// Converts a 12-hour display value and meridiem to a 24-hour hour.
///
/// 12 AM is midnight (0) and 12 PM is noon (12).
pub fn to_24_hour(display_hour: u32, meridiem: Meridiem) -> u32 {
    let hour = display_hour.clamp(1, 12) % 12;
    match meridiem {
        Meridiem::Am => hour,
        Meridiem::Pm => hour + 12,
    }
}

/// Splits a 24-hour hour into a 12-hour display value and meridiem.
///
/// Hours below 12 are AM.
pub fn from_24_hour(hour: u32) -> (u32, Meridiem) {
    let hour = hour.min(23);
    let meridiem = if hour < 12 { Meridiem::Am } else { Meridiem::Pm };
    let display = hour % 12;
    (if display == 0 { 12 } else { display }, meridiem)
}

/// Converts vertical touch movement into discrete steps.
///
/// Displacement accumulates from the drag origin; once it reaches the
/// threshold one step fires and the origin moves to the current position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchDrag {
    threshold: f32,
    origin: Option<f32>,
}

impl TouchDrag {
    /// Creates a tracker that steps every `threshold` pixels.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            origin: None,
        }
    }

    /// Records where the finger touched down.
    pub fn start(&mut self, y: f32) {
        self.origin = Some(y);
    }

    /// Forgets the current drag.
    pub fn end(&mut self) {
        self.origin = None;
    }

    /// Feeds a move event and returns the step to apply, if any.
    ///
    /// Moving up (a smaller `y`) steps forward. Moves without a preceding
    /// [`TouchDrag::start`] are ignored.
    pub fn update(&mut self, y: f32) -> Option<Direction> {
        let origin = self.origin?;
        let displacement = origin - y;
        if displacement.abs() < self.threshold {
            return None;
        }
        self.origin = Some(y);
        Direction::from_delta(displacement)
    }
}

/// Returns the values `count` steps before and after `current` on a track.
///
/// The result holds `2 * count + 1` values in display order, with `current`
/// in the middle.
pub(crate) fn strip_values(
    current: u32,
    count: u32,
    step: impl Fn(u32, Direction) -> u32,
) -> Vec<u32> {
    let mut before = Vec::with_capacity(count as usize);
    let mut value = current;
    for _ in 0..count {
        value = step(value, Direction::Backward);
        before.push(value);
    }
    before.reverse();

    let mut values = before;
    values.push(current);
    let mut value = current;
    for _ in 0..count {
        value = step(value, Direction::Forward);
        values.push(value);
    }
    values
}
