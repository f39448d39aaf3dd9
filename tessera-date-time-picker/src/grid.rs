//! Cell lists for the day, month, and year grids of the date stage.
//!
//! All builders are pure: the same inputs always produce the same cells.
use crate::{
    calendar::{DateField, DateValue},
    weekday::WeekdayOrder,
};

/// Number of year rows shown in the year grid.
pub const YEAR_ROWS: i32 = 7;
/// Number of years per row in the year grid.
pub const YEARS_PER_ROW: i32 = 4;
/// Row of the year window that holds the working year when unshifted.
pub const PINNED_YEAR_ROW: i32 = 2;

/// A day cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    /// Date painted in the cell.
    pub date: DateValue,
    /// True for padding days taken from the adjacent months.
    pub is_outside_current_month: bool,
    /// True for the cell matching the selected date.
    pub is_selected_day: bool,
}

/// A month cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCell {
    /// Month number (1-12).
    pub month: u32,
    /// True for the working month.
    pub is_selected: bool,
}

/// A year cell of the year grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCell {
    /// Calendar year.
    pub year: i32,
    /// True for the working year.
    pub is_selected: bool,
}

/// Returns the dates to paint for `reference`'s month, in chronological order.
///
/// The run starts on `order.first()` and ends on `order.last()`: days from the
/// previous month pad the first row and days from the next month pad the last
/// one. A month already aligned with the order gets no padding.
pub fn build_month_grid(reference: DateValue, order: &WeekdayOrder) -> Vec<DateValue> {
    let first = reference.first_of_month();
    let last = reference.last_of_month();
    // Every order holds all seven weekdays.
    let leading = order.position_of(first.weekday_number()).unwrap_or(0);
    let trailing = order.last_index()
        - order
            .position_of(last.weekday_number())
            .unwrap_or(order.last_index());

    let mut dates = Vec::with_capacity(leading + first.days_in_month() as usize + trailing);
    dates.extend(
        (1..=leading)
            .rev()
            .filter_map(|back| offset_days(first, -(back as i32))),
    );
    dates.extend(
        (1..=first.days_in_month())
            .filter_map(|day| DateValue::new(first.year(), first.month(), day)),
    );
    dates.extend((1..=trailing).filter_map(|ahead| offset_days(last, ahead as i32)));
    dates
}

/// Builds the month grid and flags padding days and the selected day.
///
/// Selection compares the full date, so the same month and day in another
/// year is not highlighted.
pub fn annotate_month_grid(
    reference: DateValue,
    selected: Option<DateValue>,
    order: &WeekdayOrder,
) -> Vec<GridDay> {
    build_month_grid(reference, order)
        .into_iter()
        .map(|date| GridDay {
            date,
            is_outside_current_month: !date.same_month(&reference),
            is_selected_day: selected == Some(date),
        })
        .collect()
}

/// Returns the twelve month cells with the working month selected.
pub fn build_month_cells(working: DateValue) -> [MonthCell; 12] {
    std::array::from_fn(|index| {
        let month = index as u32 + 1;
        MonthCell {
            month,
            is_selected: month == working.month(),
        }
    })
}

/// Returns the first year of the window shown for `working_year` at `shift`.
pub fn year_window_start(working_year: i32, shift: i32) -> i32 {
    working_year
        .saturating_sub(PINNED_YEAR_ROW * YEARS_PER_ROW)
        .saturating_add(shift.saturating_mul(YEARS_PER_ROW))
}

/// Returns the 28 year cells of the window selected by `shift`.
///
/// At shift 0 the working year sits in the first column of
/// [`PINNED_YEAR_ROW`]; each shift step scrolls one row of four years.
pub fn build_year_window(working: DateValue, shift: i32) -> Vec<YearCell> {
    let start = year_window_start(working.year(), shift);
    (0..YEAR_ROWS * YEARS_PER_ROW)
        .map(|offset| {
            let year = start.saturating_add(offset);
            YearCell {
                year,
                is_selected: year == working.year(),
            }
        })
        .collect()
}

fn offset_days(date: DateValue, delta: i32) -> Option<DateValue> {
    date.add_field(DateField::Day, delta).ok()
}
