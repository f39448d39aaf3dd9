//! Date stage: month grid with month and year pickers.
//!
//! ## Usage
//!
//! The coordinator owns a [`DateStage`] when the date picker is enabled and
//! routes [`DateAction`]s to it. The stage only reports back through a
//! [`DateIntent`] when the user confirms or moves on to the time stage.
use tracing::trace;

use crate::{
    calendar::{DateField, DateValue},
    error::PickerError,
    grid::{annotate_month_grid, build_month_cells, build_year_window},
    picker::Stage,
    render::{ButtonSpec, ControlButtons, ElementKey, Region, Surface, month_name},
    stepper::{Direction, TouchDrag, shift_year_rows},
    weekday::WeekdayOrder,
};

/// Pixels a touch must travel on the year grid before the rows scroll.
pub const YEAR_DRAG_THRESHOLD: f32 = 20.0;

/// Grid currently shown by the date stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateView {
    /// Days of the working month.
    #[default]
    DayGrid,
    /// The twelve months.
    MonthGrid,
    /// A 28-year window.
    YearGrid,
}

/// User actions handled by the date stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateAction {
    /// Show the previous month.
    PrevMonth,
    /// Show the next month.
    NextMonth,
    /// Open the month picker.
    OpenMonthPicker,
    /// Open the year picker.
    OpenYearPicker,
    /// Choose a day of the month grid.
    PickDay(DateValue),
    /// Choose a month in the month picker.
    PickMonth(u32),
    /// Choose a year in the year picker.
    PickYear(i32),
    /// Mouse wheel over the year grid, carrying the vertical delta.
    YearWheel(f32),
    /// Touch down on the year grid at the given page y.
    YearTouchStart(f32),
    /// Touch move on the year grid at the given page y.
    YearTouchMove(f32),
    /// Click on a mounted grid element.
    Click(ElementKey),
    /// Commit the selection (time stage disabled).
    Confirm,
    /// Continue to the time stage (time stage enabled).
    Next,
}

impl DateAction {
    /// Returns the action name used in errors.
    pub fn name(&self) -> &'static str {
        match self {
            DateAction::PrevMonth => "prev_month",
            DateAction::NextMonth => "next_month",
            DateAction::OpenMonthPicker => "open_month_picker",
            DateAction::OpenYearPicker => "open_year_picker",
            DateAction::PickDay(_) => "pick_day",
            DateAction::PickMonth(_) => "pick_month",
            DateAction::PickYear(_) => "pick_year",
            DateAction::YearWheel(_) => "year_wheel",
            DateAction::YearTouchStart(_) => "year_touch_start",
            DateAction::YearTouchMove(_) => "year_touch_move",
            DateAction::Click(_) => "click",
            DateAction::Confirm => "confirm",
            DateAction::Next => "next",
        }
    }
}

/// Result of a terminal date-stage action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateIntent {
    /// Commit the selection.
    Confirm,
    /// Hand over to the time stage.
    Next,
}

/// State of the date selection widget.
pub struct DateStage {
    working: DateValue,
    order: WeekdayOrder,
    view: DateView,
    year_row_shift: i32,
    drag: TouchDrag,
    time_stage_enabled: bool,
    visible: bool,
    surface: Surface,
}

impl DateStage {
    /// Creates a hidden date stage editing `working`.
    pub fn new(working: DateValue, order: WeekdayOrder, time_stage_enabled: bool) -> Self {
        let mut stage = Self {
            working,
            order,
            view: DateView::DayGrid,
            year_row_shift: 0,
            drag: TouchDrag::new(YEAR_DRAG_THRESHOLD),
            time_stage_enabled,
            visible: false,
            surface: Surface::new(),
        };
        stage.render();
        stage
    }

    /// Returns the working date.
    pub fn working_date(&self) -> DateValue {
        self.working
    }

    /// Replaces the working date and re-renders.
    pub fn set_working_date(&mut self, date: DateValue) {
        self.working = date;
        self.render();
    }

    /// Returns the grid currently shown.
    pub fn view(&self) -> DateView {
        self.view
    }

    /// Returns the weekday order used by the day grid.
    pub fn weekday_order(&self) -> &WeekdayOrder {
        &self.order
    }

    /// Returns the current year-row shift of the year grid.
    pub fn year_row_shift(&self) -> i32 {
        self.year_row_shift
    }

    /// Returns true while the stage is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns the mounted grid elements.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Returns the weekday title row in display order.
    pub fn weekday_labels(&self) -> [&'static str; 7] {
        self.order.labels()
    }

    /// Returns the month header text, e.g. `February`.
    pub fn month_label(&self) -> &'static str {
        month_name(self.working.month())
    }

    /// Returns the year header text.
    pub fn year_label(&self) -> String {
        self.working.year().to_string()
    }

    /// Returns which footer buttons are visible.
    pub fn controls(&self) -> ControlButtons {
        ControlButtons {
            cancel: true,
            back: false,
            confirm: !self.time_stage_enabled,
            next: self.time_stage_enabled,
        }
    }

    /// Shows the stage on its day grid.
    pub fn show(&mut self) {
        self.visible = true;
        self.view = DateView::DayGrid;
        self.drag.end();
        self.render();
    }

    /// Hides the stage.
    pub fn hide(&mut self) {
        self.visible = false;
        self.drag.end();
    }

    /// Applies a user action.
    ///
    /// Returns an intent for `Confirm` and `Next`. Actions that are not
    /// available in the current view are rejected without changing state.
    pub fn apply(&mut self, action: DateAction) -> Result<Option<DateIntent>, PickerError> {
        match action {
            DateAction::PrevMonth => self.shift_month(-1, "prev_month")?,
            DateAction::NextMonth => self.shift_month(1, "next_month")?,
            DateAction::OpenMonthPicker => {
                self.require(DateView::DayGrid, "open_month_picker")?;
                self.view = DateView::MonthGrid;
                self.render();
            }
            DateAction::OpenYearPicker => {
                self.require(DateView::DayGrid, "open_year_picker")?;
                self.view = DateView::YearGrid;
                self.year_row_shift = 0;
                self.drag.end();
                self.render();
            }
            DateAction::PickDay(date) => {
                self.require(DateView::DayGrid, "pick_day")?;
                self.set_working_date(date);
            }
            DateAction::PickMonth(month) => {
                self.require(DateView::MonthGrid, "pick_month")?;
                let working = self.working.with_field(DateField::Month, month as i32)?;
                self.view = DateView::DayGrid;
                self.drag.end();
                self.set_working_date(working);
            }
            DateAction::PickYear(year) => {
                self.require(DateView::YearGrid, "pick_year")?;
                let working = self.working.with_field(DateField::Year, year)?;
                self.view = DateView::DayGrid;
                self.drag.end();
                self.set_working_date(working);
            }
            DateAction::YearWheel(delta_y) => self.scroll_years(Direction::from_delta(delta_y)),
            DateAction::YearTouchStart(y) => {
                if self.view == DateView::YearGrid {
                    self.drag.start(y);
                }
            }
            DateAction::YearTouchMove(y) => {
                let step = self.drag.update(y);
                self.scroll_years(step);
            }
            DateAction::Click(key) => return self.click(key),
            DateAction::Confirm => {
                self.require(DateView::DayGrid, "confirm")?;
                if self.time_stage_enabled {
                    return Err(self.unavailable("confirm"));
                }
                return Ok(Some(DateIntent::Confirm));
            }
            DateAction::Next => {
                self.require(DateView::DayGrid, "next")?;
                if !self.time_stage_enabled {
                    return Err(self.unavailable("next"));
                }
                return Ok(Some(DateIntent::Next));
            }
        }
        Ok(None)
    }

    fn click(&mut self, key: ElementKey) -> Result<Option<DateIntent>, PickerError> {
        let Some(element) = self.surface.get(key) else {
            trace!(?key, "ignored click on a removed date element");
            return Ok(None);
        };
        let action = match *element.spec() {
            ButtonSpec::Day(cell) => DateAction::PickDay(cell.date),
            ButtonSpec::Month(cell) => DateAction::PickMonth(cell.month),
            ButtonSpec::Year(cell) => DateAction::PickYear(cell.year),
            ButtonSpec::Hour { .. } | ButtonSpec::Minute { .. } => return Ok(None),
        };
        self.apply(action)
    }

    fn shift_month(&mut self, delta: i32, action: &'static str) -> Result<(), PickerError> {
        self.require(DateView::DayGrid, action)?;
        let working = self.working.add_field(DateField::Month, delta)?;
        self.set_working_date(working);
        Ok(())
    }

    fn scroll_years(&mut self, step: Option<Direction>) {
        if self.view != DateView::YearGrid {
            trace!(view = ?self.view, "ignored year scroll outside the year grid");
            return;
        }
        let Some(direction) = step else {
            trace!("ignored year scroll without a step");
            return;
        };
        self.year_row_shift = shift_year_rows(self.year_row_shift, direction);
        self.render();
    }

    fn require(&self, view: DateView, action: &'static str) -> Result<(), PickerError> {
        if self.view == view {
            Ok(())
        } else {
            Err(self.unavailable(action))
        }
    }

    fn unavailable(&self, action: &'static str) -> PickerError {
        PickerError::ActionUnavailable {
            stage: Stage::Date,
            action,
        }
    }

    /// Tears every grid down and mounts the one for the current view.
    fn render(&mut self) {
        for region in [Region::DayButtons, Region::MonthButtons, Region::YearButtons] {
            self.surface.clear_region(region);
        }
        match self.view {
            DateView::DayGrid => {
                let cells: Vec<ButtonSpec> =
                    annotate_month_grid(self.working, Some(self.working), &self.order)
                        .into_iter()
                        .map(ButtonSpec::Day)
                        .collect();
                self.surface.rebuild(Region::DayButtons, &cells);
            }
            DateView::MonthGrid => {
                let cells = build_month_cells(self.working).map(ButtonSpec::Month);
                self.surface.rebuild(Region::MonthButtons, &cells);
            }
            DateView::YearGrid => {
                let cells: Vec<ButtonSpec> = build_year_window(self.working, self.year_row_shift)
                    .into_iter()
                    .map(ButtonSpec::Year)
                    .collect();
                self.surface.rebuild(Region::YearButtons, &cells);
            }
        }
        trace!(view = ?self.view, working = %self.working, "rendered date stage");
    }
}
