//! Time stage: rolling hour and minute strips with an AM/PM toggle.
//!
//! The hour is edited in 12-hour display form. Stepping the hour never flips
//! the meridiem; only [`TimeAction::SelectMeridiem`] or a new value passed to
//! [`TimeStage::set_time`] changes it.
use tracing::trace;

use crate::{
    calendar::TimeValue,
    error::PickerError,
    picker::Stage,
    render::{ButtonSpec, ControlButtons, ElementKey, Region, Surface},
    stepper::{
        Direction, Meridiem, TouchDrag, from_24_hour, step_hour, step_minute, strip_values,
        to_24_hour,
    },
};

/// Pixels a touch must travel on the hour strip before it steps.
pub const HOUR_DRAG_THRESHOLD: f32 = 20.0;
/// Pixels a touch must travel on the minute strip before it steps.
pub const MINUTE_DRAG_THRESHOLD: f32 = 10.0;
/// Values shown on each side of the current one in a strip.
const STRIP_NEIGHBORS: u32 = 2;

/// One of the two rolling strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeTrack {
    /// The hour strip.
    Hour,
    /// The minute strip.
    Minute,
}

/// User actions handled by the time stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeAction {
    /// Chevron click on a strip.
    Step(TimeTrack, Direction),
    /// Mouse wheel over a strip, carrying the vertical delta.
    Wheel(TimeTrack, f32),
    /// Touch down anywhere on the stage at the given page y.
    TouchStart(f32),
    /// Touch move over a strip at the given page y.
    TouchMove(TimeTrack, f32),
    /// AM or PM button.
    SelectMeridiem(Meridiem),
    /// Click on a mounted strip element.
    Click(ElementKey),
    /// Return to the date stage.
    Back,
    /// Commit the selection.
    Confirm,
}

impl TimeAction {
    /// Returns the action name used in errors.
    pub fn name(&self) -> &'static str {
        match self {
            TimeAction::Step(..) => "step",
            TimeAction::Wheel(..) => "wheel",
            TimeAction::TouchStart(_) => "touch_start",
            TimeAction::TouchMove(..) => "touch_move",
            TimeAction::SelectMeridiem(_) => "select_meridiem",
            TimeAction::Click(_) => "click",
            TimeAction::Back => "back",
            TimeAction::Confirm => "confirm",
        }
    }
}

/// Result of a terminal time-stage action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeIntent {
    /// Hand control back to the date stage.
    Back,
    /// Commit the selection.
    Confirm,
}

/// State of the time selection widget.
pub struct TimeStage {
    display_hour: u32,
    minute: u32,
    meridiem: Meridiem,
    hour_interval: u32,
    minute_interval: u32,
    hour_drag: TouchDrag,
    minute_drag: TouchDrag,
    date_stage_enabled: bool,
    visible: bool,
    surface: Surface,
}

impl TimeStage {
    /// Creates a hidden time stage editing `time`.
    ///
    /// Intervals are the step sizes of the hour and minute tracks and must
    /// already be validated.
    pub fn new(
        time: TimeValue,
        hour_interval: u32,
        minute_interval: u32,
        date_stage_enabled: bool,
    ) -> Self {
        let (display_hour, meridiem) = from_24_hour(time.hour());
        let mut stage = Self {
            display_hour,
            minute: time.minute(),
            meridiem,
            hour_interval: hour_interval.max(1),
            minute_interval: minute_interval.max(1),
            hour_drag: TouchDrag::new(HOUR_DRAG_THRESHOLD),
            minute_drag: TouchDrag::new(MINUTE_DRAG_THRESHOLD),
            date_stage_enabled,
            visible: false,
            surface: Surface::new(),
        };
        stage.render();
        stage
    }

    /// Returns the working time in 24-hour form.
    pub fn time(&self) -> TimeValue {
        TimeValue::new_unchecked(to_24_hour(self.display_hour, self.meridiem), self.minute)
    }

    /// Replaces the working time, reconciling the meridiem with the new hour.
    pub fn set_time(&mut self, time: TimeValue) {
        let (display_hour, meridiem) = from_24_hour(time.hour());
        self.display_hour = display_hour;
        self.meridiem = meridiem;
        self.minute = time.minute();
        self.render();
    }

    /// Returns the hour shown in the strip (1-12).
    pub fn display_hour(&self) -> u32 {
        self.display_hour
    }

    /// Returns the working minute.
    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Returns the selected meridiem.
    pub fn meridiem(&self) -> Meridiem {
        self.meridiem
    }

    /// Returns true while the stage is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns the mounted strip elements.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Returns which footer buttons are visible.
    ///
    /// With a date stage the user goes back instead of canceling.
    pub fn controls(&self) -> ControlButtons {
        ControlButtons {
            cancel: !self.date_stage_enabled,
            back: self.date_stage_enabled,
            confirm: true,
            next: false,
        }
    }

    /// Shows the stage.
    pub fn show(&mut self) {
        self.visible = true;
        self.render();
    }

    /// Hides the stage.
    pub fn hide(&mut self) {
        self.visible = false;
        self.hour_drag.end();
        self.minute_drag.end();
    }

    /// Applies a user action.
    ///
    /// Gestures without effect (zero wheel delta, short drags, clicks on
    /// removed elements) are ignored.
    pub fn apply(&mut self, action: TimeAction) -> Result<Option<TimeIntent>, PickerError> {
        match action {
            TimeAction::Step(track, direction) => self.step(track, direction),
            TimeAction::Wheel(track, delta_y) => match Direction::from_delta(delta_y) {
                Some(direction) => self.step(track, direction),
                None => trace!(?track, "ignored zero wheel delta"),
            },
            TimeAction::TouchStart(y) => {
                self.hour_drag.start(y);
                self.minute_drag.start(y);
            }
            TimeAction::TouchMove(track, y) => {
                let drag = match track {
                    TimeTrack::Hour => &mut self.hour_drag,
                    TimeTrack::Minute => &mut self.minute_drag,
                };
                if let Some(direction) = drag.update(y) {
                    self.step(track, direction);
                }
            }
            TimeAction::SelectMeridiem(meridiem) => {
                if self.meridiem != meridiem {
                    self.meridiem = meridiem;
                    trace!(?meridiem, "selected meridiem");
                }
            }
            TimeAction::Click(key) => self.click(key),
            TimeAction::Back => {
                if !self.date_stage_enabled {
                    return Err(PickerError::StageNotEnabled(Stage::Date));
                }
                return Ok(Some(TimeIntent::Back));
            }
            TimeAction::Confirm => return Ok(Some(TimeIntent::Confirm)),
        }
        Ok(None)
    }

    fn step(&mut self, track: TimeTrack, direction: Direction) {
        match track {
            TimeTrack::Hour => {
                self.display_hour = step_hour(self.display_hour, self.hour_interval, direction);
            }
            TimeTrack::Minute => {
                self.minute = step_minute(self.minute, self.minute_interval, direction);
            }
        }
        self.render();
    }

    fn click(&mut self, key: ElementKey) {
        match self.surface.get(key).map(|element| *element.spec()) {
            Some(ButtonSpec::Hour { hour, .. }) => self.display_hour = hour,
            Some(ButtonSpec::Minute { minute, .. }) => self.minute = minute,
            _ => {
                trace!(?key, "ignored click on a removed time element");
                return;
            }
        }
        self.render();
    }

    fn render(&mut self) {
        // Coarse intervals repeat values, so only the middle cell is selected.
        let middle = STRIP_NEIGHBORS as usize;
        let hour_interval = self.hour_interval;
        let hours: Vec<ButtonSpec> = strip_values(self.display_hour, STRIP_NEIGHBORS, |hour, d| {
            step_hour(hour, hour_interval, d)
        })
        .into_iter()
        .enumerate()
        .map(|(index, hour)| ButtonSpec::Hour {
            hour,
            is_selected: index == middle,
        })
        .collect();
        let minute_interval = self.minute_interval;
        let minutes: Vec<ButtonSpec> = strip_values(self.minute, STRIP_NEIGHBORS, |minute, d| {
            step_minute(minute, minute_interval, d)
        })
        .into_iter()
        .enumerate()
        .map(|(index, minute)| ButtonSpec::Minute {
            minute,
            is_selected: index == middle,
        })
        .collect();
        self.surface.rebuild(Region::HourButtons, &hours);
        self.surface.rebuild(Region::MinuteButtons, &minutes);
        trace!(time = %self.time(), meridiem = ?self.meridiem, "rendered time stage");
    }
}
