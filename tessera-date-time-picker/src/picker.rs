//! The picker coordinator.
//!
//! [`DateTimePicker`] owns the configured stages, the shared modal backdrop,
//! the committed [`SelectionState`] and the notification hooks. Hosts feed it
//! [`PickerEvent`]s and paint the render models exposed by the stages.
//!
//! ## Usage
//!
//! Configure the picker, build it, then route host events through
//! [`DateTimePicker::dispatch`].
//!
//! ```
//! use tessera_date_time_picker::{DateAction, DateTimePicker, PickerEvent};
//!
//! # fn main() -> Result<(), tessera_date_time_picker::PickerError> {
//! let mut picker = DateTimePicker::default();
//! picker.with_date_picker(None)?.build()?;
//! picker.dispatch(PickerEvent::InputFocused)?;
//! picker.dispatch(PickerEvent::Date(DateAction::Confirm))?;
//! assert!(picker.selection().date.is_some());
//! # Ok(())
//! # }
//! ```
use std::{fmt, str::FromStr, sync::Arc};

use chrono::NaiveDateTime;
use derive_setters::Setters;
use tracing::debug;

use crate::{
    backdrop::{Backdrop, DocumentId},
    calendar::{
        Clock, DateValue, SystemClock, TimeValue, validate_date_pattern, validate_time_pattern,
    },
    date_stage::{DateAction, DateIntent, DateStage},
    error::PickerError,
    event::{
        BeforeConfirmed, BeforeDateNext, Cancelable, CancelableHooks, Confirmed, DateNext, Hooks,
    },
    time_stage::{TimeAction, TimeIntent, TimeStage},
    weekday::WeekdayOrder,
};

/// Largest accepted hour interval.
const MAX_HOUR_INTERVAL: u32 = 12;
/// Largest accepted minute interval.
const MAX_MINUTE_INTERVAL: u32 = 59;

/// One of the two cooperating selection stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Calendar date selection.
    Date,
    /// Hour and minute selection.
    Time,
}

impl Stage {
    /// Returns the stage identifier accepted by [`DateTimePicker::show_named`].
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Date => "date",
            Stage::Time => "time",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "date" => Ok(Stage::Date),
            "time" => Ok(Stage::Time),
            other => Err(PickerError::UnknownStage(other.to_owned())),
        }
    }
}

/// The committed value of a picker.
///
/// A field is `None` until a selection including that stage is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionState {
    /// Committed date.
    pub date: Option<DateValue>,
    /// Committed time of day.
    pub time: Option<TimeValue>,
}

impl SelectionState {
    /// Returns true when nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none()
    }

    /// Combines date and time when both are present.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        Some(self.date?.as_naive().and_time(self.time?.as_naive()))
    }
}

/// Picker configuration applied before [`DateTimePicker::build`].
#[derive(Debug, Clone, PartialEq, Eq, Setters)]
pub struct PickerConfig {
    /// Whether the date stage is constructed.
    pub date_picker_enabled: bool,
    /// Whether the time stage is constructed.
    pub time_picker_enabled: bool,
    /// Weekday shown in each column of the day grid.
    pub weekday_order: WeekdayOrder,
    /// Hours per step on the hour strip (1-12).
    pub hour_interval: u32,
    /// Minutes per step on the minute strip (1-59).
    pub minute_interval: u32,
    /// strftime pattern used for the date part of the input text.
    #[setters(into)]
    pub date_format: String,
    /// strftime pattern used for the time part of the input text.
    #[setters(into)]
    pub time_format: String,
    /// Text placed between the date and time parts.
    #[setters(into)]
    pub separator: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            date_picker_enabled: false,
            time_picker_enabled: false,
            weekday_order: WeekdayOrder::default(),
            hour_interval: 1,
            minute_interval: 1,
            date_format: "%m/%d/%Y".to_owned(),
            time_format: "%I:%M %p".to_owned(),
            separator: " ".to_owned(),
        }
    }
}

impl PickerConfig {
    /// Checks intervals and format patterns.
    pub fn validate(&self) -> Result<(), PickerError> {
        check_interval("hour", self.hour_interval, MAX_HOUR_INTERVAL)?;
        check_interval("minute", self.minute_interval, MAX_MINUTE_INTERVAL)?;
        validate_date_pattern(&self.date_format)?;
        validate_time_pattern(&self.time_format)?;
        Ok(())
    }
}

fn check_interval(track: &'static str, value: u32, max: u32) -> Result<(), PickerError> {
    if value == 0 || value > max {
        return Err(PickerError::InvalidInterval { track, value });
    }
    Ok(())
}

fn hidden_stage(stage: Stage, action: &'static str) -> PickerError {
    debug!(%stage, action, "rejected action on a hidden stage");
    PickerError::ActionUnavailable { stage, action }
}

/// Host events routed by [`DateTimePicker::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerEvent {
    /// The trigger input received focus.
    InputFocused,
    /// The modal backdrop was clicked.
    BackdropClicked,
    /// A cancel button was clicked.
    Cancel,
    /// An action on the date stage.
    Date(DateAction),
    /// An action on the time stage.
    Time(TimeAction),
}

struct Built {
    backdrop: Backdrop,
    date: Option<DateStage>,
    time: Option<TimeStage>,
}

/// A date and/or time picker attached to one trigger input.
pub struct DateTimePicker {
    document: DocumentId,
    config: PickerConfig,
    clock: Arc<dyn Clock>,
    built: Option<Built>,
    selection: SelectionState,
    input_text: String,
    before_confirmed: CancelableHooks<BeforeConfirmed>,
    confirmed: Hooks<Confirmed>,
    before_date_next: CancelableHooks<BeforeDateNext>,
    date_next: Hooks<DateNext>,
}

impl Default for DateTimePicker {
    fn default() -> Self {
        Self::new(DocumentId::MAIN)
    }
}

impl DateTimePicker {
    /// Creates an unconfigured picker living in `document`.
    pub fn new(document: DocumentId) -> Self {
        Self {
            document,
            config: PickerConfig::default(),
            clock: Arc::new(SystemClock),
            built: None,
            selection: SelectionState::default(),
            input_text: String::new(),
            before_confirmed: CancelableHooks::new(),
            confirmed: Hooks::new(),
            before_date_next: CancelableHooks::new(),
            date_next: Hooks::new(),
        }
    }

    fn configurable(&mut self) -> Result<&mut PickerConfig, PickerError> {
        if self.built.is_some() {
            return Err(PickerError::AlreadyBuilt);
        }
        Ok(&mut self.config)
    }

    /// Enables the date stage with an optional weekday order.
    pub fn with_date_picker(
        &mut self,
        order: Option<WeekdayOrder>,
    ) -> Result<&mut Self, PickerError> {
        let config = self.configurable()?;
        config.date_picker_enabled = true;
        if let Some(order) = order {
            config.weekday_order = order;
        }
        Ok(self)
    }

    /// Enables the time stage with optional hour and minute intervals.
    pub fn with_time_picker(
        &mut self,
        hour_interval: Option<u32>,
        minute_interval: Option<u32>,
    ) -> Result<&mut Self, PickerError> {
        let config = self.configurable()?;
        let hour_interval = hour_interval.unwrap_or(config.hour_interval);
        let minute_interval = minute_interval.unwrap_or(config.minute_interval);
        check_interval("hour", hour_interval, MAX_HOUR_INTERVAL)?;
        check_interval("minute", minute_interval, MAX_MINUTE_INTERVAL)?;
        config.time_picker_enabled = true;
        config.hour_interval = hour_interval;
        config.minute_interval = minute_interval;
        Ok(self)
    }

    /// Sets the strftime pattern for the date part of the input text.
    pub fn with_date_format(&mut self, pattern: impl Into<String>) -> Result<&mut Self, PickerError> {
        let pattern = pattern.into();
        let config = self.configurable()?;
        validate_date_pattern(&pattern)?;
        config.date_format = pattern;
        Ok(self)
    }

    /// Sets the strftime pattern for the time part of the input text.
    pub fn with_time_format(&mut self, pattern: impl Into<String>) -> Result<&mut Self, PickerError> {
        let pattern = pattern.into();
        let config = self.configurable()?;
        validate_time_pattern(&pattern)?;
        config.time_format = pattern;
        Ok(self)
    }

    /// Replaces the whole configuration.
    pub fn with_config(&mut self, config: PickerConfig) -> Result<&mut Self, PickerError> {
        let current = self.configurable()?;
        config.validate()?;
        *current = config;
        Ok(self)
    }

    /// Replaces the clock used to seed the stages.
    pub fn with_clock(&mut self, clock: Arc<dyn Clock>) -> Result<&mut Self, PickerError> {
        self.configurable()?;
        self.clock = clock;
        Ok(self)
    }

    /// Constructs the enabled stages and acquires the document's backdrop.
    pub fn build(&mut self) -> Result<&mut Self, PickerError> {
        if self.built.is_some() {
            return Err(PickerError::AlreadyBuilt);
        }
        let config = &self.config;
        if !config.date_picker_enabled && !config.time_picker_enabled {
            return Err(PickerError::NoStagesEnabled);
        }
        let date = config.date_picker_enabled.then(|| {
            DateStage::new(
                self.clock.today(),
                config.weekday_order,
                config.time_picker_enabled,
            )
        });
        let time = config.time_picker_enabled.then(|| {
            TimeStage::new(
                self.clock.now(),
                config.hour_interval,
                config.minute_interval,
                config.date_picker_enabled,
            )
        });
        let backdrop = Backdrop::acquire(self.document);
        debug!(
            document = ?self.document,
            date = config.date_picker_enabled,
            time = config.time_picker_enabled,
            "built date/time picker"
        );
        self.built = Some(Built {
            backdrop,
            date,
            time,
        });
        Ok(self)
    }

    /// Returns true once [`DateTimePicker::build`] succeeded.
    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    fn built(&self) -> Result<&Built, PickerError> {
        self.built.as_ref().ok_or(PickerError::NotBuilt)
    }

    fn built_mut(&mut self) -> Result<&mut Built, PickerError> {
        self.built.as_mut().ok_or(PickerError::NotBuilt)
    }

    /// Shows a stage and the backdrop.
    ///
    /// `None` shows the first enabled stage, date before time. Asking for a
    /// stage that was not enabled fails without changing visibility.
    pub fn show(&mut self, stage: Option<Stage>) -> Result<(), PickerError> {
        let built = self.built_mut()?;
        let target = match stage {
            Some(stage) => stage,
            None if built.date.is_some() => Stage::Date,
            None => Stage::Time,
        };
        match target {
            Stage::Date => {
                let date = built
                    .date
                    .as_mut()
                    .ok_or(PickerError::StageNotEnabled(Stage::Date))?;
                date.show();
                if let Some(time) = built.time.as_mut() {
                    time.hide();
                }
            }
            Stage::Time => {
                let time = built
                    .time
                    .as_mut()
                    .ok_or(PickerError::StageNotEnabled(Stage::Time))?;
                time.show();
                if let Some(date) = built.date.as_mut() {
                    date.hide();
                }
            }
        }
        built.backdrop.show();
        debug!(stage = %target, "showing picker stage");
        Ok(())
    }

    /// Shows the stage named `name` (`"date"` or `"time"`).
    pub fn show_named(&mut self, name: &str) -> Result<(), PickerError> {
        let stage = name.parse()?;
        self.show(Some(stage))
    }

    /// Opens the modal in response to the trigger input gaining focus.
    pub fn focus_input(&mut self) -> Result<(), PickerError> {
        self.show(None)
    }

    /// Hides the backdrop and every stage. Calling it again does nothing.
    pub fn hide_all(&mut self) {
        let Some(built) = self.built.as_mut() else {
            return;
        };
        built.backdrop.hide();
        if let Some(date) = built.date.as_mut() {
            date.hide();
        }
        if let Some(time) = built.time.as_mut() {
            time.hide();
        }
    }

    /// Returns the stage currently shown, if any.
    pub fn visible_stage(&self) -> Option<Stage> {
        let built = self.built.as_ref()?;
        if built.date.as_ref().is_some_and(DateStage::is_visible) {
            Some(Stage::Date)
        } else if built.time.as_ref().is_some_and(TimeStage::is_visible) {
            Some(Stage::Time)
        } else {
            None
        }
    }

    /// Commits the working values of the enabled stages.
    ///
    /// Returns `Ok(false)` when a before-confirmed handler canceled the
    /// commit; the selection, the input text and the modal stay as they were.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn confirm_selection(&mut self) -> Result<bool, PickerError> {
        let built = self.built()?;
        let mut proposed = self.selection;
        if let Some(date) = &built.date {
            proposed.date = Some(date.working_date());
        }
        if let Some(time) = &built.time {
            proposed.time = Some(time.time());
        }
        let text = self.format_selection(&proposed)?;

        let record = self.before_confirmed.fire(BeforeConfirmed {
            selection: proposed,
        });
        if record.is_canceled() {
            debug!("confirm canceled by a before-confirmed handler");
            return Ok(false);
        }

        self.selection = proposed;
        self.input_text = text;
        debug!(input = %self.input_text, "committed selection");
        self.confirmed.fire(&Confirmed {
            selection: proposed,
        });
        self.hide_all();
        Ok(true)
    }

    fn format_selection(&self, selection: &SelectionState) -> Result<String, PickerError> {
        let parts = [
            selection
                .date
                .map(|date| date.format(&self.config.date_format))
                .transpose()?,
            selection
                .time
                .map(|time| time.format(&self.config.time_format))
                .transpose()?,
        ];
        Ok(parts
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(self.config.separator.as_str()))
    }

    fn advance_to_time(&mut self) -> Result<(), PickerError> {
        let built = self.built()?;
        let date = built
            .date
            .as_ref()
            .ok_or(PickerError::StageNotEnabled(Stage::Date))?
            .working_date();
        if built.time.is_none() {
            return Err(PickerError::StageNotEnabled(Stage::Time));
        }
        let record: Cancelable<BeforeDateNext> = self.before_date_next.fire(BeforeDateNext { date });
        if record.is_canceled() {
            debug!(%date, "date-next canceled by a handler");
            return Ok(());
        }
        self.show(Some(Stage::Time))?;
        self.date_next.fire(&DateNext { date });
        Ok(())
    }

    /// Routes a host event to the coordinator or the stage it targets.
    ///
    /// Stage events are only accepted while their stage is shown.
    pub fn dispatch(&mut self, event: PickerEvent) -> Result<(), PickerError> {
        match event {
            PickerEvent::InputFocused => self.focus_input(),
            PickerEvent::BackdropClicked | PickerEvent::Cancel => {
                self.built()?;
                debug!(?event, "closing picker without committing");
                self.hide_all();
                Ok(())
            }
            PickerEvent::Date(action) => {
                let stage = self
                    .built_mut()?
                    .date
                    .as_mut()
                    .ok_or(PickerError::StageNotEnabled(Stage::Date))?;
                if !stage.is_visible() {
                    return Err(hidden_stage(Stage::Date, action.name()));
                }
                match stage.apply(action)? {
                    Some(DateIntent::Confirm) => self.confirm_selection().map(|_| ()),
                    Some(DateIntent::Next) => self.advance_to_time(),
                    None => Ok(()),
                }
            }
            PickerEvent::Time(action) => {
                let stage = self
                    .built_mut()?
                    .time
                    .as_mut()
                    .ok_or(PickerError::StageNotEnabled(Stage::Time))?;
                if !stage.is_visible() {
                    return Err(hidden_stage(Stage::Time, action.name()));
                }
                match stage.apply(action)? {
                    Some(TimeIntent::Confirm) => self.confirm_selection().map(|_| ()),
                    Some(TimeIntent::Back) => self.show(Some(Stage::Date)),
                    None => Ok(()),
                }
            }
        }
    }

    /// Registers a cancelable handler run before every commit.
    pub fn on_before_confirmed<F>(&mut self, handler: F)
    where
        F: Fn(&mut Cancelable<BeforeConfirmed>) + Send + Sync + 'static,
    {
        self.before_confirmed.register(handler);
    }

    /// Registers a handler run after every commit.
    pub fn on_confirmed<F>(&mut self, handler: F)
    where
        F: Fn(&Confirmed) + Send + Sync + 'static,
    {
        self.confirmed.register(handler);
    }

    /// Registers a cancelable handler run before the date stage hands over.
    pub fn on_before_date_next<F>(&mut self, handler: F)
    where
        F: Fn(&mut Cancelable<BeforeDateNext>) + Send + Sync + 'static,
    {
        self.before_date_next.register(handler);
    }

    /// Registers a handler run after the time stage was shown.
    pub fn on_date_next<F>(&mut self, handler: F)
    where
        F: Fn(&DateNext) + Send + Sync + 'static,
    {
        self.date_next.register(handler);
    }

    /// Returns the committed selection.
    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    /// Returns the text to show in the trigger input.
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// Returns the picker configuration.
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Returns the document the picker lives in.
    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Returns the date stage, if built and enabled.
    pub fn date_stage(&self) -> Option<&DateStage> {
        self.built.as_ref()?.date.as_ref()
    }

    /// Returns the time stage, if built and enabled.
    pub fn time_stage(&self) -> Option<&TimeStage> {
        self.built.as_ref()?.time.as_ref()
    }

    /// Returns the backdrop handle once built.
    pub fn backdrop(&self) -> Option<Backdrop> {
        self.built.as_ref().map(|built| built.backdrop)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::{
        calendar::FixedClock,
        error::CalendarError,
        stepper::{Direction, Meridiem},
        time_stage::TimeTrack,
    };

    fn date(year: i32, month: u32, day: u32) -> DateValue {
        DateValue::new(year, month, day).unwrap()
    }

    fn time(hour: u32, minute: u32) -> TimeValue {
        TimeValue::new(hour, minute).unwrap()
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(date(2024, 2, 10), time(9, 5)))
    }

    fn picker(date_enabled: bool, time_enabled: bool) -> DateTimePicker {
        let mut picker = DateTimePicker::new(DocumentId::unique());
        picker.with_clock(clock()).unwrap();
        if date_enabled {
            picker.with_date_picker(None).unwrap();
        }
        if time_enabled {
            picker.with_time_picker(None, None).unwrap();
        }
        picker.build().unwrap();
        picker
    }

    #[test]
    fn test_stage_names() {
        assert_eq!("date".parse::<Stage>(), Ok(Stage::Date));
        assert_eq!("time".parse::<Stage>(), Ok(Stage::Time));
        assert_eq!(
            "month".parse::<Stage>(),
            Err(PickerError::UnknownStage("month".to_owned()))
        );
        assert_eq!(Stage::Time.to_string(), "time");
    }

    #[test]
    fn test_build_requires_a_stage() {
        let mut picker = DateTimePicker::new(DocumentId::unique());
        assert!(matches!(picker.build(), Err(PickerError::NoStagesEnabled)));
        assert!(!picker.is_built());
        assert_eq!(picker.show(None), Err(PickerError::NotBuilt));
    }

    #[test]
    fn test_configuration_is_frozen_after_build() {
        let mut picker = picker(true, false);
        assert!(matches!(
            picker.with_time_picker(None, None),
            Err(PickerError::AlreadyBuilt)
        ));
        assert!(matches!(
            picker.with_date_format("%Y"),
            Err(PickerError::AlreadyBuilt)
        ));
        assert!(matches!(picker.build(), Err(PickerError::AlreadyBuilt)));
        assert!(!picker.config().time_picker_enabled);
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let mut picker = DateTimePicker::new(DocumentId::unique());
        assert!(matches!(
            picker.with_time_picker(Some(0), None),
            Err(PickerError::InvalidInterval { track: "hour", value: 0 })
        ));
        assert!(matches!(
            picker.with_time_picker(None, Some(60)),
            Err(PickerError::InvalidInterval { track: "minute", value: 60 })
        ));
        assert!(!picker.config().time_picker_enabled);
        assert!(matches!(
            picker.with_date_format("%Y-%"),
            Err(PickerError::Calendar(_))
        ));
        assert_eq!(picker.config().date_format, "%m/%d/%Y");

        let config = PickerConfig::default()
            .date_picker_enabled(true)
            .hour_interval(13);
        assert!(matches!(
            picker.with_config(config),
            Err(PickerError::InvalidInterval { track: "hour", value: 13 })
        ));
    }

    #[test]
    fn test_with_config_applies_setters() {
        let mut picker = DateTimePicker::new(DocumentId::unique());
        let config = PickerConfig::default()
            .date_picker_enabled(true)
            .weekday_order(WeekdayOrder::SUNDAY_FIRST)
            .date_format("%Y-%m-%d");
        picker.with_config(config).unwrap().with_clock(clock()).unwrap();
        picker.build().unwrap();
        assert_eq!(
            picker.date_stage().unwrap().weekday_order(),
            &WeekdayOrder::SUNDAY_FIRST
        );
        picker.focus_input().unwrap();
        picker.dispatch(PickerEvent::Date(DateAction::Confirm)).unwrap();
        assert_eq!(picker.input_text(), "2024-02-10");
    }

    #[test]
    fn test_time_only_picker_rejects_date_stage() {
        let mut picker = picker(false, true);
        assert_eq!(
            picker.show(Some(Stage::Date)),
            Err(PickerError::StageNotEnabled(Stage::Date))
        );
        assert_eq!(picker.visible_stage(), None);
        assert!(!picker.backdrop().unwrap().is_shown());

        picker.focus_input().unwrap();
        assert_eq!(picker.visible_stage(), Some(Stage::Time));
        assert_eq!(
            picker.show_named("date"),
            Err(PickerError::StageNotEnabled(Stage::Date))
        );
        assert_eq!(picker.visible_stage(), Some(Stage::Time));
        assert_eq!(
            picker.dispatch(PickerEvent::Time(TimeAction::Back)),
            Err(PickerError::StageNotEnabled(Stage::Date))
        );
    }

    #[test]
    fn test_focus_shows_date_before_time() {
        let mut picker = picker(true, true);
        picker.dispatch(PickerEvent::InputFocused).unwrap();
        assert_eq!(picker.visible_stage(), Some(Stage::Date));
        assert!(picker.backdrop().unwrap().is_shown());
        picker.show_named("time").unwrap();
        assert_eq!(picker.visible_stage(), Some(Stage::Time));
        assert!(!picker.date_stage().unwrap().is_visible());
    }

    #[test]
    fn test_full_date_and_time_flow() {
        let mut picker = picker(true, true);
        let confirmed = Arc::new(Mutex::new(Vec::new()));
        let sink = confirmed.clone();
        picker.on_confirmed(move |event| sink.lock().push(event.selection));
        let handed_over = Arc::new(Mutex::new(Vec::new()));
        let sink = handed_over.clone();
        picker.on_date_next(move |event| sink.lock().push(event.date));

        picker.dispatch(PickerEvent::InputFocused).unwrap();
        picker.dispatch(PickerEvent::Date(DateAction::NextMonth)).unwrap();
        assert!(matches!(
            picker.dispatch(PickerEvent::Date(DateAction::Confirm)),
            Err(PickerError::ActionUnavailable { stage: Stage::Date, .. })
        ));
        picker.dispatch(PickerEvent::Date(DateAction::Next)).unwrap();
        assert_eq!(picker.visible_stage(), Some(Stage::Time));
        assert_eq!(*handed_over.lock(), vec![date(2024, 3, 10)]);

        picker
            .dispatch(PickerEvent::Time(TimeAction::SelectMeridiem(Meridiem::Pm)))
            .unwrap();
        picker
            .dispatch(PickerEvent::Time(TimeAction::Step(TimeTrack::Minute, Direction::Forward)))
            .unwrap();
        picker.dispatch(PickerEvent::Time(TimeAction::Confirm)).unwrap();

        let expected = SelectionState {
            date: Some(date(2024, 3, 10)),
            time: Some(time(21, 6)),
        };
        assert_eq!(picker.selection(), expected);
        assert_eq!(*confirmed.lock(), vec![expected]);
        assert_eq!(picker.input_text(), "03/10/2024 09:06 PM");
        assert_eq!(picker.visible_stage(), None);
        assert!(!picker.backdrop().unwrap().is_shown());
        assert_eq!(
            expected.to_naive_datetime().unwrap().to_string(),
            "2024-03-10 21:06:00"
        );
    }

    #[test]
    fn test_canceled_confirm_changes_nothing() {
        let mut picker = picker(true, false);
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        picker.on_before_confirmed(move |record| {
            *sink.lock() = Some(record.selection);
            record.cancel();
        });
        let confirmed = Arc::new(AtomicUsize::new(0));
        let counter = confirmed.clone();
        picker.on_confirmed(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        picker.focus_input().unwrap();
        picker.dispatch(PickerEvent::Date(DateAction::Confirm)).unwrap();

        assert_eq!(
            *seen.lock(),
            Some(SelectionState {
                date: Some(date(2024, 2, 10)),
                time: None,
            })
        );
        assert!(picker.selection().is_empty());
        assert_eq!(picker.input_text(), "");
        assert_eq!(confirmed.load(Ordering::SeqCst), 0);
        assert_eq!(picker.visible_stage(), Some(Stage::Date));
        assert!(picker.backdrop().unwrap().is_shown());
    }

    #[test]
    fn test_date_only_commit() {
        let mut picker = picker(true, false);
        picker.focus_input().unwrap();
        assert!(picker.confirm_selection().unwrap());
        assert_eq!(picker.input_text(), "02/10/2024");
        assert_eq!(picker.selection().time, None);
        assert_eq!(picker.selection().to_naive_datetime(), None);
    }

    #[test]
    fn test_canceled_date_next_keeps_date_stage() {
        let mut picker = picker(true, true);
        picker.on_before_date_next(|record| record.cancel());
        let handed_over = Arc::new(AtomicUsize::new(0));
        let counter = handed_over.clone();
        picker.on_date_next(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        picker.focus_input().unwrap();
        picker.dispatch(PickerEvent::Date(DateAction::Next)).unwrap();
        assert_eq!(picker.visible_stage(), Some(Stage::Date));
        assert_eq!(handed_over.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_back_returns_to_date_stage() {
        let mut picker = picker(true, true);
        picker.focus_input().unwrap();
        picker.dispatch(PickerEvent::Date(DateAction::Next)).unwrap();
        picker.dispatch(PickerEvent::Time(TimeAction::Back)).unwrap();
        assert_eq!(picker.visible_stage(), Some(Stage::Date));
        assert!(picker.backdrop().unwrap().is_shown());
    }

    #[test]
    fn test_hidden_date_stage_cannot_confirm() {
        let mut picker = picker(true, false);
        assert_eq!(
            picker.dispatch(PickerEvent::Date(DateAction::Confirm)),
            Err(PickerError::ActionUnavailable {
                stage: Stage::Date,
                action: "confirm",
            })
        );
        assert!(picker.selection().is_empty());
        assert_eq!(picker.input_text(), "");
        assert_eq!(picker.visible_stage(), None);
    }

    #[test]
    fn test_hidden_time_stage_cannot_confirm() {
        let mut picker = picker(true, true);
        let asked = Arc::new(AtomicUsize::new(0));
        let counter = asked.clone();
        picker.on_before_date_next(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        picker.focus_input().unwrap();
        assert_eq!(
            picker.dispatch(PickerEvent::Time(TimeAction::Confirm)),
            Err(PickerError::ActionUnavailable {
                stage: Stage::Time,
                action: "confirm",
            })
        );
        assert!(matches!(
            picker.dispatch(PickerEvent::Time(TimeAction::Step(
                TimeTrack::Hour,
                Direction::Forward
            ))),
            Err(PickerError::ActionUnavailable { stage: Stage::Time, action: "step" })
        ));
        assert!(picker.selection().is_empty());
        assert_eq!(picker.input_text(), "");
        assert_eq!(asked.load(Ordering::SeqCst), 0);
        assert_eq!(picker.visible_stage(), Some(Stage::Date));
        assert_eq!(picker.time_stage().unwrap().time(), time(9, 5));

        picker.dispatch(PickerEvent::Date(DateAction::Next)).unwrap();
        assert!(matches!(
            picker.dispatch(PickerEvent::Date(DateAction::Next)),
            Err(PickerError::ActionUnavailable { stage: Stage::Date, action: "next" })
        ));
        assert_eq!(asked.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_formats_must_match_their_stage() {
        let mut picker = DateTimePicker::new(DocumentId::unique());
        assert!(matches!(
            picker.with_date_format("%Y %H:%M"),
            Err(PickerError::Calendar(CalendarError::InvalidFormat(_)))
        ));
        assert_eq!(picker.config().date_format, "%m/%d/%Y");
        assert!(matches!(
            picker.with_time_format("%d %H"),
            Err(PickerError::Calendar(CalendarError::InvalidFormat(_)))
        ));
        assert_eq!(picker.config().time_format, "%I:%M %p");

        let config = PickerConfig::default()
            .date_picker_enabled(true)
            .date_format("%Y %H");
        assert!(matches!(
            picker.with_config(config),
            Err(PickerError::Calendar(CalendarError::InvalidFormat(_)))
        ));
        assert!(!picker.config().date_picker_enabled);
    }

    #[test]
    fn test_backdrop_click_closes_without_commit() {
        let mut picker = picker(true, true);
        picker.focus_input().unwrap();
        picker.dispatch(PickerEvent::BackdropClicked).unwrap();
        assert_eq!(picker.visible_stage(), None);
        assert!(!picker.backdrop().unwrap().is_shown());
        assert!(picker.selection().is_empty());

        picker.hide_all();
        picker.dispatch(PickerEvent::Cancel).unwrap();
        assert_eq!(picker.visible_stage(), None);
    }

    #[test]
    fn test_pickers_share_the_document_backdrop() {
        let document = DocumentId::unique();
        let mut first = DateTimePicker::new(document);
        first.with_date_picker(None).unwrap().build().unwrap();
        let mut second = DateTimePicker::new(document);
        second.with_time_picker(Some(2), Some(15)).unwrap().build().unwrap();
        assert_eq!(first.backdrop(), second.backdrop());

        first.focus_input().unwrap();
        assert!(second.backdrop().unwrap().is_shown());
        second.hide_all();
        assert!(!first.backdrop().unwrap().is_shown());
    }
}
