//! Textual steps for driving a picker from the command line.
use std::str::FromStr;

use chrono::NaiveDate;
use tessera_date_time_picker::{
    DateAction, DateValue, Direction, Meridiem, PickerEvent, TimeAction, TimeTrack,
};

/// One scripted host event, e.g. `next-month`, `pick-year:2030` or `pm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step(pub PickerEvent);

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let event = match (name, arg) {
            ("focus", None) => PickerEvent::InputFocused,
            ("backdrop", None) => PickerEvent::BackdropClicked,
            ("cancel", None) => PickerEvent::Cancel,
            ("prev-month", None) => PickerEvent::Date(DateAction::PrevMonth),
            ("next-month", None) => PickerEvent::Date(DateAction::NextMonth),
            ("open-month", None) => PickerEvent::Date(DateAction::OpenMonthPicker),
            ("open-year", None) => PickerEvent::Date(DateAction::OpenYearPicker),
            ("pick-day", Some(arg)) => PickerEvent::Date(DateAction::PickDay(parse_date(arg)?)),
            ("pick-month", Some(arg)) => PickerEvent::Date(DateAction::PickMonth(parse(arg)?)),
            ("pick-year", Some(arg)) => PickerEvent::Date(DateAction::PickYear(parse(arg)?)),
            ("year-wheel", Some(arg)) => PickerEvent::Date(DateAction::YearWheel(parse(arg)?)),
            ("next", None) => PickerEvent::Date(DateAction::Next),
            ("confirm-date", None) => PickerEvent::Date(DateAction::Confirm),
            ("hour+", None) => time_step(TimeTrack::Hour, Direction::Forward),
            ("hour-", None) => time_step(TimeTrack::Hour, Direction::Backward),
            ("minute+", None) => time_step(TimeTrack::Minute, Direction::Forward),
            ("minute-", None) => time_step(TimeTrack::Minute, Direction::Backward),
            ("am", None) => PickerEvent::Time(TimeAction::SelectMeridiem(Meridiem::Am)),
            ("pm", None) => PickerEvent::Time(TimeAction::SelectMeridiem(Meridiem::Pm)),
            ("back", None) => PickerEvent::Time(TimeAction::Back),
            ("confirm-time", None) => PickerEvent::Time(TimeAction::Confirm),
            _ => return Err(format!("unknown step `{s}`")),
        };
        Ok(Step(event))
    }
}

fn time_step(track: TimeTrack, direction: Direction) -> PickerEvent {
    PickerEvent::Time(TimeAction::Step(track, direction))
}

fn parse<T: FromStr>(arg: &str) -> Result<T, String> {
    arg.parse().map_err(|_| format!("invalid argument `{arg}`"))
}

fn parse_date(arg: &str) -> Result<DateValue, String> {
    NaiveDate::parse_from_str(arg, "%Y-%m-%d")
        .map(DateValue::from)
        .map_err(|e| format!("invalid date `{arg}`: {e}"))
}
