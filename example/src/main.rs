mod script;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use clap::Parser;
use tessera_date_time_picker::{
    Clock, DateTimePicker, DateValue, FixedClock, PickerEvent, Region, Stage, SystemClock,
    TimeValue, WeekdayOrder,
};
use tracing::info;

use crate::script::Step;

/// Drives a headless date/time picker through a scripted session.
#[derive(Parser)]
#[command(name = "example")]
#[command(version, about = "Scripted date/time picker session", long_about = None)]
struct Cli {
    /// Weekday order of the day grid, 1 = Monday ... 7 = Sunday
    #[arg(long, default_value = "1,2,3,4,5,6,7")]
    weekday_order: WeekdayOrder,
    /// Disable the date stage
    #[arg(long)]
    no_date: bool,
    /// Disable the time stage
    #[arg(long)]
    no_time: bool,
    /// Hours per step on the hour strip
    #[arg(long, default_value_t = 1)]
    hour_interval: u32,
    /// Minutes per step on the minute strip
    #[arg(long, default_value_t = 1)]
    minute_interval: u32,
    /// Date to start from (YYYY-MM-DD) instead of today
    #[arg(long)]
    date: Option<chrono::NaiveDate>,
    /// Time to start from (HH:MM) instead of now
    #[arg(long, value_parser = parse_time)]
    time: Option<TimeValue>,
    /// Steps to run after the input is focused, e.g. `next-month next pm minute+ confirm-time`
    steps: Vec<Step>,
}

fn parse_time(s: &str) -> Result<TimeValue, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map(TimeValue::from)
        .map_err(|e| format!("invalid time `{s}`: {e}"))
}

impl Cli {
    fn clock(&self) -> Arc<dyn Clock> {
        if self.date.is_none() && self.time.is_none() {
            return Arc::new(SystemClock);
        }
        let date = self.date.map(DateValue::from).unwrap_or_else(|| SystemClock.today());
        let time = self.time.unwrap_or_else(|| SystemClock.now());
        Arc::new(FixedClock::new(date, time))
    }

    fn build_picker(&self) -> Result<DateTimePicker> {
        let mut picker = DateTimePicker::default();
        picker.with_clock(self.clock())?;
        if !self.no_date {
            picker.with_date_picker(Some(self.weekday_order))?;
        }
        if !self.no_time {
            picker.with_time_picker(Some(self.hour_interval), Some(self.minute_interval))?;
        }
        picker.build().context("failed to build the picker")?;
        Ok(picker)
    }
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new(
            "error,tessera_date_time_picker=info,example=info",
        ) {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

fn log_render_model(picker: &DateTimePicker) {
    match picker.visible_stage() {
        Some(Stage::Date) => {
            let Some(stage) = picker.date_stage() else {
                return;
            };
            info!(
                view = ?stage.view(),
                month = stage.month_label(),
                year = %stage.year_label(),
                controls = ?stage.controls(),
                "date stage"
            );
            info!(weekdays = ?stage.weekday_labels());
            for region in [Region::DayButtons, Region::MonthButtons, Region::YearButtons] {
                let labels: Vec<String> = stage
                    .surface()
                    .elements(region)
                    .map(|element| {
                        if element.has_class("selected") {
                            format!("[{}]", element.label())
                        } else {
                            element.label().to_owned()
                        }
                    })
                    .collect();
                let width = if region == Region::DayButtons { 7 } else { 4 };
                for row in labels.chunks(width) {
                    info!(?region, "{}", row.join(" "));
                }
            }
        }
        Some(Stage::Time) => {
            let Some(stage) = picker.time_stage() else {
                return;
            };
            let strip = |region| {
                stage
                    .surface()
                    .elements(region)
                    .map(|element| element.label().to_owned())
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            info!(
                hours = %strip(Region::HourButtons),
                minutes = %strip(Region::MinuteButtons),
                meridiem = stage.meridiem().label(),
                controls = ?stage.controls(),
                "time stage"
            );
        }
        None => info!(input = picker.input_text(), "picker closed"),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut picker = cli.build_picker()?;
    picker.on_confirmed(|event| info!(selection = ?event.selection, "selection confirmed"));
    picker.on_date_next(|event| info!(date = %event.date, "moved on to the time stage"));

    picker.dispatch(PickerEvent::InputFocused)?;
    log_render_model(&picker);
    for Step(event) in &cli.steps {
        picker
            .dispatch(*event)
            .with_context(|| format!("step {event:?} failed"))?;
        log_render_model(&picker);
    }

    println!("{}", picker.input_text());
    Ok(())
}
