//! Headless date and time picker for Tessera hosts.
//!
//! The crate holds the selection logic of a picker attached to a text input:
//! month grids under a configurable weekday order, month and year pickers,
//! cyclic hour and minute strips, and a staged confirm flow with cancelable
//! hooks. Painting and raw input handling stay with the host, which turns
//! user input into [`PickerEvent`]s and draws the stages' render models.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use tessera_date_time_picker::{
//!     DateAction, DateTimePicker, DateValue, DocumentId, FixedClock, PickerEvent, TimeAction,
//!     TimeValue, WeekdayOrder,
//! };
//!
//! # fn main() -> Result<(), tessera_date_time_picker::PickerError> {
//! let clock = FixedClock::new(
//!     DateValue::new(2024, 2, 10).unwrap(),
//!     TimeValue::new(9, 30).unwrap(),
//! );
//! let mut picker = DateTimePicker::new(DocumentId::unique());
//! picker
//!     .with_date_picker(Some(WeekdayOrder::SUNDAY_FIRST))?
//!     .with_time_picker(None, Some(15))?
//!     .with_clock(Arc::new(clock))?
//!     .build()?;
//!
//! picker.dispatch(PickerEvent::InputFocused)?;
//! picker.dispatch(PickerEvent::Date(DateAction::Next))?;
//! picker.dispatch(PickerEvent::Time(TimeAction::Confirm))?;
//! assert_eq!(picker.input_text(), "02/10/2024 09:30 AM");
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs, clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod backdrop;
pub mod calendar;
pub mod date_stage;
pub mod error;
pub mod event;
pub mod grid;
pub mod picker;
pub mod render;
pub mod stepper;
pub mod time_stage;
pub mod weekday;

pub use backdrop::{Backdrop, BackdropId, DocumentId};
pub use calendar::{Clock, DateField, DateValue, FixedClock, SystemClock, TimeValue};
pub use date_stage::{DateAction, DateIntent, DateStage, DateView};
pub use error::{CalendarError, PickerError};
pub use event::{BeforeConfirmed, BeforeDateNext, Cancelable, Confirmed, DateNext};
pub use picker::{DateTimePicker, PickerConfig, PickerEvent, SelectionState, Stage};
pub use render::{ButtonSpec, ControlButtons, Element, ElementKey, Region, Surface};
pub use stepper::{Direction, Meridiem};
pub use time_stage::{TimeAction, TimeIntent, TimeStage, TimeTrack};
pub use weekday::WeekdayOrder;
