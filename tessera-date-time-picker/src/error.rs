//! Error types shared by the picker stages and the coordinator.
use thiserror::Error;

use crate::picker::Stage;

/// Failures raised by calendar field updates and formatting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The requested field value does not produce a valid date or time.
    #[error("{field} = {value} is out of range")]
    OutOfRange {
        /// Name of the field being updated.
        field: &'static str,
        /// Rejected value.
        value: i64,
    },
    /// The format pattern contains an unsupported specifier.
    #[error("invalid format pattern `{0}`")]
    InvalidFormat(String),
}

/// Errors returned by the date/time picker.
///
/// Configuration variants are programming errors in the host application.
/// They are returned before any state is touched so the caller can abort.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PickerError {
    /// The weekday order is not a permutation of 1-7.
    #[error("invalid weekday order: {reason}")]
    InvalidWeekdayOrder {
        /// What is wrong with the provided order.
        reason: String,
    },
    /// A configuration method was called after `build`.
    #[error("cannot configure the picker after build() has been called")]
    AlreadyBuilt,
    /// An operation that needs the built picker was called before `build`.
    #[error("the picker has not been built yet")]
    NotBuilt,
    /// `build` was called with both stages disabled.
    #[error("at least one of the date or time picker must be enabled")]
    NoStagesEnabled,
    /// The requested stage was not enabled at configuration time.
    #[error("the {0} stage was not enabled")]
    StageNotEnabled(Stage),
    /// The stage identifier is not known.
    #[error("unknown stage `{0}`")]
    UnknownStage(String),
    /// A stepping interval is zero or larger than its track.
    #[error("invalid {track} interval {value}")]
    InvalidInterval {
        /// `"hour"` or `"minute"`.
        track: &'static str,
        /// Rejected interval.
        value: u32,
    },
    /// The action is not available in the stage's current state.
    #[error("`{action}` is not available on the {stage} stage right now")]
    ActionUnavailable {
        /// Stage that rejected the action.
        stage: Stage,
        /// Name of the rejected action.
        action: &'static str,
    },
    /// A calendar query failed.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
