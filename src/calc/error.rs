use std::fmt;

/// Failures raised by the date index and the selection state machine.
///
/// None of these are retried. `DateNotInIndex` is the only one a host is
/// expected to see in normal operation (an external jump to a date that has
/// no events); the others indicate an integration error in the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The input could not be read as a calendar date.
    InvalidDate(String),
    /// No year group exists for the requested year. `None` means no year was
    /// given and there is no active selection to fall back on.
    UnknownYear(Option<i32>),
    /// No month group exists for `month` (zero-based) in `year`.
    UnknownMonth { year: i32, month: u32 },
    /// The requested (year, month, day) has no source date in the index.
    DateNotInIndex { year: i32, month: u32, day: u32 },
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::InvalidDate(input) => write!(f, "invalid date: '{input}'"),
            CalendarError::UnknownYear(Some(year)) => write!(f, "year {year} is not in the index"),
            CalendarError::UnknownYear(None) => {
                write!(f, "no year selected and the index is empty")
            }
            CalendarError::UnknownMonth { year, month } => {
                write!(f, "month {:02} of {year} is not in the index", month + 1)
            }
            CalendarError::DateNotInIndex { year, month, day } => {
                write!(f, "{year}-{:02}-{day:02} is not in the index", month + 1)
            }
        }
    }
}

impl std::error::Error for CalendarError {}

pub type CalendarResult<T> = Result<T, CalendarError>;
