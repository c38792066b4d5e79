//! Error types for teacher onboarding and timetable generation.

use thiserror::Error;

/// Input problems detected before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("End time must be after start time")]
    EndNotAfterStart,

    #[error("Not enough hours ({hours}) for {periods} periods")]
    NotEnoughHours { hours: u32, periods: usize },

    #[error(
        "Expected {expected} classes (12 grades × 4 sections), got {actual}. Adjust sections."
    )]
    ClassCount { expected: usize, actual: usize },

    #[error("All fields are required! Missing: {0}")]
    MissingField(&'static str),

    #[error("Invalid time label: {0:?}")]
    InvalidTime(String),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("Section {0:?} was selected more than once")]
    DuplicateSection(String),

    #[error("Unknown section {0:?}")]
    UnknownSection(String),

    #[error("Unknown activity subject {0:?}")]
    UnknownActivity(String),
}

/// Top-level error returned by the timetable service.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error: {0}")]
    Unexpected(String),

    #[error("Error: failed to export timetables: {0}")]
    Export(#[from] std::io::Error),

    #[error("Invalid configuration value for {key}: {value:?}")]
    Config { key: &'static str, value: String },
}

impl ScheduleError {
    /// True for rejected input, false for faults raised while running.
    pub fn is_validation(&self) -> bool {
        matches!(self, ScheduleError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_shortfall() {
        let err = ValidationError::NotEnoughHours {
            hours: 3,
            periods: 7,
        };
        assert_eq!(err.to_string(), "Not enough hours (3) for 7 periods");

        let err = ValidationError::ClassCount {
            expected: 48,
            actual: 36,
        };
        assert!(err.to_string().contains("got 36"));
    }

    #[test]
    fn only_validation_errors_are_flagged_as_validation() {
        let err: ScheduleError = ValidationError::EndNotAfterStart.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "End time must be after start time");

        let err = ScheduleError::Unexpected("boom".to_string());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Error: boom");
    }
}
