//! Validated generation options and service settings.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::data::{
    ACTIVITY_SUBJECTS, ClassSection, EXPECTED_CLASSES, GRADE_COUNT, GenerationParams, MAX_SECTIONS,
    SECTIONS, SaturdayOption,
};
use crate::error::{ScheduleError, ValidationError};
use crate::slots;

pub const MAX_PERIODS: usize = 10;
pub const MAX_ACTIVITIES: usize = 3;

/// Generation options after range and consistency checks.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub sections: Vec<String>,
    pub activity_subjects: Vec<String>,
    pub activity_count: usize,
    pub time_slots: Vec<String>,
    pub lunch_time: String,
    pub saturday: SaturdayOption,
}

impl GenerationConfig {
    pub fn from_params(params: &GenerationParams) -> Result<Self, ValidationError> {
        check_range("periodsPerDay", params.periods_per_day, 1, MAX_PERIODS)?;
        check_range("activityCount", params.activity_count, 1, MAX_ACTIVITIES)?;

        let time_slots =
            slots::build_slots(&params.start_time, &params.end_time, params.periods_per_day)?;

        let sections: Vec<String> = params
            .sections
            .iter()
            .take(MAX_SECTIONS)
            .map(|s| s.trim().to_string())
            .collect();
        if let Some(unknown) = sections.iter().find(|s| !SECTIONS.contains(&s.as_str())) {
            return Err(ValidationError::UnknownSection(unknown.clone()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = sections.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(ValidationError::DuplicateSection(dup.clone()));
        }
        let class_count = GRADE_COUNT as usize * sections.len();
        if class_count != EXPECTED_CLASSES {
            return Err(ValidationError::ClassCount {
                expected: EXPECTED_CLASSES,
                actual: class_count,
            });
        }

        if let Some(unknown) = params
            .activity_subjects
            .iter()
            .find(|a| !ACTIVITY_SUBJECTS.contains(&a.as_str()))
        {
            return Err(ValidationError::UnknownActivity(unknown.clone()));
        }

        Ok(Self {
            sections,
            activity_subjects: params.activity_subjects.clone(),
            activity_count: params.activity_count,
            time_slots,
            lunch_time: params.lunch_time.clone(),
            saturday: params.saturday_option,
        })
    }

    /// Class sections in processing order: grade ascending, then section as selected.
    pub fn class_sections(&self) -> Vec<ClassSection> {
        itertools::iproduct!(1..=GRADE_COUNT, self.sections.iter())
            .map(|(grade, section)| ClassSection {
                grade,
                section: section.clone(),
            })
            .collect()
    }
}

fn check_range(
    field: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Process-level settings read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    pub output_dir: PathBuf,
    pub seed: Option<u64>,
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            output_dir: PathBuf::from("timetables"),
            seed: None,
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ScheduleError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ScheduleError> {
        let mut config = Self::default();

        if let Some(value) = lookup("TIMETABLE_ADDR") {
            config.addr = value.parse().map_err(|_| ScheduleError::Config {
                key: "TIMETABLE_ADDR",
                value,
            })?;
        }
        if let Some(value) = lookup("TIMETABLE_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("TIMETABLE_SEED") {
            config.seed = Some(value.parse().map_err(|_| ScheduleError::Config {
                key: "TIMETABLE_SEED",
                value,
            })?);
        }
        if let Some(value) = lookup("TIMETABLE_LOG") {
            config.log_filter = value;
        }

        Ok(config)
    }
}
