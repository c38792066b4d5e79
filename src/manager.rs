//! Service object owning the teacher registry and the latest generated timetables.

use std::path::PathBuf;

use log::{error, info, warn};

use crate::config::GenerationConfig;
use crate::data::{GenerationParams, GenerationReport, GradeBand, SlotGrid, TeacherSummary};
use crate::error::ScheduleError;
use crate::export;
use crate::random::RandomSource;
use crate::registry::TeacherRegistry;
use crate::solver::{self, Timetables};

pub const SUCCESS_STATUS: &str = "Generation Complete";

#[derive(Debug, Default)]
pub struct TimetableManager {
    registry: TeacherRegistry,
    cache: Timetables,
    output_dir: Option<PathBuf>,
}

impl TimetableManager {
    /// Manager that writes CSV exports into `output_dir` after each run.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(output_dir.into()),
            ..Self::default()
        }
    }

    /// Manager that keeps results in memory only.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &TeacherRegistry {
        &self.registry
    }

    pub fn add_teacher(
        &mut self,
        name: &str,
        subjects_text: &str,
        grade_bands: &[GradeBand],
    ) -> Result<TeacherSummary, ScheduleError> {
        let teacher = self
            .registry
            .register_text(name, subjects_text, grade_bands.iter().copied())
            .inspect_err(|e| warn!("Rejected teacher registration: {e}"))?;
        Ok(teacher.summary())
    }

    pub fn list_teachers(&self) -> Vec<TeacherSummary> {
        self.registry.teachers().iter().map(|t| t.summary()).collect()
    }

    /// Runs one generation; on success the new grids replace the cached ones.
    ///
    /// Invalid parameters are rejected before anything changes. Once
    /// validation passes the cache is cleared, so a fault after that point
    /// leaves no timetables at all.
    pub fn generate<R: RandomSource>(
        &mut self,
        params: &GenerationParams,
        rng: &mut R,
    ) -> Result<GenerationReport, ScheduleError> {
        let config = GenerationConfig::from_params(params)
            .inspect_err(|e| warn!("Generation rejected: {e}"))?;

        self.cache = Timetables::default();
        let timetables = solver::generate(&mut self.registry, &config, rng);
        check_complete(&timetables, config.class_sections().len(), self.registry.len())?;

        let files = match &self.output_dir {
            Some(dir) => export::write_all(dir, &timetables)
                .inspect_err(|e| error!("Export failed: {e}"))?,
            None => Vec::new(),
        };

        let report = GenerationReport {
            status: SUCCESS_STATUS.to_string(),
            class_count: timetables.classes.len(),
            teacher_count: timetables.teachers.len(),
            files: files.iter().map(|p| p.display().to_string()).collect(),
        };
        info!(
            "{}: {} class and {} teacher timetables",
            report.status, report.class_count, report.teacher_count
        );
        self.cache = timetables;
        Ok(report)
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.cache.classes.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn teacher_names(&self) -> Vec<&str> {
        self.cache.teachers.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn class_timetable(&self, label: &str) -> Option<&SlotGrid> {
        self.cache.class(label)
    }

    pub fn teacher_timetable(&self, name: &str) -> Option<&SlotGrid> {
        self.cache.teacher(name)
    }
}

/// A run must yield one grid per class section and one per registered teacher.
fn check_complete(
    timetables: &Timetables,
    expected_classes: usize,
    expected_teachers: usize,
) -> Result<(), ScheduleError> {
    if timetables.classes.len() != expected_classes {
        return Err(ScheduleError::Unexpected(format!(
            "expected {expected_classes} class timetables, produced {}",
            timetables.classes.len()
        )));
    }
    if timetables.teachers.len() != expected_teachers {
        return Err(ScheduleError::Unexpected(format!(
            "expected {expected_teachers} teacher timetables, produced {}",
            timetables.teachers.len()
        )));
    }
    Ok(())
}
