//! Teacher onboarding, qualification lookup and per-run availability.

use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use log::{debug, info};

use crate::data::{Day, FREE_LABEL, GradeBand, SlotGrid, TeacherSummary};
use crate::error::ValidationError;

#[derive(Debug, Clone)]
pub struct Teacher {
    name: String,
    subjects: BTreeSet<String>,
    grade_bands: BTreeSet<GradeBand>,
    schedule: SlotGrid,
}

impl Teacher {
    pub fn new(
        name: impl Into<String>,
        subjects: BTreeSet<String>,
        grade_bands: BTreeSet<GradeBand>,
    ) -> Self {
        Self {
            name: name.into(),
            subjects,
            grade_bands,
            schedule: SlotGrid::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subjects(&self) -> &BTreeSet<String> {
        &self.subjects
    }

    pub fn grade_bands(&self) -> &BTreeSet<GradeBand> {
        &self.grade_bands
    }

    /// Resets the schedule to all-free over exactly this grid.
    pub fn initialize_schedule(&mut self, days: &[Day], time_slots: &[String]) {
        self.schedule = SlotGrid::new(days, time_slots);
    }

    pub fn is_available(&self, day: Day, time_slot: &str) -> bool {
        self.schedule.get(time_slot, day).is_none()
    }

    /// Books the cell for `class_label`; cells outside the grid are ignored.
    pub fn assign(&mut self, day: Day, time_slot: &str, class_label: &str) {
        self.schedule.set(time_slot, day, class_label);
    }

    pub fn schedule(&self) -> &SlotGrid {
        &self.schedule
    }

    /// Read-only timetable view: booked class per cell, "Free" otherwise.
    pub fn timetable(&self) -> SlotGrid {
        self.schedule.filled_with(FREE_LABEL)
    }

    pub fn summary(&self) -> TeacherSummary {
        TeacherSummary {
            name: self.name.clone(),
            subjects: self.subjects.iter().cloned().collect(),
            grade_bands: self.grade_bands.iter().copied().collect(),
        }
    }
}

/// (subject, grade band) → qualified teacher names in registration order.
#[derive(Debug, Clone, Default)]
pub struct QualificationIndex {
    entries: HashMap<(String, GradeBand), Vec<String>>,
}

impl QualificationIndex {
    pub fn lookup(&self, subject: &str, band: GradeBand) -> &[String] {
        self.entries
            .get(&(subject.to_string(), band))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn insert(&mut self, subject: &str, band: GradeBand, name: &str) {
        self.entries
            .entry((subject.to_string(), band))
            .or_default()
            .push(name.to_string());
    }

    fn remove_teacher(&mut self, name: &str) {
        for names in self.entries.values_mut() {
            names.retain(|n| n != name);
        }
        self.entries.retain(|_, names| !names.is_empty());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registered teachers plus the index built from their qualifications.
#[derive(Debug, Clone, Default)]
pub struct TeacherRegistry {
    teachers: Vec<Teacher>,
    positions: HashMap<String, usize>,
    index: QualificationIndex,
}

impl TeacherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces a teacher and indexes every (subject, band) pair.
    ///
    /// Re-registering a name drops its previous index entries first; the
    /// teacher keeps its original place in registration order.
    pub fn register<S, B>(
        &mut self,
        name: &str,
        subjects: S,
        grade_bands: B,
    ) -> Result<&Teacher, ValidationError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        B: IntoIterator<Item = GradeBand>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        let subjects: BTreeSet<String> = subjects
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if subjects.is_empty() {
            return Err(ValidationError::MissingField("subjects"));
        }
        let grade_bands: BTreeSet<GradeBand> = grade_bands.into_iter().collect();
        if grade_bands.is_empty() {
            return Err(ValidationError::MissingField("grade bands"));
        }

        if self.positions.contains_key(name) {
            debug!("Re-registering teacher {name}; dropping previous qualifications");
            self.index.remove_teacher(name);
        }
        for (subject, band) in subjects.iter().cartesian_product(grade_bands.iter()) {
            self.index.insert(subject, *band, name);
        }

        let teacher = Teacher::new(name, subjects, grade_bands);
        let position = match self.positions.get(name) {
            Some(&position) => {
                self.teachers[position] = teacher;
                position
            }
            None => {
                self.teachers.push(teacher);
                self.positions.insert(name.to_string(), self.teachers.len() - 1);
                self.teachers.len() - 1
            }
        };
        info!(
            "Teacher {} registered ({} subjects, {} grade bands)",
            name,
            self.teachers[position].subjects.len(),
            self.teachers[position].grade_bands.len()
        );
        Ok(&self.teachers[position])
    }

    /// Same as [`register`](Self::register) with subjects given as "Math, Physics".
    pub fn register_text<B>(
        &mut self,
        name: &str,
        subjects_text: &str,
        grade_bands: B,
    ) -> Result<&Teacher, ValidationError>
    where
        B: IntoIterator<Item = GradeBand>,
    {
        self.register(name, subjects_text.split(','), grade_bands)
    }

    pub fn get(&self, name: &str) -> Option<&Teacher> {
        self.positions.get(name).map(|&i| &self.teachers[i])
    }

    /// Teachers in registration order.
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn len(&self) -> usize {
        self.teachers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teachers.is_empty()
    }

    pub fn index(&self) -> &QualificationIndex {
        &self.index
    }

    pub fn initialize_schedules(&mut self, days: &[Day], time_slots: &[String]) {
        for teacher in &mut self.teachers {
            teacher.initialize_schedule(days, time_slots);
        }
    }

    /// Qualified teachers whose own schedule is free at (day, slot).
    pub fn available_teachers(
        &self,
        subject: &str,
        band: GradeBand,
        day: Day,
        time_slot: &str,
    ) -> Vec<&str> {
        self.index
            .lookup(subject, band)
            .iter()
            .filter(|name| self.get(name).is_some_and(|t| t.is_available(day, time_slot)))
            .map(String::as_str)
            .collect()
    }

    pub fn book(&mut self, name: &str, day: Day, time_slot: &str, class_label: &str) {
        if let Some(&i) = self.positions.get(name) {
            self.teachers[i].assign(day, time_slot, class_label);
        }
    }
}
