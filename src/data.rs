use serde::{Deserialize, Serialize};
use std::fmt;

/// Hourly slot labels offered as start, end and lunch choices.
pub const AVAILABLE_SLOTS: [&str; 10] = [
    "7:00-7:50 AM",
    "8:00-8:50 AM",
    "9:00-9:50 AM",
    "10:00-10:50 AM",
    "11:00-11:50 AM",
    "12:00-12:50 PM",
    "1:00-1:50 PM",
    "2:00-2:50 PM",
    "3:00-3:50 PM",
    "4:00-4:50 PM",
];

pub const ACTIVITY_SUBJECTS: [&str; 6] = [
    "Sports",
    "Drawing/Craft",
    "Drama",
    "Music",
    "Instrument",
    "Dance",
];

pub const SECTIONS: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

pub const GRADE_COUNT: u32 = 12;
pub const MAX_SECTIONS: usize = 4;
pub const EXPECTED_CLASSES: usize = GRADE_COUNT as usize * MAX_SECTIONS;

pub const LUNCH_LABEL: &str = "Lunch Break";
pub const TBD_LABEL: &str = "TBD";
pub const FREE_LABEL: &str = "Free";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grades sharing one core curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeBand {
    #[serde(rename = "1-5")]
    Primary,
    #[serde(rename = "6-8")]
    Middle,
    #[serde(rename = "9-10")]
    Secondary,
    #[serde(rename = "11-12 Science")]
    SeniorScience,
    #[serde(rename = "11-12 Commerce")]
    SeniorCommerce,
    #[serde(rename = "11-12 Arts")]
    SeniorArts,
}

impl GradeBand {
    pub const ALL: [GradeBand; 6] = [
        GradeBand::Primary,
        GradeBand::Middle,
        GradeBand::Secondary,
        GradeBand::SeniorScience,
        GradeBand::SeniorCommerce,
        GradeBand::SeniorArts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GradeBand::Primary => "1-5",
            GradeBand::Middle => "6-8",
            GradeBand::Secondary => "9-10",
            GradeBand::SeniorScience => "11-12 Science",
            GradeBand::SeniorCommerce => "11-12 Commerce",
            GradeBand::SeniorArts => "11-12 Arts",
        }
    }

    pub fn from_label(label: &str) -> Option<GradeBand> {
        GradeBand::ALL.into_iter().find(|band| band.label() == label)
    }

    /// Maps a grade token ("1".."12" or a senior track label) to its band.
    ///
    /// Anything unrecognised falls back to `11-12 Science`.
    pub fn for_grade(token: &str) -> GradeBand {
        let token = token.trim();
        if let Ok(grade) = token.parse::<u32>() {
            return match grade {
                1..=5 => GradeBand::Primary,
                6..=8 => GradeBand::Middle,
                9..=10 => GradeBand::Secondary,
                _ => GradeBand::SeniorScience,
            };
        }
        let senior = [
            GradeBand::SeniorScience,
            GradeBand::SeniorCommerce,
            GradeBand::SeniorArts,
        ];
        GradeBand::from_label(token)
            .filter(|band| senior.contains(band))
            .unwrap_or(GradeBand::SeniorScience)
    }

    pub fn core_subjects(&self) -> &'static [&'static str] {
        match self {
            GradeBand::Primary => &[
                "English",
                "Hindi",
                "Mathematics",
                "EVS",
                "Art",
                "Physical Education",
            ],
            GradeBand::Middle => &[
                "English",
                "Hindi",
                "Mathematics",
                "Science",
                "Social Science",
                "Sanskrit",
                "Computer Basics",
            ],
            GradeBand::Secondary => &[
                "English",
                "Hindi",
                "Mathematics",
                "Science",
                "Social Science",
                "IT",
                "Commerce Basics",
            ],
            GradeBand::SeniorScience => {
                &["Physics", "Chemistry", "Biology/Math", "Computer Science"]
            }
            GradeBand::SeniorCommerce => &["Accountancy", "Business Studies", "Economics"],
            GradeBand::SeniorArts => &["History", "Political Science", "Sociology"],
        }
    }
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaturdayOption {
    Holiday,
    #[serde(rename = "Half Day")]
    HalfDay,
    #[serde(rename = "Full Day")]
    FullDay,
}

impl SaturdayOption {
    pub const ALL: [SaturdayOption; 3] = [
        SaturdayOption::Holiday,
        SaturdayOption::HalfDay,
        SaturdayOption::FullDay,
    ];

    pub fn includes_saturday(&self) -> bool {
        *self != SaturdayOption::Holiday
    }
}

/// One grade + section combination, e.g. "Grade 7 B".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSection {
    pub grade: u32,
    pub section: String,
}

impl ClassSection {
    pub fn label(&self) -> String {
        format!("Grade {} {}", self.grade, self.section)
    }

    pub fn grade_band(&self) -> GradeBand {
        GradeBand::for_grade(&self.grade.to_string())
    }
}

/// Raw generation request as received from a caller.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub sections: Vec<String>,
    #[serde(default)]
    pub activity_subjects: Vec<String>,
    pub activity_count: usize,
    pub start_time: String,
    pub end_time: String,
    pub periods_per_day: usize,
    pub lunch_time: String,
    pub saturday_option: SaturdayOption,
}

/// A time-slot × day table of optional cell labels.
///
/// Used both for class timetables (absent cell = not taught that day) and
/// for a teacher's own booking schedule (absent cell = free).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotGrid {
    days: Vec<Day>,
    time_slots: Vec<String>,
    // indexed [slot][day]
    cells: Vec<Vec<Option<String>>>,
}

impl SlotGrid {
    pub fn new(days: &[Day], time_slots: &[String]) -> Self {
        Self {
            days: days.to_vec(),
            time_slots: time_slots.to_vec(),
            cells: vec![vec![None; days.len()]; time_slots.len()],
        }
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn time_slots(&self) -> &[String] {
        &self.time_slots
    }

    fn position(&self, time_slot: &str, day: Day) -> Option<(usize, usize)> {
        let slot = self.time_slots.iter().position(|s| s == time_slot)?;
        let day = self.days.iter().position(|d| *d == day)?;
        Some((slot, day))
    }

    pub fn contains(&self, time_slot: &str, day: Day) -> bool {
        self.position(time_slot, day).is_some()
    }

    pub fn get(&self, time_slot: &str, day: Day) -> Option<&str> {
        let (slot, day) = self.position(time_slot, day)?;
        self.cells[slot][day].as_deref()
    }

    /// Writes a cell; returns false when the slot or day is outside the grid.
    pub fn set(&mut self, time_slot: &str, day: Day, label: impl Into<String>) -> bool {
        match self.position(time_slot, day) {
            Some((slot, day)) => {
                self.cells[slot][day] = Some(label.into());
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_at(&mut self, slot: usize, day: usize, label: String) {
        self.cells[slot][day] = Some(label);
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<String>])> {
        self.time_slots
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Every present cell as (time slot, day, label).
    pub fn filled_cells(&self) -> impl Iterator<Item = (&str, Day, &str)> {
        self.rows().flat_map(move |(slot, row)| {
            row.iter()
                .zip(self.days.iter())
                .filter_map(move |(cell, day)| cell.as_deref().map(|label| (slot, *day, label)))
        })
    }

    /// Copy of the grid with every absent cell replaced by `fill`.
    pub fn filled_with(&self, fill: &str) -> SlotGrid {
        let mut grid = self.clone();
        for cell in grid.cells.iter_mut().flatten() {
            if cell.is_none() {
                *cell = Some(fill.to_string());
            }
        }
        grid
    }
}

/// Public view of a registered teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSummary {
    pub name: String,
    pub subjects: Vec<String>,
    pub grade_bands: Vec<GradeBand>,
}

/// Outcome of a successful generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub status: String,
    pub class_count: usize,
    pub teacher_count: usize,
    pub files: Vec<String>,
}

/// Fixed choices a client can offer for generation and registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub time_slots: Vec<&'static str>,
    pub activity_subjects: Vec<&'static str>,
    pub sections: Vec<&'static str>,
    pub grade_bands: Vec<GradeBand>,
    pub saturday_options: Vec<SaturdayOption>,
}

impl Catalog {
    pub fn current() -> Self {
        Self {
            time_slots: AVAILABLE_SLOTS.to_vec(),
            activity_subjects: ACTIVITY_SUBJECTS.to_vec(),
            sections: SECTIONS.to_vec(),
            grade_bands: GradeBand::ALL.to_vec(),
            saturday_options: SaturdayOption::ALL.to_vec(),
        }
    }
}
