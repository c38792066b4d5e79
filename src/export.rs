//! Tabular records and CSV files for generated timetables.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::data::SlotGrid;
use crate::solver::Timetables;

pub const TIME_SLOT_HEADER: &str = "Time Slot";

/// Header plus rows; absent cells are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_grid(grid: &SlotGrid) -> Self {
        let header = std::iter::once(TIME_SLOT_HEADER.to_string())
            .chain(grid.days().iter().map(|d| d.to_string()))
            .collect();
        let rows = grid
            .rows()
            .map(|(slot, cells)| {
                std::iter::once(slot.to_string())
                    .chain(cells.iter().map(|c| c.clone().unwrap_or_default()))
                    .collect()
            })
            .collect();
        Self { header, rows }
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for record in std::iter::once(&self.header).chain(self.rows.iter()) {
            let line: Vec<Cow<'_, str>> = record.iter().map(|f| csv_field(f)).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }
}

fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Replaces spaces, path separators and characters that some filesystems
/// reject with `_`, so a label always names a single file inside the export
/// directory.
fn file_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

pub fn class_file_name(class_label: &str) -> String {
    format!("{}.csv", file_stem(class_label))
}

pub fn teacher_file_name(teacher: &str) -> String {
    format!("Teacher_{}.csv", file_stem(teacher))
}

/// Writes every class and teacher table into `dir`, returning the paths written.
pub fn write_all(dir: &Path, timetables: &Timetables) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let classes = timetables
        .classes
        .iter()
        .map(|(label, grid)| (class_file_name(label), grid));
    let teachers = timetables
        .teachers
        .iter()
        .map(|(name, grid)| (teacher_file_name(name), grid));

    let mut written = Vec::with_capacity(timetables.classes.len() + timetables.teachers.len());
    for (file_name, grid) in classes.chain(teachers) {
        let path = dir.join(file_name);
        fs::write(&path, Table::from_grid(grid).to_csv())?;
        written.push(path);
    }
    info!("Exported {} timetables to {}", written.len(), dir.display());
    Ok(written)
}
