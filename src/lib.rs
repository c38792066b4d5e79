//! Weekly school timetable generation.
//!
//! Teachers register with the subjects and grade bands they can teach.
//! A generation run builds the day × period grid from the request, then
//! walks every class section (12 grades × 4 sections) and fills its week
//! with lunch, randomly placed activity periods and core subjects, booking
//! a free qualified teacher for each cell where one exists.
//!
//! - `registry`: teachers, qualification index, per-run availability
//! - `slots`: day and period skeleton
//! - `solver`: the assignment engine
//! - `export`: CSV tables for classes and teachers
//! - `manager`: service object tying the above together
//! - `server`: axum HTTP API

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod manager;
pub mod random;
pub mod registry;
pub mod server;
pub mod slots;
pub mod solver;
