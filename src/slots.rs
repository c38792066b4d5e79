//! Day and period skeleton for a generation run.

use crate::data::{Day, SaturdayOption};
use crate::error::ValidationError;

/// Parses a 12-hour slot label such as "3:00-3:50 PM" into its 24-hour start hour.
pub fn parse_hour(label: &str) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidTime(label.to_string());

    let (hour, _) = label.trim().split_once(':').ok_or_else(invalid)?;
    let hour: u32 = hour.trim().parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&hour) {
        return Err(invalid());
    }

    let hour = if label.contains("PM") && hour != 12 {
        hour + 12
    } else if label.contains("AM") && hour == 12 {
        0
    } else {
        hour
    };
    Ok(hour)
}

/// Formats a 24-hour start hour as a 50-minute slot label.
pub fn format_hour(hour: u32) -> String {
    match hour {
        0 | 24 => "12:00-12:50 AM".to_string(),
        12 => "12:00-12:50 PM".to_string(),
        h if h < 12 => format!("{h}:00-{h}:50 AM"),
        h => {
            let h = h - 12;
            format!("{h}:00-{h}:50 PM")
        }
    }
}

/// Sequential slots from `start_hour` through `end_hour`, truncated to `count`.
pub fn slots_between(start_hour: u32, end_hour: u32, count: usize) -> Vec<String> {
    (start_hour..=end_hour).map(format_hour).take(count).collect()
}

/// Builds the ordered period labels for one day.
pub fn build_slots(
    start_time: &str,
    end_time: &str,
    period_count: usize,
) -> Result<Vec<String>, ValidationError> {
    let start_hour = parse_hour(start_time)?;
    let end_hour = parse_hour(end_time)?;
    check_span(start_hour, end_hour, period_count)?;
    Ok(slots_between(start_hour, end_hour, period_count))
}

fn check_span(start_hour: u32, end_hour: u32, period_count: usize) -> Result<(), ValidationError> {
    if end_hour <= start_hour {
        return Err(ValidationError::EndNotAfterStart);
    }
    let hours = end_hour - start_hour;
    if (hours as usize) < period_count {
        return Err(ValidationError::NotEnoughHours {
            hours,
            periods: period_count,
        });
    }
    Ok(())
}

pub fn build_days(option: SaturdayOption) -> Vec<Day> {
    let mut days = Day::WEEKDAYS.to_vec();
    if option.includes_saturday() {
        days.push(Day::Saturday);
    }
    days
}

/// Number of leading slots a class is taught on Saturday.
pub fn saturday_slot_count(option: SaturdayOption, slot_count: usize) -> usize {
    match option {
        SaturdayOption::HalfDay => slot_count / 2,
        SaturdayOption::FullDay => slot_count,
        SaturdayOption::Holiday => 0,
    }
}
