//! Initialisation dates and forecast lead times.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::EnsembleError;

/// Parses a `YYYYMMDDHH` date.
///
/// # Errors
///
/// Returns [`EnsembleError::InvalidDate`] for any other format or an
/// impossible calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDateTime, EnsembleError> {
    let invalid = || EnsembleError::InvalidDate {
        value: value.to_string(),
    };
    if value.len() != 10 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let field = |range: std::ops::Range<usize>| value[range].parse::<u32>().map_err(|_| invalid());
    let year = i32::try_from(field(0..4)?).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)
        .and_then(|day| day.and_hms_opt(field(8..10).ok()?, 0, 0))
        .ok_or_else(invalid)
}

/// Formats a date as `YYYYMMDDHH`.
pub fn format_date(date: NaiveDateTime) -> String {
    date.format("%Y%m%d%H").to_string()
}

/// Dates from `start` to `end` inclusive in 24-hour steps.
///
/// # Errors
///
/// Returns [`EnsembleError::Configuration`] if `end` precedes `start`.
pub fn date_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<NaiveDateTime>, EnsembleError> {
    if end < start {
        return Err(EnsembleError::Configuration {
            reason: format!(
                "date end {} precedes start {}",
                format_date(end),
                format_date(start)
            ),
        });
    }
    let mut dates = Vec::new();
    let mut d = start;
    while d <= end {
        dates.push(d);
        d += Duration::hours(24);
    }
    Ok(dates)
}

/// Lead times `start..=end` in steps of `inc` hours.
///
/// # Errors
///
/// Returns [`EnsembleError::Configuration`] for a non-positive increment or
/// an empty range.
pub fn lead_times(start: u32, end: u32, inc: u32) -> Result<Vec<f64>, EnsembleError> {
    if inc == 0 {
        return Err(EnsembleError::Configuration {
            reason: "time increment must be positive".to_string(),
        });
    }
    if end < start {
        return Err(EnsembleError::Configuration {
            reason: format!("time end {end} precedes start {start}"),
        });
    }
    Ok((start..=end).step_by(inc as usize).map(f64::from).collect())
}

/// Seconds since 0001-01-01T00:00, used as the `date` coordinate.
pub fn date_coordinate(date: NaiveDateTime) -> f64 {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_or(f64::NAN, |epoch| (date - epoch).num_seconds() as f64)
}
