//! Error types for cirrus-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the cirrus-io crate.
///
/// Missing member data (absent file, absent time step, all-fill slab) is
/// recoverable: the caller drops that member for that time step. Every other
/// variant describes a structural problem and is fatal.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when the requested lead time is not on the file's time axis.
    #[error("time {lead_hours} h not found in {}", path.display())]
    MissingTime {
        /// Requested lead time in hours.
        lead_hours: f64,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a slab holds only fill values.
    #[error("variable '{name}' in {} contains only missing values", path.display())]
    CorruptData {
        /// Name of the variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when writing to a variable that was never declared.
    #[error("unknown output variable '{name}'")]
    UnknownVariable {
        /// Name of the variable.
        name: String,
    },

    /// Returned when a write addresses a slot outside a declared variable.
    #[error("index {index} out of range for '{name}' axis {axis} of length {len}")]
    IndexOutOfRange {
        /// Name of the variable.
        name: String,
        /// Position of the offending axis.
        axis: usize,
        /// The offending index.
        index: usize,
        /// Length of the axis.
        len: usize,
    },
}

impl IoError {
    /// Returns `true` for missing-data errors that only invalidate one
    /// member at one time step.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IoError::FileNotFound { .. } | IoError::MissingTime { .. } | IoError::CorruptData { .. }
        )
    }
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}
