//! Low-level NetCDF extraction helpers.

use std::path::Path;

use ndarray::Array2;
use netcdf::AttributeValue;

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable.
pub(crate) fn read_1d_f64(file: &netcdf::File, name: &str, path: &Path) -> Result<Vec<f64>, IoError> {
    let var = file.variable(name).ok_or_else(|| IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })?;
    Ok(var.get_values::<f64, _>(..)?)
}

/// Position of `lead_hours` on the `time` axis (hours).
pub(crate) fn time_index(file: &netcdf::File, lead_hours: f64, path: &Path) -> Result<usize, IoError> {
    let times = read_1d_f64(file, "time", path)?;
    times
        .iter()
        .position(|&t| (t - lead_hours).abs() < 1e-6)
        .ok_or_else(|| IoError::MissingTime {
            lead_hours,
            path: path.to_path_buf(),
        })
}

/// The `_FillValue` (or `missing_value`) attribute of a variable.
fn fill_value(var: &netcdf::Variable<'_>) -> Option<f64> {
    ["_FillValue", "missing_value"]
        .iter()
        .find_map(|name| match var.attribute_value(name)?.ok()? {
            AttributeValue::Double(v) => Some(v),
            AttributeValue::Float(v) => Some(f64::from(v)),
            _ => None,
        })
}

/// Horizontal window of a slab read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    /// Target `(rows, cols)`.
    pub(crate) domain: (usize, usize),
    /// Offset of the window, `None` when the file must match `domain` exactly.
    pub(crate) offset: Option<(usize, usize)>,
}

impl Window {
    fn check(&self, ny: usize, nx: usize) -> Result<(usize, usize), IoError> {
        let (rows, cols) = self.domain;
        let (r0, c0) = self.offset.unwrap_or((0, 0));
        let exact = self.offset.is_none();
        if (exact && ny != rows) || r0 + rows > ny {
            return Err(IoError::DimensionMismatch {
                name: "y".to_string(),
                expected: r0 + rows,
                got: ny,
            });
        }
        if (exact && nx != cols) || c0 + cols > nx {
            return Err(IoError::DimensionMismatch {
                name: "x".to_string(),
                expected: c0 + cols,
                got: nx,
            });
        }
        Ok((r0, c0))
    }
}

/// Read one horizontal slab of `name`.
///
/// Accepted layouts are `(y, x)`, `(time, y, x)` and `(time, level, y, x)`;
/// `time` is ignored for the first and `level` is required for the last.
/// Fill values become NaN.
///
/// # Errors
///
/// Returns [`IoError::CorruptData`] if the slab holds no finite value.
pub(crate) fn read_slab(
    file: &netcdf::File,
    name: &str,
    time: usize,
    level: Option<usize>,
    window: Window,
    path: &Path,
) -> Result<Array2<f64>, IoError> {
    let var = file.variable(name).ok_or_else(|| IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })?;

    let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let (rows, cols) = window.domain;
    let data = match dims.as_slice() {
        &[ny, nx] => {
            let (r0, c0) = window.check(ny, nx)?;
            var.get_values::<f64, _>((r0..r0 + rows, c0..c0 + cols))?
        }
        &[nt, ny, nx] => {
            check_axis(name, "time", time, nt)?;
            let (r0, c0) = window.check(ny, nx)?;
            var.get_values::<f64, _>((time..time + 1, r0..r0 + rows, c0..c0 + cols))?
        }
        &[nt, nl, ny, nx] => {
            let lev = level.ok_or_else(|| IoError::Validation {
                count: 1,
                details: format!("variable '{name}' has a level axis but no level is configured"),
            })?;
            check_axis(name, "time", time, nt)?;
            check_axis(name, "level", lev, nl)?;
            let (r0, c0) = window.check(ny, nx)?;
            var.get_values::<f64, _>((time..time + 1, lev..lev + 1, r0..r0 + rows, c0..c0 + cols))?
        }
        other => {
            return Err(IoError::DimensionMismatch {
                name: format!("{name} dimensions"),
                expected: 3,
                got: other.len(),
            });
        }
    };

    let fill = fill_value(&var);
    let mut slab = Array2::from_shape_vec((rows, cols), data).map_err(|e| IoError::Validation {
        count: 1,
        details: format!("variable '{name}': {e}"),
    })?;
    if let Some(fv) = fill {
        slab.mapv_inplace(|v| if v == fv { f64::NAN } else { v });
    }
    if !slab.iter().any(|v| v.is_finite()) {
        return Err(IoError::CorruptData {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(slab)
}

fn check_axis(var: &str, axis: &str, index: usize, len: usize) -> Result<(), IoError> {
    if index >= len {
        return Err(IoError::Validation {
            count: 1,
            details: format!("variable '{var}': {axis} index {index} outside axis of length {len}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_exact_match() {
        let w = Window {
            domain: (4, 5),
            offset: None,
        };
        assert_eq!(w.check(4, 5).unwrap(), (0, 0));
        assert!(matches!(
            w.check(6, 5),
            Err(IoError::DimensionMismatch { ref name, expected: 4, got: 6 }) if name == "y"
        ));
    }

    #[test]
    fn window_crop_must_fit() {
        let w = Window {
            domain: (4, 4),
            offset: Some((2, 1)),
        };
        assert_eq!(w.check(6, 10).unwrap(), (2, 1));
        assert!(matches!(
            w.check(5, 10),
            Err(IoError::DimensionMismatch { expected: 6, got: 5, .. })
        ));
        assert!(matches!(
            w.check(6, 4),
            Err(IoError::DimensionMismatch { ref name, expected: 5, got: 4 }) if name == "x"
        ));
    }

    #[test]
    fn axis_bounds() {
        assert!(check_axis("W", "level", 3, 4).is_ok());
        assert!(check_axis("W", "level", 4, 4).is_err());
    }
}
