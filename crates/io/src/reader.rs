//! Field sources: where member fields and exclusion masks come from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use ndarray::Array2;
use tracing::debug;

use crate::error::IoError;
use crate::netcdf_read::{self, Window};

/// Archive of ensemble fields.
///
/// `member` is zero-based. `lead_hours` is the forecast lead time relative to
/// the initialisation `date`.
pub trait FieldSource {
    /// Reads one horizontal field of `variable`.
    fn read_field(
        &self,
        date: NaiveDateTime,
        lead_hours: f64,
        member: usize,
        variable: &str,
    ) -> Result<Array2<f64>, IoError>;

    /// Reads the exclusion mask (`true` = excluded), or `None` if the archive
    /// has no mask.
    fn read_mask(&self, date: NaiveDateTime, lead_hours: f64) -> Result<Option<Array2<bool>>, IoError>;
}

/// Layout of a NetCDF archive.
///
/// Member files live at `<root>/<YYYYMMDDHH>/<member_prefix><NN>.nc` with
/// `NN` the one-based member number.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Archive root directory.
    root: PathBuf,
    /// Member file name prefix.
    member_prefix: String,
    /// Field shape `(rows, cols)` after cropping.
    domain: (usize, usize),
    /// Offset of the analysis window within the stored grid.
    crop: Option<(usize, usize)>,
    /// Vertical level for `(time, level, y, x)` variables.
    level: Option<usize>,
    /// Mask file name within each date directory.
    mask_file: Option<String>,
    /// Mask variable name.
    mask_var: String,
}

impl SourceConfig {
    /// Creates a configuration for `root` and a `(rows, cols)` domain.
    ///
    /// Defaults: prefix `"mem"`, no crop, no level, no mask, mask variable
    /// `"mask"`.
    pub fn new(root: impl Into<PathBuf>, domain: (usize, usize)) -> Self {
        Self {
            root: root.into(),
            member_prefix: "mem".into(),
            domain,
            crop: None,
            level: None,
            mask_file: None,
            mask_var: "mask".into(),
        }
    }

    /// Sets the member file prefix.
    pub fn with_member_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.member_prefix = prefix.into();
        self
    }

    /// Sets the crop offset `(row0, col0)`.
    pub fn with_crop(mut self, crop: Option<(usize, usize)>) -> Self {
        self.crop = crop;
        self
    }

    /// Sets the vertical level.
    pub fn with_level(mut self, level: Option<usize>) -> Self {
        self.level = level;
        self
    }

    /// Sets the mask file and variable.
    pub fn with_mask(mut self, file: Option<impl Into<String>>, var: impl Into<String>) -> Self {
        self.mask_file = file.map(Into::into);
        self.mask_var = var.into();
        self
    }

    /// Returns the field shape.
    pub fn domain(&self) -> (usize, usize) {
        self.domain
    }

    /// Directory holding the files of one initialisation date.
    pub fn date_dir(&self, date: NaiveDateTime) -> PathBuf {
        self.root.join(date.format("%Y%m%d%H").to_string())
    }

    /// Path of the file of `member` (zero-based) for `date`.
    pub fn member_path(&self, date: NaiveDateTime, member: usize) -> PathBuf {
        self.date_dir(date)
            .join(format!("{}{:02}.nc", self.member_prefix, member + 1))
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] for an empty domain or prefix.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.domain.0 == 0 || self.domain.1 == 0 {
            problems.push(format!("domain must be non-empty, got {:?}", self.domain));
        }
        if self.member_prefix.is_empty() {
            problems.push("member_prefix must not be empty".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }
}

/// [`FieldSource`] over a directory tree of NetCDF files.
#[derive(Debug, Clone)]
pub struct NetcdfFieldSource {
    config: SourceConfig,
}

impl NetcdfFieldSource {
    /// Creates a source after validating `config`.
    pub fn new(config: SourceConfig) -> Result<Self, IoError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn window(&self) -> Window {
        Window {
            domain: self.config.domain,
            offset: self.config.crop,
        }
    }
}

impl FieldSource for NetcdfFieldSource {
    fn read_field(
        &self,
        date: NaiveDateTime,
        lead_hours: f64,
        member: usize,
        variable: &str,
    ) -> Result<Array2<f64>, IoError> {
        let path = self.config.member_path(date, member);
        debug!(path = %path.display(), variable, lead_hours, "reading field");
        let file = netcdf_read::open_file(&path)?;
        let t = netcdf_read::time_index(&file, lead_hours, &path)?;
        netcdf_read::read_slab(&file, variable, t, self.config.level, self.window(), &path)
    }

    fn read_mask(&self, date: NaiveDateTime, lead_hours: f64) -> Result<Option<Array2<bool>>, IoError> {
        let Some(mask_file) = &self.config.mask_file else {
            return Ok(None);
        };
        let path = self.config.date_dir(date).join(mask_file);
        let file = netcdf_read::open_file(&path)?;
        let static_mask = file
            .variable(&self.config.mask_var)
            .is_some_and(|v| v.dimensions().len() == 2);
        let t = if static_mask {
            0
        } else {
            netcdf_read::time_index(&file, lead_hours, &path)?
        };
        let raw = netcdf_read::read_slab(&file, &self.config.mask_var, t, None, self.window(), &path)?;
        Ok(Some(raw.mapv(|v| v.is_finite() && v != 0.0)))
    }
}

/// In-memory [`FieldSource`], keyed by `(date, lead, member, variable)`.
///
/// Absent entries behave like absent files.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    fields: HashMap<(NaiveDateTime, i64, usize, String), Array2<f64>>,
    masks: HashMap<(NaiveDateTime, i64), Array2<bool>>,
}

fn lead_key(lead_hours: f64) -> i64 {
    (lead_hours * 1000.0).round() as i64
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a field.
    pub fn insert_field(
        &mut self,
        date: NaiveDateTime,
        lead_hours: f64,
        member: usize,
        variable: &str,
        field: Array2<f64>,
    ) {
        self.fields
            .insert((date, lead_key(lead_hours), member, variable.to_string()), field);
    }

    /// Stores an exclusion mask.
    pub fn insert_mask(&mut self, date: NaiveDateTime, lead_hours: f64, mask: Array2<bool>) {
        self.masks.insert((date, lead_key(lead_hours)), mask);
    }

    fn pseudo_path(date: NaiveDateTime, member: usize) -> PathBuf {
        Path::new("memory")
            .join(date.format("%Y%m%d%H").to_string())
            .join(format!("{:02}", member + 1))
    }
}

impl FieldSource for MemorySource {
    fn read_field(
        &self,
        date: NaiveDateTime,
        lead_hours: f64,
        member: usize,
        variable: &str,
    ) -> Result<Array2<f64>, IoError> {
        let key = (date, lead_key(lead_hours), member, variable.to_string());
        let field = self.fields.get(&key).ok_or_else(|| IoError::FileNotFound {
            path: Self::pseudo_path(date, member),
        })?;
        if !field.iter().any(|v| v.is_finite()) {
            return Err(IoError::CorruptData {
                name: variable.to_string(),
                path: Self::pseudo_path(date, member),
            });
        }
        Ok(field.clone())
    }

    fn read_mask(&self, date: NaiveDateTime, lead_hours: f64) -> Result<Option<Array2<bool>>, IoError> {
        Ok(self.masks.get(&(date, lead_key(lead_hours))).cloned())
    }
}
