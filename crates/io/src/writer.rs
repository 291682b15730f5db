//! NetCDF result store.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::IoError;
use crate::store::{Container, ResultStore};

/// [`ResultStore`] writing a flat NetCDF file on [`finish`](ResultStore::finish).
///
/// Variables are buffered in memory; every dimension also gets a coordinate
/// variable of the same name.
#[derive(Debug, Clone)]
pub struct NetcdfStore {
    path: PathBuf,
    inner: Container,
}

impl NetcdfStore {
    /// Creates a store that will write to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] if the parent directory does not
    /// exist.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, IoError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            return Err(IoError::FileNotFound {
                path: parent.to_path_buf(),
            });
        }
        Ok(Self {
            path,
            inner: Container::default(),
        })
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultStore for NetcdfStore {
    fn add_dimension(&mut self, name: &str, coords: Vec<f64>) -> Result<(), IoError> {
        self.inner.add_dimension(name, coords)
    }

    fn add_variable(&mut self, name: &str, dims: &[&str]) -> Result<(), IoError> {
        self.inner.add_variable(name, dims)
    }

    fn write(&mut self, name: &str, prefix: &[usize], values: &[f64]) -> Result<(), IoError> {
        self.inner.write(name, prefix, values)
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), IoError> {
        self.inner
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), IoError> {
        let mut file = netcdf::create(&self.path)?;

        for dim in &self.inner.dimensions {
            file.add_dimension(&dim.name, dim.coords.len())?;
        }
        for dim in &self.inner.dimensions {
            if self.inner.variables.contains_key(&dim.name) {
                continue;
            }
            let mut var = file.add_variable::<f64>(&dim.name, &[dim.name.as_str()])?;
            var.put_values(&dim.coords, ..)?;
        }
        for (name, v) in &self.inner.variables {
            let dims: Vec<&str> = v.dims.iter().map(String::as_str).collect();
            let mut var = file.add_variable::<f64>(name, &dims)?;
            var.put_attribute("_FillValue", f64::NAN)?;
            var.put_values(&v.data, ..)?;
        }
        for (name, value) in &self.inner.attributes {
            file.add_attribute(name, value.as_str())?;
        }

        info!(
            path = %self.path.display(),
            n_variables = self.inner.variables.len(),
            "wrote result file"
        );
        Ok(())
    }
}
