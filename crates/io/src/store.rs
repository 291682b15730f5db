//! Named-variable result containers.

use std::collections::BTreeMap;

use crate::error::IoError;

/// Pre-declared container of named, dimensioned `f64` variables.
///
/// Dimensions carry coordinate values and never grow. Variables are filled
/// with NaN when declared; [`write`](ResultStore::write) stores a slab at a
/// leading index prefix.
pub trait ResultStore {
    /// Declares a dimension with its coordinate values.
    fn add_dimension(&mut self, name: &str, coords: Vec<f64>) -> Result<(), IoError>;

    /// Declares a NaN-filled variable over previously declared dimensions.
    fn add_variable(&mut self, name: &str, dims: &[&str]) -> Result<(), IoError>;

    /// Writes `values` into the slab addressed by `prefix`.
    ///
    /// `values` must hold exactly the product of the remaining dimension
    /// lengths, in row-major order.
    fn write(&mut self, name: &str, prefix: &[usize], values: &[f64]) -> Result<(), IoError>;

    /// Sets a global text attribute.
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), IoError>;

    /// Flushes the container to its backing storage.
    fn finish(&mut self) -> Result<(), IoError>;
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Dimension {
    pub(crate) name: String,
    pub(crate) coords: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Variable {
    pub(crate) dims: Vec<String>,
    pub(crate) shape: Vec<usize>,
    pub(crate) data: Vec<f64>,
}

/// Shared buffer behind [`MemoryStore`] and the NetCDF store.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Container {
    pub(crate) dimensions: Vec<Dimension>,
    pub(crate) variables: BTreeMap<String, Variable>,
    pub(crate) attributes: BTreeMap<String, String>,
}

impl Container {
    fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub(crate) fn add_dimension(&mut self, name: &str, coords: Vec<f64>) -> Result<(), IoError> {
        if self.dimension(name).is_some() {
            return Err(IoError::Validation {
                count: 1,
                details: format!("dimension '{name}' declared twice"),
            });
        }
        self.dimensions.push(Dimension {
            name: name.to_string(),
            coords,
        });
        Ok(())
    }

    pub(crate) fn add_variable(&mut self, name: &str, dims: &[&str]) -> Result<(), IoError> {
        if self.variables.contains_key(name) {
            return Err(IoError::Validation {
                count: 1,
                details: format!("variable '{name}' declared twice"),
            });
        }
        let shape = dims
            .iter()
            .map(|&d| {
                self.dimension(d)
                    .map(|dim| dim.coords.len())
                    .ok_or_else(|| IoError::Validation {
                        count: 1,
                        details: format!("variable '{name}' uses undeclared dimension '{d}'"),
                    })
            })
            .collect::<Result<Vec<usize>, IoError>>()?;
        let len = shape.iter().product();
        self.variables.insert(
            name.to_string(),
            Variable {
                dims: dims.iter().map(|d| d.to_string()).collect(),
                shape,
                data: vec![f64::NAN; len],
            },
        );
        Ok(())
    }

    pub(crate) fn write(&mut self, name: &str, prefix: &[usize], values: &[f64]) -> Result<(), IoError> {
        let var = self
            .variables
            .get_mut(name)
            .ok_or_else(|| IoError::UnknownVariable {
                name: name.to_string(),
            })?;
        if prefix.len() > var.shape.len() {
            return Err(IoError::DimensionMismatch {
                name: format!("{name} index prefix"),
                expected: var.shape.len(),
                got: prefix.len(),
            });
        }
        let mut offset = 0;
        for (axis, (&index, &len)) in prefix.iter().zip(&var.shape).enumerate() {
            if index >= len {
                return Err(IoError::IndexOutOfRange {
                    name: name.to_string(),
                    axis,
                    index,
                    len,
                });
            }
            offset = offset * len + index;
        }
        let slab: usize = var.shape[prefix.len()..].iter().product();
        if values.len() != slab {
            return Err(IoError::DimensionMismatch {
                name: format!("{name} slab"),
                expected: slab,
                got: values.len(),
            });
        }
        let start = offset * slab;
        var.data[start..start + slab].copy_from_slice(values);
        Ok(())
    }
}

/// In-memory [`ResultStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    inner: Container,
    finished: bool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinate values of a dimension.
    pub fn coords(&self, dim: &str) -> Option<&[f64]> {
        self.inner.dimension(dim).map(|d| d.coords.as_slice())
    }

    /// Shape of a variable.
    pub fn shape(&self, name: &str) -> Option<&[usize]> {
        self.inner.variables.get(name).map(|v| v.shape.as_slice())
    }

    /// Dimension names of a variable.
    pub fn dims(&self, name: &str) -> Option<Vec<&str>> {
        self.inner
            .variables
            .get(name)
            .map(|v| v.dims.iter().map(String::as_str).collect())
    }

    /// Flat row-major data of a variable.
    pub fn values(&self, name: &str) -> Option<&[f64]> {
        self.inner.variables.get(name).map(|v| v.data.as_slice())
    }

    /// Single value at a full index.
    pub fn get(&self, name: &str, index: &[usize]) -> Option<f64> {
        let var = self.inner.variables.get(name)?;
        if index.len() != var.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &len) in index.iter().zip(&var.shape) {
            if i >= len {
                return None;
            }
            offset = offset * len + i;
        }
        Some(var.data[offset])
    }

    /// Global attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.inner.attributes.get(name).map(String::as_str)
    }

    /// Declared variable names, sorted.
    pub fn variable_names(&self) -> Vec<&str> {
        self.inner.variables.keys().map(String::as_str).collect()
    }

    /// Returns `true` once [`finish`](ResultStore::finish) was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ResultStore for MemoryStore {
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
        self.finished = true;
        Ok(())
    }
}
