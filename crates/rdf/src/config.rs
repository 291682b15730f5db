//! Configuration for radial distribution function estimation.

use crate::error::RdfError;

/// Which points enter the pair histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RdfMethod {
    /// Every occupied grid cell is a point; expected counts come from the
    /// valid area at each distance.
    #[default]
    Raster,
    /// Object centers of mass are points; only centers whose full disk lies
    /// inside the valid domain serve as reference points.
    Centroid,
}

/// Configuration for [`compute_rdf`](crate::compute_rdf).
///
/// Radii are in grid cells; `grid_spacing` only scales the reported radii.
/// `min_coverage` has no default.
///
/// # Example
///
/// ```
/// use cirrus_rdf::{RdfConfig, RdfMethod};
///
/// let config = RdfConfig::new(30.0, 2.0, 0.0)
///     .with_grid_spacing(2800.0)
///     .with_method(RdfMethod::Centroid);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.n_bins(), 15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RdfConfig {
    /// Largest radius considered (exclusive), in grid cells.
    max_radius: f64,
    /// Width of each radius bin, in grid cells.
    bin_width: f64,
    /// Physical size of one grid cell.
    grid_spacing: f64,
    /// Return density ratios instead of raw pair counts.
    normalize: bool,
    /// The RDF is computed only if occupied/valid coverage exceeds this.
    min_coverage: f64,
    /// Point set used for the pair histogram.
    method: RdfMethod,
}

impl RdfConfig {
    /// Creates a configuration.
    ///
    /// Defaults: `grid_spacing = 1.0`, `normalize = true`, `method = Raster`.
    pub fn new(max_radius: f64, bin_width: f64, min_coverage: f64) -> Self {
        Self {
            max_radius,
            bin_width,
            grid_spacing: 1.0,
            normalize: true,
            min_coverage,
            method: RdfMethod::Raster,
        }
    }

    /// Sets the physical grid spacing.
    pub fn with_grid_spacing(mut self, grid_spacing: f64) -> Self {
        self.grid_spacing = grid_spacing;
        self
    }

    /// Enables or disables normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Sets the point method.
    pub fn with_method(mut self, method: RdfMethod) -> Self {
        self.method = method;
        self
    }

    /// Returns the maximum radius in grid cells.
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Returns the bin width in grid cells.
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Returns the physical grid spacing.
    pub fn grid_spacing(&self) -> f64 {
        self.grid_spacing
    }

    /// Returns whether results are normalized.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Returns the minimum coverage.
    pub fn min_coverage(&self) -> f64 {
        self.min_coverage
    }

    /// Returns the point method.
    pub fn method(&self) -> RdfMethod {
        self.method
    }

    /// Number of radius bins, `floor(max_radius / bin_width)`.
    pub fn n_bins(&self) -> usize {
        (self.max_radius / self.bin_width).floor() as usize
    }

    /// Bin centers in physical units.
    pub fn radii(&self) -> Vec<f64> {
        (0..self.n_bins())
            .map(|i| (i as f64 + 0.5) * self.bin_width * self.grid_spacing)
            .collect()
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), RdfError> {
        if !self.max_radius.is_finite() || self.max_radius <= 0.0 {
            return Err(RdfError::InvalidMaxRadius {
                value: self.max_radius,
            });
        }
        if !self.bin_width.is_finite() || self.bin_width <= 0.0 {
            return Err(RdfError::InvalidBinWidth {
                value: self.bin_width,
            });
        }
        if self.n_bins() == 0 {
            return Err(RdfError::NoBins {
                max_radius: self.max_radius,
                bin_width: self.bin_width,
            });
        }
        if !self.grid_spacing.is_finite() || self.grid_spacing <= 0.0 {
            return Err(RdfError::InvalidGridSpacing {
                value: self.grid_spacing,
            });
        }
        if !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(RdfError::InvalidCoverage {
                value: self.min_coverage,
            });
        }
        Ok(())
    }
}
