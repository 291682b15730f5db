//! Analysis kind: which archive variables feed the sweep.

use std::fmt;
use std::str::FromStr;

use crate::error::EnsembleError;

/// The quantity whose clouds are analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Convective mass flux: vertical velocity gated by condensate,
    /// weighted by density and scaled by the cell area.
    MassFlux,
    /// Accumulated precipitation.
    Precipitation,
}

impl FieldKind {
    /// Short name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::MassFlux => "m",
            FieldKind::Precipitation => "prec",
        }
    }

    /// Variable that is thresholded.
    pub fn primary_variable(self) -> &'static str {
        match self {
            FieldKind::MassFlux => "W",
            FieldKind::Precipitation => "PREC_ACCUM",
        }
    }

    /// Variables summed into the gate field. Empty when ungated.
    pub fn gate_variables(self) -> &'static [&'static str] {
        match self {
            FieldKind::MassFlux => &["QC", "QI", "QS"],
            FieldKind::Precipitation => &[],
        }
    }

    /// Gate threshold applied to the summed gate field.
    pub fn gate_threshold(self) -> Option<f64> {
        match self {
            FieldKind::MassFlux => Some(0.0),
            FieldKind::Precipitation => None,
        }
    }

    /// Density weighting the object sums.
    pub fn density_variable(self) -> Option<&'static str> {
        match self {
            FieldKind::MassFlux => Some("RHO"),
            FieldKind::Precipitation => None,
        }
    }

    /// Whether object sums are multiplied by `dx²`.
    pub fn area_scaled(self) -> bool {
        matches!(self, FieldKind::MassFlux)
    }

    /// Field whose box means are reported alongside the object statistics.
    pub fn auxiliary_variable(self) -> Option<&'static str> {
        match self {
            FieldKind::MassFlux => Some("TTENS_MPHY"),
            FieldKind::Precipitation => None,
        }
    }
}

impl FromStr for FieldKind {
    type Err = EnsembleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(FieldKind::MassFlux),
            "prec" => Ok(FieldKind::Precipitation),
            other => Err(EnsembleError::UnknownKind {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
