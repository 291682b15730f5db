//! # cirrus-ensemble
//!
//! Ensemble statistics sweep: for every initialisation date, lead time and
//! member, identify cloud objects, estimate radial distribution functions and
//! coarse-grain the object statistics across the ensemble, writing every
//! result into a pre-declared [`ResultStore`](cirrus_io::ResultStore).
//!
//! # Quick start
//!
//! ```no_run
//! use cirrus_ensemble::{FieldKind, SweepConfig, date_range, lead_times, parse_date, run_sweep};
//! use cirrus_io::{NetcdfFieldSource, NetcdfStore, SourceConfig};
//! use cirrus_objects::LabelConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dates = date_range(parse_date("2016052800")?, parse_date("2016053000")?)?;
//! let config = SweepConfig::new(FieldKind::Precipitation, LabelConfig::new(1.0), 20, (256, 256))
//!     .with_schedule(dates, lead_times(1, 24, 1)?)
//!     .with_dx(2800.0);
//! let source = NetcdfFieldSource::new(SourceConfig::new("/archive", (256, 256)))?;
//! let mut store = NetcdfStore::create("variance.nc")?;
//! let summary = run_sweep(&config, &source, &mut store)?;
//! println!("{} steps, {} members dropped", summary.steps, summary.members_dropped);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! run_sweep
//!   └─ per (date, time)
//!        ├─ read mask           (missing → skip step)
//!        ├─ read members        (missing → drop member)
//!        ├─ analyse members     (label, aggregate, RDF, regular and
//!        │                       separated clouds; optionally rayon)
//!        ├─ rdf / rdf_sep, cloud histograms, field frequency
//!        └─ accumulate          (box statistics, TTENS, scaling ratios,
//!                                conditional histogram)
//! ```

mod config;
mod dates;
mod error;
mod kind;
mod layout;
mod member;
mod sweep;

pub use config::{CloudHistogramEdges, CondHistogramEdges, SweepConfig};
pub use dates::{date_coordinate, date_range, format_date, lead_times, parse_date};
pub use error::EnsembleError;
pub use kind::FieldKind;
pub use layout::{AUXILIARY_VARIABLES, BOX_DIMS, BOX_VARIABLES, CORRELATION_VARIABLE, SCALING_VARIABLES};
pub use sweep::{SweepSummary, run_sweep};
