//! # cirrus-io
//!
//! Read ensemble member fields from NetCDF archives and write analysis
//! results to named-variable stores. Bridges external file formats into the
//! `ndarray` views consumed by the analysis crates.
//!
//! # Architecture
//!
//! ```text
//! FieldSource ── NetcdfFieldSource   (<root>/<YYYYMMDDHH>/<prefix><NN>.nc)
//!             └─ MemorySource        (tests, synthetic drivers)
//!
//! ResultStore ── NetcdfStore         (buffered, written on finish)
//!             └─ MemoryStore
//! ```

mod error;
mod netcdf_read;
mod reader;
mod store;
mod writer;

pub use error::IoError;
pub use reader::{FieldSource, MemorySource, NetcdfFieldSource, SourceConfig};
pub use store::{MemoryStore, ResultStore};
pub use writer::NetcdfStore;
