//! Cloud object identification.
//!
//! A cloud object is a maximal connected set of grid cells whose field value
//! exceeds a threshold (and, optionally, whose gate field exceeds a second
//! threshold). This crate labels such objects and reduces them to per-object
//! aggregates.
//!
//! # Quick start
//!
//! ```
//! use cirrus_objects::{LabelConfig, identify};
//! use ndarray::array;
//!
//! let field = array![
//!     [0.0, 2.0, 0.0, 0.0],
//!     [0.0, 2.0, 0.0, 3.0],
//!     [0.0, 0.0, 0.0, 3.0],
//! ];
//! let config = LabelConfig::new(1.0);
//! let (labels, objects) = identify(field.view(), None, None, &config).unwrap();
//!
//! assert_eq!(labels.n_objects(), 2);
//! assert_eq!(objects.sizes(), &[2.0, 2.0]);
//! assert_eq!(objects.sums(), &[4.0, 6.0]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! identify()
//!   ├─ label()          (label.rs)
//!   │    ├─ candidate mask (threshold + gate)
//!   │    ├─ connected components over the footprint
//!   │    └─ watershed separation (watershed.rs, water = true)
//!   └─ aggregate()      (aggregate.rs)
//! ```

pub mod aggregate;
pub mod error;
pub mod footprint;
pub mod label;

pub(crate) mod watershed;

pub use aggregate::{CloudObjects, aggregate, identify};
pub use error::ObjectsError;
pub use footprint::Footprint;
pub use label::{LabelConfig, LabelMap, label};
