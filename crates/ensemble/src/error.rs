//! Error types for cirrus-ensemble.

use cirrus_coarse::CoarseError;
use cirrus_io::IoError;
use cirrus_objects::ObjectsError;
use cirrus_rdf::RdfError;
use cirrus_stats::StatsError;

/// Error type for all fallible operations in the cirrus-ensemble crate.
///
/// Every variant is fatal for the sweep. Recoverable missing member data
/// never surfaces here; it is logged and the member is dropped.
#[derive(Debug, thiserror::Error)]
pub enum EnsembleError {
    /// Returned when the analysis kind is not recognised.
    #[error("unknown analysis kind '{name}' (expected 'm' or 'prec')")]
    UnknownKind {
        /// The rejected name.
        name: String,
    },

    /// Returned when a date string is not of the form `YYYYMMDDHH`.
    #[error("invalid date '{value}': expected YYYYMMDDHH")]
    InvalidDate {
        /// The rejected string.
        value: String,
    },

    /// Returned when the sweep configuration is inconsistent.
    #[error("invalid configuration: {reason}")]
    Configuration {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when reading archive data fails with a structural error.
    #[error("{context}: {source}")]
    Read {
        /// Date, time, member and variable being read.
        context: String,
        /// The underlying read error.
        #[source]
        source: IoError,
    },

    /// Returned when object identification fails.
    #[error("{context}: {source}")]
    Objects {
        /// Date, time and member being analysed.
        context: String,
        /// The underlying error.
        #[source]
        source: ObjectsError,
    },

    /// Returned when RDF estimation fails.
    #[error("{context}: {source}")]
    Rdf {
        /// Date and time being analysed.
        context: String,
        /// The underlying error.
        #[source]
        source: RdfError,
    },

    /// Returned when coarse-graining fails.
    #[error("{context}: {source}")]
    Coarse {
        /// Date and time being analysed.
        context: String,
        /// The underlying error.
        #[source]
        source: CoarseError,
    },

    /// Returned when histogram bin edges are invalid.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Returned when writing to the result store fails.
    #[error("writing results: {0}")]
    Output(#[from] IoError),
}
