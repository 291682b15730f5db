//! Sweep configuration.

use chrono::NaiveDateTime;
use cirrus_coarse::CoarseConfig;
use cirrus_objects::{Footprint, LabelConfig};
use cirrus_rdf::RdfConfig;
use cirrus_stats::BinEdges;

use crate::error::EnsembleError;
use crate::kind::FieldKind;

/// Bin edges of the per-member cloud size and cloud sum histograms.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudHistogramEdges {
    /// Edges for object sizes (cells).
    pub size: BinEdges,
    /// Edges for object sums (after area scaling).
    pub sum: BinEdges,
}

/// Bin edges of the conditional `m` histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct CondHistogramEdges {
    /// Edges for the box mean of `m`.
    pub mean_m: BinEdges,
    /// Edges for individual object sums.
    pub m: BinEdges,
}

/// Configuration of [`run_sweep`](crate::run_sweep).
#[derive(Debug, Clone)]
pub struct SweepConfig {
    kind: FieldKind,
    dates: Vec<NaiveDateTime>,
    leads: Vec<f64>,
    n_members: usize,
    domain: (usize, usize),
    dx: f64,
    label: LabelConfig,
    rdf: Option<RdfConfig>,
    coarse: CoarseConfig,
    separation: Option<LabelConfig>,
    cloud_histograms: Option<CloudHistogramEdges>,
    separated_histograms: Option<CloudHistogramEdges>,
    field_histogram: Option<BinEdges>,
    cond_histogram: Option<CondHistogramEdges>,
    scaling: bool,
    parallel_members: bool,
}

impl SweepConfig {
    /// Creates a configuration for `n_members` members on a `(rows, cols)`
    /// domain.
    ///
    /// Defaults: no dates or lead times, `dx = 1`, no RDF, default coarse
    /// scales, no separated clouds, no histograms, no scaling ratios,
    /// sequential members. The gate
    /// threshold of `label` is replaced by the one of `kind`.
    pub fn new(kind: FieldKind, label: LabelConfig, n_members: usize, domain: (usize, usize)) -> Self {
        let label = match kind.gate_threshold() {
            Some(t) => label.with_gate_threshold(t),
            None => label,
        };
        Self {
            kind,
            dates: Vec::new(),
            leads: Vec::new(),
            n_members,
            domain,
            dx: 1.0,
            label,
            rdf: None,
            coarse: CoarseConfig::default(),
            separation: None,
            cloud_histograms: None,
            separated_histograms: None,
            field_histogram: None,
            cond_histogram: None,
            scaling: false,
            parallel_members: false,
        }
    }

    /// Sets the initialisation dates and lead times (hours).
    pub fn with_schedule(mut self, dates: Vec<NaiveDateTime>, leads: Vec<f64>) -> Self {
        self.dates = dates;
        self.leads = leads;
        self
    }

    /// Sets the grid spacing in metres.
    pub fn with_dx(mut self, dx: f64) -> Self {
        self.dx = dx;
        self
    }

    /// Enables RDF estimation.
    pub fn with_rdf(mut self, rdf: Option<RdfConfig>) -> Self {
        self.rdf = rdf;
        self
    }

    /// Sets the coarse-graining configuration.
    pub fn with_coarse(mut self, coarse: CoarseConfig) -> Self {
        self.coarse = coarse;
        self
    }

    /// Enables the per-member cloud histograms.
    pub fn with_cloud_histograms(mut self, edges: Option<CloudHistogramEdges>) -> Self {
        self.cloud_histograms = edges;
        self
    }

    /// Enables the separated-cloud analysis: every member is labeled a second
    /// time with watershed separation over `footprint`.
    ///
    /// The regular labeling keeps its own configuration. Call after
    /// [`new`](Self::new); the separated labeling copies the threshold and
    /// gate threshold of the regular one.
    pub fn with_separation(mut self, footprint: Option<Footprint>) -> Self {
        self.separation = footprint.map(|f| self.label.clone().with_water(true).with_footprint(f));
        self
    }

    /// Enables the per-member histograms of separated clouds.
    pub fn with_separated_histograms(mut self, edges: Option<CloudHistogramEdges>) -> Self {
        self.separated_histograms = edges;
        self
    }

    /// Enables the per-member histogram of the masked field values.
    pub fn with_field_histogram(mut self, edges: Option<BinEdges>) -> Self {
        self.field_histogram = edges;
        self
    }

    /// Enables the conditional `m` histogram.
    pub fn with_cond_histogram(mut self, edges: Option<CondHistogramEdges>) -> Self {
        self.cond_histogram = edges;
        self
    }

    /// Enables the scaling-ratio outputs.
    pub fn with_scaling(mut self, scaling: bool) -> Self {
        self.scaling = scaling;
        self
    }

    /// Runs the per-member analysis of each time step on the rayon pool.
    pub fn with_parallel_members(mut self, parallel: bool) -> Self {
        self.parallel_members = parallel;
        self
    }

    /// Returns the analysis kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the initialisation dates.
    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    /// Returns the lead times in hours.
    pub fn leads(&self) -> &[f64] {
        &self.leads
    }

    /// Returns the ensemble size.
    pub fn n_members(&self) -> usize {
        self.n_members
    }

    /// Returns the `(rows, cols)` domain.
    pub fn domain(&self) -> (usize, usize) {
        self.domain
    }

    /// Returns the grid spacing in metres.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Returns the labeling configuration.
    pub fn label(&self) -> &LabelConfig {
        &self.label
    }

    /// Returns the RDF configuration, if enabled.
    pub fn rdf(&self) -> Option<&RdfConfig> {
        self.rdf.as_ref()
    }

    /// Returns the coarse-graining configuration.
    pub fn coarse(&self) -> &CoarseConfig {
        &self.coarse
    }

    /// Returns the cloud histogram edges, if enabled.
    pub fn cloud_histograms(&self) -> Option<&CloudHistogramEdges> {
        self.cloud_histograms.as_ref()
    }

    /// Labeling configuration of the separated clouds, if enabled.
    pub fn separation(&self) -> Option<&LabelConfig> {
        self.separation.as_ref()
    }

    pub fn separated_histograms(&self) -> Option<&CloudHistogramEdges> {
        self.separated_histograms.as_ref()
    }

    pub fn field_histogram(&self) -> Option<&BinEdges> {
        self.field_histogram.as_ref()
    }

    /// Returns the conditional histogram edges, if enabled.
    pub fn cond_histogram(&self) -> Option<&CondHistogramEdges> {
        self.cond_histogram.as_ref()
    }

    /// Returns whether scaling ratios are written.
    pub fn scaling(&self) -> bool {
        self.scaling
    }

    /// Returns whether members are analysed in parallel.
    pub fn parallel_members(&self) -> bool {
        self.parallel_members
    }

    /// Validates the configuration, collecting every problem.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::Configuration`] listing all problems.
    pub fn validate(&self) -> Result<(), EnsembleError> {
        let mut problems = Vec::new();
        if self.dates.is_empty() {
            problems.push("no dates".to_string());
        }
        if self.leads.is_empty() {
            problems.push("no lead times".to_string());
        }
        if self.n_members == 0 {
            problems.push("no members".to_string());
        }
        if self.domain.0 == 0 || self.domain.1 == 0 {
            problems.push(format!("domain must be non-empty, got {:?}", self.domain));
        }
        if !(self.dx.is_finite() && self.dx > 0.0) {
            problems.push(format!("dx must be positive and finite, got {}", self.dx));
        }
        if let Err(e) = self.label.validate() {
            problems.push(e.to_string());
        }
        if let Some(sep) = &self.separation
            && let Err(e) = sep.validate()
        {
            problems.push(format!("separation: {e}"));
        }
        if self.separated_histograms.is_some() && self.separation.is_none() {
            problems.push("separated histograms need a separation footprint".to_string());
        }
        if let Some(rdf) = &self.rdf
            && let Err(e) = rdf.validate()
        {
            problems.push(e.to_string());
        }
        if self.coarse.min_object_count() == 0 {
            problems.push("min_object_count must be at least 1".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(EnsembleError::Configuration {
                reason: problems.join("; "),
            })
        }
    }
}
