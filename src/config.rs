use std::path::PathBuf;

use serde::Deserialize;

/// Top-level Cirrus configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CirrusConfig {
    /// Archive and output settings.
    pub io: IoToml,

    /// Analysis domain.
    pub domain: DomainToml,

    /// Initialisation dates and lead times.
    pub dates: DatesToml,

    /// Ensemble and analysed field.
    #[serde(default)]
    pub ensemble: EnsembleToml,

    /// Object identification.
    #[serde(default)]
    pub objects: ObjectsToml,

    /// Radial distribution function; omitted means no RDF output.
    #[serde(default)]
    pub rdf: Option<RdfToml>,

    /// Coarse-graining.
    #[serde(default)]
    pub coarse: CoarseToml,

    /// Optional histogram outputs.
    #[serde(default)]
    pub histograms: HistogramsToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub root: PathBuf,
    pub output: Option<PathBuf>,
    #[serde(default = "default_member_prefix")]
    pub member_prefix: String,
    #[serde(default)]
    pub crop: Option<[usize; 2]>,
    #[serde(default)]
    pub level: Option<usize>,
    #[serde(default)]
    pub mask_file: Option<String>,
    #[serde(default = "default_mask_var")]
    pub mask_var: String,
}

fn default_member_prefix() -> String {
    "mem".to_string()
}
fn default_mask_var() -> String {
    "mask".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainToml {
    pub rows: usize,
    pub cols: usize,
    /// Grid spacing in metres.
    #[serde(default = "default_dx")]
    pub dx: f64,
}

fn default_dx() -> f64 {
    2800.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatesToml {
    /// First initialisation date, `YYYYMMDDHH`.
    pub start: String,
    /// Last initialisation date, `YYYYMMDDHH`, inclusive.
    pub end: String,
    #[serde(default = "default_time_start")]
    pub time_start: u32,
    #[serde(default = "default_time_end")]
    pub time_end: u32,
    #[serde(default = "default_time_inc")]
    pub time_inc: u32,
}

fn default_time_start() -> u32 {
    1
}
fn default_time_end() -> u32 {
    24
}
fn default_time_inc() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnsembleToml {
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_n_members")]
    pub n_members: usize,
    #[serde(default)]
    pub parallel_members: bool,
}

impl Default for EnsembleToml {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            n_members: default_n_members(),
            parallel_members: false,
        }
    }
}

fn default_kind() -> String {
    "prec".to_string()
}
fn default_n_members() -> usize {
    20
}

/// Neighborhood footprint: `"cross"`, an odd square size, or a 0/1 matrix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FootprintToml {
    Named(String),
    Size(usize),
    Matrix(Vec<Vec<u8>>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectsToml {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub water: bool,
    #[serde(default = "default_footprint")]
    pub footprint: FootprintToml,
    /// Footprint of the second, watershed-separated labeling; omitted means
    /// no separated clouds.
    #[serde(default)]
    pub separation: Option<FootprintToml>,
}

impl Default for ObjectsToml {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            water: false,
            footprint: default_footprint(),
            separation: None,
        }
    }
}

fn default_threshold() -> f64 {
    1.0
}
fn default_footprint() -> FootprintToml {
    FootprintToml::Named("cross".to_string())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RdfToml {
    /// Largest radius, in grid cells.
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
    #[serde(default = "default_bin_width")]
    pub bin_width: f64,
    /// Minimum occupied fraction of valid cells; no default.
    pub min_coverage: f64,
    #[serde(default = "default_true")]
    pub normalize: bool,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_max_radius() -> f64 {
    30.0
}
fn default_bin_width() -> f64 {
    2.0
}
fn default_true() -> bool {
    true
}
fn default_method() -> String {
    "raster".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoarseToml {
    #[serde(default = "default_scales")]
    pub scales: Vec<usize>,
    #[serde(default = "default_min_object_count")]
    pub min_object_count: usize,
    #[serde(default = "default_true")]
    pub correlation: bool,
    #[serde(default)]
    pub scaling: bool,
}

impl Default for CoarseToml {
    fn default() -> Self {
        Self {
            scales: default_scales(),
            min_object_count: default_min_object_count(),
            correlation: true,
            scaling: false,
        }
    }
}

fn default_scales() -> Vec<usize> {
    vec![256, 128, 64, 32, 16, 8, 4]
}
fn default_min_object_count() -> usize {
    1
}

/// Bin edges, either explicit or as evenly spaced `linspace` edges.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgesToml {
    #[serde(default)]
    pub edges: Option<Vec<f64>>,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub stop: Option<f64>,
    #[serde(default)]
    pub num: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistogramsToml {
    #[serde(default)]
    pub cloud_size: Option<EdgesToml>,
    #[serde(default)]
    pub cloud_sum: Option<EdgesToml>,
    #[serde(default)]
    pub cloud_size_sep: Option<EdgesToml>,
    #[serde(default)]
    pub cloud_sum_sep: Option<EdgesToml>,
    /// Edges of the per-member histogram of field values.
    #[serde(default)]
    pub prec_freq: Option<EdgesToml>,
    #[serde(default)]
    pub cond_mean_m: Option<EdgesToml>,
    #[serde(default)]
    pub cond_m: Option<EdgesToml>,
}
