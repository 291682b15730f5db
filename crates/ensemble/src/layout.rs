//! Output dimensions and variables.

use cirrus_io::{IoError, ResultStore};

use crate::config::SweepConfig;
use crate::dates::date_coordinate;

/// Box statistics over `[date, time, n, x, y]`.
pub const BOX_VARIABLES: [&str; 6] = ["mean_N", "var_N", "mean_M", "var_M", "mean_m", "var_m"];
/// Correlation between member mean `m` and `N`.
pub const CORRELATION_VARIABLE: &str = "corr_m_N";
/// Auxiliary-field box statistics.
pub const AUXILIARY_VARIABLES: [&str; 2] = ["mean_TTENS", "var_TTENS"];
/// Scaling ratios.
pub const SCALING_VARIABLES: [&str; 6] = ["r_v", "alpha", "beta", "r_v_alpha", "r_v_beta", "r_v_alpha_beta"];

/// Dimensions of every box variable.
pub const BOX_DIMS: [&str; 5] = ["date", "time", "n", "x", "y"];

/// Which optional outputs a sweep writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) rdf: bool,
    pub(crate) rdf_separated: bool,
    pub(crate) auxiliary: bool,
    pub(crate) correlation: bool,
    pub(crate) scaling: bool,
    pub(crate) field_histogram: bool,
}

impl Layout {
    pub(crate) fn of(config: &SweepConfig) -> Self {
        Self {
            rdf: config.rdf().is_some(),
            rdf_separated: config.rdf().is_some() && config.separation().is_some(),
            auxiliary: config.kind().auxiliary_variable().is_some(),
            correlation: config.coarse().correlation(),
            scaling: config.scaling(),
            field_histogram: config.field_histogram().is_some(),
        }
    }

    /// Every box variable this sweep writes.
    pub(crate) fn box_variables(&self) -> Vec<&'static str> {
        let mut names = BOX_VARIABLES.to_vec();
        if self.correlation {
            names.push(CORRELATION_VARIABLE);
        }
        if self.auxiliary {
            names.extend(AUXILIARY_VARIABLES);
        }
        if self.scaling {
            names.extend(SCALING_VARIABLES);
        }
        names
    }
}

/// Declares every dimension and variable of the sweep in `store`.
pub(crate) fn declare<R: ResultStore>(store: &mut R, config: &SweepConfig) -> Result<Layout, IoError> {
    let layout = Layout::of(config);
    let (rows, cols) = config.domain();

    store.add_dimension("date", config.dates().iter().map(|&d| date_coordinate(d)).collect())?;
    store.add_dimension("time", config.leads().to_vec())?;
    store.add_dimension(
        "n",
        config.coarse().scales().as_slice().iter().map(|&n| n as f64).collect(),
    )?;
    store.add_dimension("x", (0..rows).map(|i| i as f64).collect())?;
    store.add_dimension("y", (0..cols).map(|j| j as f64).collect())?;
    store.add_dimension("ens", (1..=config.n_members()).map(|e| e as f64).collect())?;

    for name in layout.box_variables() {
        store.add_variable(name, &BOX_DIMS)?;
    }

    if let Some(rdf) = config.rdf() {
        store.add_dimension("rdf_radius", rdf.radii())?;
        store.add_variable("rdf", &["date", "time", "rdf_radius"])?;
        store.add_variable("rdf_member", &["date", "time", "rdf_radius", "ens"])?;
        if layout.rdf_separated {
            store.add_variable("rdf_sep", &["date", "time", "rdf_radius"])?;
            store.add_variable("rdf_sep_member", &["date", "time", "rdf_radius", "ens"])?;
        }
    }

    if let Some(edges) = config.cloud_histograms() {
        store.add_dimension("size_bin", edges.size.upper_edges().to_vec())?;
        store.add_dimension("sum_bin", edges.sum.upper_edges().to_vec())?;
        store.add_variable("cld_size", &["date", "time", "size_bin", "ens"])?;
        store.add_variable("cld_sum", &["date", "time", "sum_bin", "ens"])?;
        store.add_variable("cld_size_mean", &["date", "time", "ens"])?;
        store.add_variable("cld_sum_mean", &["date", "time", "ens"])?;
    }

    if let Some(edges) = config.separated_histograms() {
        store.add_dimension("size_sep_bin", edges.size.upper_edges().to_vec())?;
        store.add_dimension("sum_sep_bin", edges.sum.upper_edges().to_vec())?;
        store.add_variable("cld_size_sep", &["date", "time", "size_sep_bin", "ens"])?;
        store.add_variable("cld_sum_sep", &["date", "time", "sum_sep_bin", "ens"])?;
        store.add_variable("cld_size_sep_mean", &["date", "time", "ens"])?;
        store.add_variable("cld_sum_sep_mean", &["date", "time", "ens"])?;
    }

    if let Some(edges) = config.field_histogram() {
        store.add_dimension("prec_freq_bin", edges.upper_edges().to_vec())?;
        store.add_variable("prec_freq", &["date", "time", "prec_freq_bin", "ens"])?;
    }

    if let Some(edges) = config.cond_histogram() {
        store.add_dimension("mean_m_bin", edges.mean_m.upper_edges().to_vec())?;
        store.add_dimension("m_bin", edges.m.upper_edges().to_vec())?;
        store.add_variable("cond_m_hist", &["n", "mean_m_bin", "m_bin"])?;
    }

    Ok(layout)
}
