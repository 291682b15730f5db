//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use cirrus_coarse::{CoarseConfig, ScaleSet};
use cirrus_ensemble::{
    CloudHistogramEdges, CondHistogramEdges, FieldKind, SweepConfig, date_range, lead_times,
    parse_date,
};
use cirrus_io::SourceConfig;
use cirrus_objects::{Footprint, LabelConfig};
use cirrus_rdf::{RdfConfig, RdfMethod};
use cirrus_stats::BinEdges;

/// Parses an analysed-field name (`"m"` or `"prec"`).
pub fn parse_kind(s: &str) -> Result<FieldKind> {
    Ok(s.parse::<FieldKind>()?)
}

/// Parses an RDF point-method name into the corresponding enum variant.
pub fn parse_method(s: &str) -> Result<RdfMethod> {
    match s.to_lowercase().as_str() {
        "raster" => Ok(RdfMethod::Raster),
        "centroid" => Ok(RdfMethod::Centroid),
        other => bail!("unknown rdf method: {other:?}"),
    }
}

/// Converts a TOML footprint into a `Footprint`.
pub fn build_footprint(footprint: &FootprintToml) -> Result<Footprint> {
    match footprint {
        FootprintToml::Named(name) => match name.to_lowercase().as_str() {
            "cross" => Ok(Footprint::cross()),
            other => bail!("unknown footprint: {other:?}"),
        },
        FootprintToml::Size(size) => {
            Footprint::square(*size).with_context(|| format!("invalid footprint size {size}"))
        }
        FootprintToml::Matrix(rows) => {
            Footprint::from_rows(rows).context("invalid footprint matrix")
        }
    }
}

/// Builds the labeling configuration. The gate threshold follows the field kind.
pub fn build_label_config(objects: &ObjectsToml) -> Result<LabelConfig> {
    let config = LabelConfig::new(objects.threshold)
        .with_water(objects.water)
        .with_footprint(build_footprint(&objects.footprint)?);
    config.validate().context("invalid [objects] section")?;
    Ok(config)
}

pub fn build_source_config(io: &IoToml, domain: &DomainToml) -> SourceConfig {
    SourceConfig::new(&io.root, (domain.rows, domain.cols))
        .with_member_prefix(io.member_prefix.clone())
        .with_crop(io.crop.map(|[r, c]| (r, c)))
        .with_level(io.level)
        .with_mask(io.mask_file.clone(), io.mask_var.clone())
}

pub fn build_rdf_config(rdf: &RdfToml, dx: f64) -> Result<RdfConfig> {
    let config = RdfConfig::new(rdf.max_radius, rdf.bin_width, rdf.min_coverage)
        .with_grid_spacing(dx)
        .with_normalize(rdf.normalize)
        .with_method(parse_method(&rdf.method)?);
    config.validate().context("invalid [rdf] section")?;
    Ok(config)
}

pub fn build_coarse_config(coarse: &CoarseToml) -> Result<CoarseConfig> {
    let scales = ScaleSet::new(coarse.scales.clone()).context("invalid [coarse].scales")?;
    Ok(CoarseConfig::new(scales)
        .with_min_object_count(coarse.min_object_count)
        .with_correlation(coarse.correlation))
}

/// Converts TOML bin edges. Exactly one of `edges` or `start`/`stop`/`num`
/// must be given.
pub fn build_edges(edges: &EdgesToml, name: &str) -> Result<BinEdges> {
    let result = match (&edges.edges, edges.start, edges.stop, edges.num) {
        (Some(e), None, None, None) => BinEdges::new(e.clone()),
        (None, Some(start), Some(stop), Some(num)) => BinEdges::linspace(start, stop, num),
        _ => bail!("[histograms].{name} must have either edges or start/stop/num"),
    };
    result.with_context(|| format!("invalid [histograms].{name}"))
}

fn edge_pair(
    a: &Option<EdgesToml>,
    a_name: &str,
    b: &Option<EdgesToml>,
    b_name: &str,
) -> Result<Option<(BinEdges, BinEdges)>> {
    match (a, b) {
        (Some(a), Some(b)) => Ok(Some((build_edges(a, a_name)?, build_edges(b, b_name)?))),
        (None, None) => Ok(None),
        _ => bail!("[histograms].{a_name} and [histograms].{b_name} must be set together"),
    }
}

pub fn build_cloud_histograms(h: &HistogramsToml) -> Result<Option<CloudHistogramEdges>> {
    Ok(edge_pair(&h.cloud_size, "cloud_size", &h.cloud_sum, "cloud_sum")?
        .map(|(size, sum)| CloudHistogramEdges { size, sum }))
}

pub fn build_separated_histograms(h: &HistogramsToml) -> Result<Option<CloudHistogramEdges>> {
    Ok(
        edge_pair(&h.cloud_size_sep, "cloud_size_sep", &h.cloud_sum_sep, "cloud_sum_sep")?
            .map(|(size, sum)| CloudHistogramEdges { size, sum }),
    )
}

pub fn build_cond_histogram(h: &HistogramsToml) -> Result<Option<CondHistogramEdges>> {
    Ok(edge_pair(&h.cond_mean_m, "cond_mean_m", &h.cond_m, "cond_m")?
        .map(|(mean_m, m)| CondHistogramEdges { mean_m, m }))
}

/// Builds the full sweep configuration. `start`/`end` override `[dates]`.
pub fn build_sweep_config(
    config: &CirrusConfig,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<SweepConfig> {
    let start = start.unwrap_or(&config.dates.start);
    let end = end.unwrap_or(&config.dates.end);
    let dates = date_range(parse_date(start)?, parse_date(end)?)?;
    let leads = lead_times(
        config.dates.time_start,
        config.dates.time_end,
        config.dates.time_inc,
    )?;

    let rdf = config
        .rdf
        .as_ref()
        .map(|r| build_rdf_config(r, config.domain.dx))
        .transpose()?;

    let sweep = SweepConfig::new(
        parse_kind(&config.ensemble.kind)?,
        build_label_config(&config.objects)?,
        config.ensemble.n_members,
        (config.domain.rows, config.domain.cols),
    )
    .with_schedule(dates, leads)
    .with_dx(config.domain.dx)
    .with_rdf(rdf)
    .with_separation(config.objects.separation.as_ref().map(build_footprint).transpose()?)
    .with_coarse(build_coarse_config(&config.coarse)?)
    .with_cloud_histograms(build_cloud_histograms(&config.histograms)?)
    .with_separated_histograms(build_separated_histograms(&config.histograms)?)
    .with_field_histogram(
        config
            .histograms
            .prec_freq
            .as_ref()
            .map(|e| build_edges(e, "prec_freq"))
            .transpose()?,
    )
    .with_cond_histogram(build_cond_histogram(&config.histograms)?)
    .with_scaling(config.coarse.scaling)
    .with_parallel_members(config.ensemble.parallel_members);
    sweep.validate()?;
    Ok(sweep)
}
