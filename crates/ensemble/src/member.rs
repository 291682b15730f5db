//! Per-member input reading and analysis.

use chrono::NaiveDateTime;
use cirrus_io::{FieldSource, IoError};
use cirrus_objects::{CloudObjects, LabelConfig, identify};
use cirrus_rdf::{RdfCurve, gated_rdf};
use cirrus_stats::{BinEdges, histogram, mean};
use ndarray::{Array2, ArrayView2, Zip};

use crate::config::SweepConfig;
use crate::dates::format_date;
use crate::error::EnsembleError;

/// All fields of one member at one time step, already masked.
#[derive(Debug, Clone)]
pub(crate) struct MemberFields {
    pub(crate) member: usize,
    pub(crate) field: Array2<f64>,
    pub(crate) gate: Option<Array2<f64>>,
    pub(crate) density: Option<Array2<f64>>,
    pub(crate) auxiliary: Option<Array2<f64>>,
}

/// Objects of one labeling and their RDF.
#[derive(Debug, Clone)]
pub(crate) struct Clouds {
    pub(crate) objects: CloudObjects,
    pub(crate) rdf: Option<RdfCurve>,
}

/// Result of analysing one member.
#[derive(Debug, Clone)]
pub(crate) struct MemberAnalysis {
    pub(crate) member: usize,
    pub(crate) regular: Clouds,
    /// Watershed-separated clouds, when separation is enabled.
    pub(crate) separated: Option<Clouds>,
    /// Counts of the masked field values.
    pub(crate) field_histogram: Option<Vec<f64>>,
    pub(crate) auxiliary: Option<Array2<f64>>,
}

/// Identifies a read position for error messages.
pub(crate) fn context(date: NaiveDateTime, lead_hours: f64, member: Option<usize>, variable: Option<&str>) -> String {
    let mut s = format!("date {}, time {lead_hours} h", format_date(date));
    if let Some(m) = member {
        s.push_str(&format!(", member {}", m + 1));
    }
    if let Some(v) = variable {
        s.push_str(&format!(", variable {v}"));
    }
    s
}

/// Sets excluded cells to NaN.
fn apply_mask(field: &mut Array2<f64>, excluded: Option<ArrayView2<'_, bool>>) {
    if let Some(ex) = excluded {
        Zip::from(field).and(ex).for_each(|v, &e| {
            if e {
                *v = f64::NAN;
            }
        });
    }
}

/// Reads every variable `member` needs.
///
/// Returns `Ok(None)` when a variable is missing in a recoverable way; the
/// caller drops the member for this time step.
pub(crate) fn read_member<S: FieldSource + ?Sized>(
    source: &S,
    config: &SweepConfig,
    date: NaiveDateTime,
    lead_hours: f64,
    member: usize,
    excluded: Option<ArrayView2<'_, bool>>,
) -> Result<Option<MemberFields>, EnsembleError> {
    let domain = config.domain();
    let read = |variable: &str| -> Result<Option<Array2<f64>>, EnsembleError> {
        let ctx = || context(date, lead_hours, Some(member), Some(variable));
        match source.read_field(date, lead_hours, member, variable) {
            Ok(f) if f.dim() == domain => Ok(Some(f)),
            Ok(f) => Err(EnsembleError::Read {
                context: ctx(),
                source: IoError::DimensionMismatch {
                    name: format!("{variable} shape"),
                    expected: domain.0 * domain.1,
                    got: f.len(),
                },
            }),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(
                    date = %format_date(date),
                    lead_hours,
                    member = member + 1,
                    variable,
                    error = %e,
                    "dropping member for this time step"
                );
                Ok(None)
            }
            Err(e) => Err(EnsembleError::Read {
                context: ctx(),
                source: e,
            }),
        }
    };

    let kind = config.kind();
    let Some(mut field) = read(kind.primary_variable())? else {
        return Ok(None);
    };
    apply_mask(&mut field, excluded);

    let mut gate: Option<Array2<f64>> = None;
    for &name in kind.gate_variables() {
        let Some(part) = read(name)? else {
            return Ok(None);
        };
        gate = Some(match gate {
            Some(g) => g + &part,
            None => part,
        });
    }

    let density = match kind.density_variable() {
        Some(name) => match read(name)? {
            Some(d) => Some(d),
            None => return Ok(None),
        },
        None => None,
    };

    let auxiliary = match kind.auxiliary_variable() {
        Some(name) => match read(name)? {
            Some(a) => Some(a),
            None => return Ok(None),
        },
        None => None,
    };

    Ok(Some(MemberFields {
        member,
        field,
        gate,
        density,
        auxiliary,
    }))
}

/// Identifies and aggregates the objects of one member and estimates its RDF,
/// once for regular and optionally once for separated clouds.
pub(crate) fn analyze_member(
    fields: MemberFields,
    excluded: Option<ArrayView2<'_, bool>>,
    config: &SweepConfig,
    ctx: &str,
) -> Result<MemberAnalysis, EnsembleError> {
    let member_ctx = format!("{ctx}, member {}", fields.member + 1);
    let regular = identify_clouds(&fields, excluded, config.label(), config, &member_ctx)?;
    let separated = match config.separation() {
        Some(label) => Some(identify_clouds(
            &fields,
            excluded,
            label,
            config,
            &format!("{member_ctx}, separated"),
        )?),
        None => None,
    };
    let field_histogram = config
        .field_histogram()
        .map(|edges| histogram(&fields.field.iter().copied().collect::<Vec<_>>(), edges));

    tracing::debug!(
        member = fields.member + 1,
        n_objects = regular.objects.len(),
        n_separated = separated.as_ref().map(|c| c.objects.len()),
        "analysed member"
    );

    Ok(MemberAnalysis {
        member: fields.member,
        regular,
        separated,
        field_histogram,
        auxiliary: fields.auxiliary,
    })
}

fn identify_clouds(
    fields: &MemberFields,
    excluded: Option<ArrayView2<'_, bool>>,
    label: &LabelConfig,
    config: &SweepConfig,
    ctx: &str,
) -> Result<Clouds, EnsembleError> {
    let (labels, mut objects) = identify(
        fields.field.view(),
        fields.gate.as_ref().map(|g| g.view()),
        fields.density.as_ref().map(|d| d.view()),
        label,
    )
    .map_err(|source| EnsembleError::Objects {
        context: ctx.to_string(),
        source,
    })?;

    if config.kind().area_scaled() {
        objects.scale_sums(config.dx() * config.dx());
    }

    let rdf = match config.rdf() {
        Some(rdf_config) => Some(
            gated_rdf(&labels, fields.field.view(), excluded, rdf_config).map_err(|source| {
                EnsembleError::Rdf {
                    context: ctx.to_string(),
                    source,
                }
            })?,
        ),
        None => None,
    };
    Ok(Clouds { objects, rdf })
}

/// Cloud size and sum histograms of one member, with their means.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CloudHistograms {
    pub(crate) size: Vec<f64>,
    pub(crate) sum: Vec<f64>,
    pub(crate) size_mean: Option<f64>,
    pub(crate) sum_mean: Option<f64>,
}

impl CloudHistograms {
    pub(crate) fn of(objects: &CloudObjects, size_edges: &BinEdges, sum_edges: &BinEdges) -> Self {
        Self {
            size: histogram(objects.sizes(), size_edges),
            sum: histogram(objects.sums(), sum_edges),
            size_mean: mean(objects.sizes()),
            sum_mean: mean(objects.sums()),
        }
    }
}
