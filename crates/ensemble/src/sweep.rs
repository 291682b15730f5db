//! The date × time × member sweep.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use cirrus_coarse::{CondHistogram, CoarseResult, ScalingRatios, accumulate};
use cirrus_io::{FieldSource, IoError, ResultStore};
use cirrus_rdf::{RdfCurve, ensemble_mean};
use cirrus_stats::or_nan;
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::config::SweepConfig;
use crate::dates::format_date;
use crate::error::EnsembleError;
use crate::layout::{self, Layout};
use crate::config::CloudHistogramEdges;
use crate::member::{self, CloudHistograms, Clouds, MemberAnalysis, MemberFields};

/// Counts reported at the end of a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// `(date, time)` steps analysed.
    pub steps: usize,
    /// Steps skipped because their mask could not be read.
    pub steps_skipped: usize,
    /// Member fields that entered the statistics.
    pub members_used: usize,
    /// Member fields dropped for missing data.
    pub members_dropped: usize,
}

/// Runs the full sweep and writes every result into `store`.
///
/// The store is declared, filled and finished here. Missing member data drops
/// that member for one time step; every other error aborts the sweep.
///
/// # Errors
///
/// Returns an error for an invalid configuration, structural read errors,
/// analysis errors and store failures.
pub fn run_sweep<S, R>(config: &SweepConfig, source: &S, store: &mut R) -> Result<SweepSummary, EnsembleError>
where
    S: FieldSource + ?Sized,
    R: ResultStore,
{
    config.validate()?;
    let layout = layout::declare(store, config)?;
    let mut histogram = config.cond_histogram().map(|edges| {
        CondHistogram::new(
            config.coarse().scales().len(),
            edges.mean_m.clone(),
            edges.m.clone(),
        )
    });

    info!(
        kind = %config.kind(),
        n_dates = config.dates().len(),
        n_times = config.leads().len(),
        n_members = config.n_members(),
        "starting sweep"
    );

    let mut summary = SweepSummary::default();
    for (d, &date) in config.dates().iter().enumerate() {
        info!(date = %format_date(date), "processing date");
        for (t, &lead_hours) in config.leads().iter().enumerate() {
            let step = Step {
                config,
                layout,
                date,
                lead_hours,
                index: [d, t],
            };
            step.run(source, store, histogram.as_mut(), &mut summary)?;
        }
    }

    if let Some(h) = &histogram {
        let counts: Vec<f64> = h.counts().iter().copied().collect();
        store.write("cond_m_hist", &[], &counts)?;
    }
    store.finish()?;

    info!(
        steps = summary.steps,
        steps_skipped = summary.steps_skipped,
        members_used = summary.members_used,
        members_dropped = summary.members_dropped,
        "sweep complete"
    );
    Ok(summary)
}

/// Outcome of reading the exclusion mask of a step.
enum MaskRead {
    /// The archive has a mask for this step but it is missing.
    Unavailable,
    /// The mask, or `None` when the archive has no mask at all.
    Available(Option<Array2<bool>>),
}

/// One `(date, time)` position of the sweep.
struct Step<'a> {
    config: &'a SweepConfig,
    layout: Layout,
    date: NaiveDateTime,
    lead_hours: f64,
    index: [usize; 2],
}

impl Step<'_> {
    fn context(&self) -> String {
        member::context(self.date, self.lead_hours, None, None)
    }

    #[instrument(skip_all, fields(date = %format_date(self.date), lead_hours = self.lead_hours))]
    fn run<S, R>(
        &self,
        source: &S,
        store: &mut R,
        histogram: Option<&mut CondHistogram>,
        summary: &mut SweepSummary,
    ) -> Result<(), EnsembleError>
    where
        S: FieldSource + ?Sized,
        R: ResultStore,
    {
        let MaskRead::Available(mask) = self.read_mask(source)? else {
            summary.steps_skipped += 1;
            return Ok(());
        };
        let excluded = mask.as_ref().map(|m| m.view());

        let mut fields: Vec<MemberFields> = Vec::with_capacity(self.config.n_members());
        for m in 0..self.config.n_members() {
            match member::read_member(source, self.config, self.date, self.lead_hours, m, excluded)? {
                Some(f) => fields.push(f),
                None => summary.members_dropped += 1,
            }
        }
        summary.steps += 1;
        summary.members_used += fields.len();
        if fields.is_empty() {
            warn!("no member available, all outputs stay undefined");
            return Ok(());
        }

        let ctx = self.context();
        let analyses: Vec<MemberAnalysis> = if self.config.parallel_members() {
            fields
                .into_par_iter()
                .map(|f| member::analyze_member(f, excluded, self.config, &ctx))
                .collect::<Result<_, _>>()?
        } else {
            fields
                .into_iter()
                .map(|f| member::analyze_member(f, excluded, self.config, &ctx))
                .collect::<Result<_, _>>()?
        };

        let regular: Vec<(usize, &Clouds)> =
            analyses.iter().map(|a| (a.member, &a.regular)).collect();
        let separated: Vec<(usize, &Clouds)> = analyses
            .iter()
            .filter_map(|a| a.separated.as_ref().map(|c| (a.member, c)))
            .collect();
        if self.layout.rdf {
            self.write_rdf(store, ["rdf", "rdf_member"], &regular, &ctx)?;
        }
        if self.layout.rdf_separated {
            self.write_rdf(store, ["rdf_sep", "rdf_sep_member"], &separated, &ctx)?;
        }
        if let Some(edges) = self.config.cloud_histograms() {
            self.write_cloud_histograms(
                store,
                ["cld_size", "cld_sum", "cld_size_mean", "cld_sum_mean"],
                edges,
                &regular,
            )?;
        }
        if let Some(edges) = self.config.separated_histograms() {
            self.write_cloud_histograms(
                store,
                ["cld_size_sep", "cld_sum_sep", "cld_size_sep_mean", "cld_sum_sep_mean"],
                edges,
                &separated,
            )?;
        }
        if self.layout.field_histogram {
            self.write_field_histogram(store, &analyses)?;
        }

        let objects: Vec<_> = analyses.iter().map(|a| a.regular.objects.clone()).collect();
        let auxiliary: Option<Vec<ArrayView2<'_, f64>>> = analyses
            .iter()
            .map(|a| a.auxiliary.as_ref().map(|f| f.view()))
            .collect();
        let result = accumulate(
            self.config.coarse(),
            &objects,
            self.config.domain(),
            auxiliary.as_deref(),
            histogram,
        )
        .map_err(|source| EnsembleError::Coarse {
            context: ctx.clone(),
            source,
        })?;
        self.write_boxes(store, &result)?;
        Ok(())
    }

    fn read_mask<S: FieldSource + ?Sized>(&self, source: &S) -> Result<MaskRead, EnsembleError> {
        match source.read_mask(self.date, self.lead_hours) {
            Ok(Some(mask)) if mask.dim() != self.config.domain() => {
                let (rows, cols) = self.config.domain();
                Err(EnsembleError::Read {
                    context: format!("{}, mask", self.context()),
                    source: IoError::DimensionMismatch {
                        name: "mask shape".to_string(),
                        expected: rows * cols,
                        got: mask.len(),
                    },
                })
            }
            Ok(mask) => Ok(MaskRead::Available(mask)),
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "mask unavailable, skipping time step");
                Ok(MaskRead::Unavailable)
            }
            Err(e) => Err(EnsembleError::Read {
                context: format!("{}, mask", self.context()),
                source: e,
            }),
        }
    }

    /// Writes the per-member curves and their ensemble mean as `[mean, member]`.
    fn write_rdf<R: ResultStore>(
        &self,
        store: &mut R,
        [mean_name, member_name]: [&str; 2],
        clouds: &[(usize, &Clouds)],
        ctx: &str,
    ) -> Result<(), EnsembleError> {
        let curves: Vec<RdfCurve> = clouds.iter().filter_map(|(_, c)| c.rdf.clone()).collect();
        if curves.is_empty() {
            return Ok(());
        }
        let n_ens = self.config.n_members();
        let n_bins = curves[0].len();
        let mut per_member = vec![f64::NAN; n_bins * n_ens];
        for &(member, c) in clouds {
            if let Some(curve) = &c.rdf {
                for (r, &v) in curve.values().iter().enumerate() {
                    per_member[r * n_ens + member] = v;
                }
            }
        }
        store.write(member_name, &self.index, &per_member)?;

        let mean = ensemble_mean(&curves).map_err(|source| EnsembleError::Rdf {
            context: ctx.to_string(),
            source,
        })?;
        store.write(mean_name, &self.index, mean.values())?;
        Ok(())
    }

    /// Writes `[size, sum, size_mean, sum_mean]` histograms of every member.
    fn write_cloud_histograms<R: ResultStore>(
        &self,
        store: &mut R,
        [size_name, sum_name, size_mean_name, sum_mean_name]: [&str; 4],
        edges: &CloudHistogramEdges,
        clouds: &[(usize, &Clouds)],
    ) -> Result<(), IoError> {
        let n_ens = self.config.n_members();
        let mut size = vec![f64::NAN; edges.size.n_bins() * n_ens];
        let mut sum = vec![f64::NAN; edges.sum.n_bins() * n_ens];
        let mut size_mean = vec![f64::NAN; n_ens];
        let mut sum_mean = vec![f64::NAN; n_ens];
        for &(member, c) in clouds {
            let h = CloudHistograms::of(&c.objects, &edges.size, &edges.sum);
            for (b, &count) in h.size.iter().enumerate() {
                size[b * n_ens + member] = count;
            }
            for (b, &count) in h.sum.iter().enumerate() {
                sum[b * n_ens + member] = count;
            }
            size_mean[member] = or_nan(h.size_mean);
            sum_mean[member] = or_nan(h.sum_mean);
        }
        store.write(size_name, &self.index, &size)?;
        store.write(sum_name, &self.index, &sum)?;
        store.write(size_mean_name, &self.index, &size_mean)?;
        store.write(sum_mean_name, &self.index, &sum_mean)?;
        Ok(())
    }

    fn write_field_histogram<R: ResultStore>(
        &self,
        store: &mut R,
        analyses: &[MemberAnalysis],
    ) -> Result<(), IoError> {
        let Some(edges) = self.config.field_histogram() else {
            return Ok(());
        };
        let n_ens = self.config.n_members();
        let mut counts = vec![f64::NAN; edges.n_bins() * n_ens];
        for a in analyses {
            if let Some(h) = &a.field_histogram {
                for (b, &c) in h.iter().enumerate() {
                    counts[b * n_ens + a.member] = c;
                }
            }
        }
        store.write("prec_freq", &self.index, &counts)
    }

    fn write_boxes<R: ResultStore>(&self, store: &mut R, result: &CoarseResult) -> Result<(), IoError> {
        let (rows, cols) = self.config.domain();
        let n_scales = self.config.coarse().scales().len();
        let names = self.layout.box_variables();
        let mut buffers: HashMap<&str, Vec<f64>> = names
            .iter()
            .map(|&name| (name, vec![f64::NAN; n_scales * rows * cols]))
            .collect();
        let mut set = |name: &str, i: usize, value: Option<f64>| {
            if let Some(buf) = buffers.get_mut(name) {
                buf[i] = or_nan(value);
            }
        };

        for (scale, scale_result) in result.iter() {
            for (b, stats) in scale_result.iter() {
                let i = (scale.0 * rows + b.row) * cols + b.col;
                set("mean_N", i, stats.mean_n);
                set("var_N", i, stats.var_n);
                set("mean_M", i, stats.mean_big_m);
                set("var_M", i, stats.var_big_m);
                set("mean_m", i, stats.mean_m);
                set("var_m", i, stats.var_m);
                set(layout::CORRELATION_VARIABLE, i, stats.corr_m_n);
                if let Some(aux) = scale_result.auxiliary(b) {
                    set("mean_TTENS", i, aux.mean);
                    set("var_TTENS", i, aux.var);
                }
                if self.layout.scaling {
                    let r = ScalingRatios::from_statistics(stats);
                    set("r_v", i, r.r_v);
                    set("alpha", i, r.alpha);
                    set("beta", i, r.beta);
                    set("r_v_alpha", i, r.r_v_alpha);
                    set("r_v_beta", i, r.r_v_beta);
                    set("r_v_alpha_beta", i, r.r_v_alpha_beta);
                }
            }
        }

        for name in names {
            if let Some(values) = buffers.get(name) {
                store.write(name, &self.index, values)?;
            }
        }
        Ok(())
    }
}
