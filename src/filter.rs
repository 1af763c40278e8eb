//! Threshold filtering of imported sites.
//!
//! Criteria are optional and evaluated as an ordered list of stages. Each
//! stage only sees what the previous one kept, which matters for the MAD
//! depth stage: its median and MAD come from the set it is handed.

use crate::error::{Error, Result};
use crate::report::StageLog;
use crate::statistics::median_and_mad;
use crate::types::SiteRecord;

/// Default multiplier for the MAD total-depth filter.
pub const DEFAULT_MAD_MULTIPLIER: f64 = 2.5;
/// Default minimum genotype quality required in both bulks.
pub const DEFAULT_MIN_GQ: f64 = 99.0;

/// Optional thresholds; `None` disables a criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Keep `x < ref_freq < 1 - x`. Must lie in `[0, 0.5)`.
    pub ref_allele_freq: Option<f64>,
    /// Keep total depth within `median ± k * MAD` of the current set.
    pub mad_multiplier: Option<f64>,
    pub min_total_depth: Option<u64>,
    pub max_total_depth: Option<u64>,
    /// Keep `|depth_high - depth_low| <= n`.
    pub max_depth_difference: Option<u32>,
    /// Both bulks must reach this depth.
    pub min_sample_depth: Option<u32>,
    /// Both bulks must reach this genotype quality.
    pub min_gq: Option<f64>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            ref_allele_freq: None,
            mad_multiplier: Some(DEFAULT_MAD_MULTIPLIER),
            min_total_depth: None,
            max_total_depth: None,
            max_depth_difference: None,
            min_sample_depth: None,
            min_gq: Some(DEFAULT_MIN_GQ),
        }
    }
}

impl FilterCriteria {
    /// All criteria disabled.
    pub fn none() -> Self {
        Self {
            ref_allele_freq: None,
            mad_multiplier: None,
            min_total_depth: None,
            max_total_depth: None,
            max_depth_difference: None,
            min_sample_depth: None,
            min_gq: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(x) = self.ref_allele_freq {
            if !(0.0..0.5).contains(&x) {
                return Err(Error::InvalidCriteria(format!(
                    "reference allele frequency bound must be in [0, 0.5), got {}",
                    x
                )));
            }
        }
        if let Some(k) = self.mad_multiplier {
            if !k.is_finite() || k < 0.0 {
                return Err(Error::InvalidCriteria(format!(
                    "MAD multiplier must be a non-negative number, got {}",
                    k
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_total_depth, self.max_total_depth) {
            if max < min {
                return Err(Error::InvalidCriteria(format!(
                    "max total depth {} is below min total depth {}",
                    max, min
                )));
            }
        }
        if let Some(q) = self.min_gq {
            if q.is_nan() {
                return Err(Error::InvalidCriteria("minimum GQ is NaN".to_string()));
            }
        }
        Ok(())
    }

    /// Enabled criteria in application order.
    pub fn stages(&self) -> Vec<FilterStage> {
        [
            self.ref_allele_freq.map(FilterStage::RefAlleleFreq),
            self.mad_multiplier.map(FilterStage::MadDepth),
            self.min_total_depth.map(FilterStage::MinTotalDepth),
            self.max_total_depth.map(FilterStage::MaxTotalDepth),
            self.max_depth_difference.map(FilterStage::MaxDepthDifference),
            self.min_sample_depth.map(FilterStage::MinSampleDepth),
            self.min_gq.map(FilterStage::MinGenotypeQuality),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// One row predicate of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStage {
    RefAlleleFreq(f64),
    MadDepth(f64),
    MinTotalDepth(u64),
    MaxTotalDepth(u64),
    MaxDepthDifference(u32),
    MinSampleDepth(u32),
    MinGenotypeQuality(f64),
}

impl FilterStage {
    pub fn name(&self) -> &'static str {
        match self {
            FilterStage::RefAlleleFreq(_) => "reference allele frequency",
            FilterStage::MadDepth(_) => "total depth MAD",
            FilterStage::MinTotalDepth(_) => "min total depth",
            FilterStage::MaxTotalDepth(_) => "max total depth",
            FilterStage::MaxDepthDifference(_) => "depth difference",
            FilterStage::MinSampleDepth(_) => "min sample depth",
            FilterStage::MinGenotypeQuality(_) => "min genotype quality",
        }
    }

    /// Keep the records that pass this stage, in order.
    pub fn apply(&self, records: Vec<SiteRecord>, log: &dyn StageLog) -> Vec<SiteRecord> {
        let before = records.len();

        let (kept, bounds): (Vec<SiteRecord>, String) = match *self {
            FilterStage::RefAlleleFreq(x) => {
                let upper = 1.0 - x;
                // NaN fails both comparisons
                let kept = retain(records, |r| r.ref_freq > x && r.ref_freq < upper);
                (kept, format!("{} < REF_FRQ < {}", x, upper))
            }
            FilterStage::MadDepth(k) => {
                let totals: Vec<f64> = records.iter().map(|r| r.total_depth() as f64).collect();
                match median_and_mad(&totals) {
                    Some((median, mad)) => {
                        let lower = median - k * mad;
                        let upper = median + k * mad;
                        let kept = retain(records, |r| {
                            let total = r.total_depth() as f64;
                            total >= lower && total <= upper
                        });
                        (
                            kept,
                            format!(
                                "{} <= total depth <= {} (median {}, MAD {}, k {})",
                                lower, upper, median, mad, k
                            ),
                        )
                    }
                    None => (Vec::new(), "no sites to estimate median/MAD".to_string()),
                }
            }
            FilterStage::MinTotalDepth(n) => {
                let kept = retain(records, |r| r.total_depth() >= n);
                (kept, format!("total depth >= {}", n))
            }
            FilterStage::MaxTotalDepth(n) => {
                let kept = retain(records, |r| r.total_depth() <= n);
                (kept, format!("total depth <= {}", n))
            }
            FilterStage::MaxDepthDifference(n) => {
                let kept = retain(records, |r| r.high.depth.abs_diff(r.low.depth) <= n);
                (kept, format!("|high DP - low DP| <= {}", n))
            }
            FilterStage::MinSampleDepth(n) => {
                let kept = retain(records, |r| r.high.depth >= n && r.low.depth >= n);
                (kept, format!("high DP >= {} and low DP >= {}", n, n))
            }
            FilterStage::MinGenotypeQuality(q) => {
                let kept = retain(records, |r| r.high.gq >= q && r.low.gq >= q);
                (kept, format!("high GQ >= {} and low GQ >= {}", q, q))
            }
        };

        log.stage(&format!(
            "Filtering by {}: {}; removed {} of {} sites",
            self.name(),
            bounds,
            before - kept.len(),
            before
        ));
        kept
    }
}

fn retain<F>(mut records: Vec<SiteRecord>, keep: F) -> Vec<SiteRecord>
where
    F: Fn(&SiteRecord) -> bool,
{
    records.retain(|r| keep(r));
    records
}

/// Apply every enabled criterion in order and return the surviving sites.
///
/// The input is left untouched; the result is an owned subsequence of it.
/// An empty result is valid.
pub fn filter(
    records: &[SiteRecord],
    criteria: &FilterCriteria,
    log: &dyn StageLog,
) -> Vec<SiteRecord> {
    criteria
        .stages()
        .iter()
        .fold(records.to_vec(), |current, stage| stage.apply(current, log))
}
