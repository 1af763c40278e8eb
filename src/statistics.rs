use crate::types::SiteRecord;
use rayon::prelude::*;

/// Calculate G-statistic from 2x2 contingency table
///
/// Contingency table:
///                 High bulk  |  Low bulk
/// REF allele:        o1      |      o3
/// ALT allele:        o2      |      o4
///
/// Returns: G-statistic value (>= 0), or NaN if any count is negative
pub fn g_statistic(o1: f64, o2: f64, o3: f64, o4: f64) -> f64 {
    if o1 < 0.0 || o2 < 0.0 || o3 < 0.0 || o4 < 0.0 {
        return f64::NAN;
    }

    let total = o1 + o2 + o3 + o4;

    // Handle edge case: no data
    if total == 0.0 {
        return 0.0;
    }

    // Expected values under independence
    let e1 = (o1 + o2) * (o1 + o3) / total;
    let e2 = (o1 + o2) * (o2 + o4) / total;
    let e3 = (o3 + o4) * (o1 + o3) / total;
    let e4 = (o3 + o4) * (o2 + o4) / total;

    // Note: lim(x→0) x*ln(x) = 0
    let llr = |observed: f64, expected: f64| -> f64 {
        if observed == 0.0 || expected == 0.0 {
            0.0
        } else {
            2.0 * observed * (observed / expected).ln()
        }
    };

    let g = llr(o1, e1) + llr(o2, e2) + llr(o3, e3) + llr(o4, e4);

    g.max(0.0)
}

/// SNP index for a bulk: ALT / DP, NaN when DP is zero
pub fn snp_index(alt_depth: i64, depth: u32) -> f64 {
    if depth == 0 {
        f64::NAN
    } else {
        alt_depth as f64 / depth as f64
    }
}

/// Δ(SNP-index) = SNP_index_high - SNP_index_low
pub fn delta_snp_index(snp_index_high: f64, snp_index_low: f64) -> f64 {
    // NaN on either side falls through the subtraction
    snp_index_high - snp_index_low
}

/// Reference allele frequency pooled over both bulks, NaN when both are empty
pub fn ref_allele_freq(ref_high: u32, ref_low: u32, depth_high: u32, depth_low: u32) -> f64 {
    let depth = depth_high as u64 + depth_low as u64;
    if depth == 0 {
        f64::NAN
    } else {
        (ref_high as u64 + ref_low as u64) as f64 / depth as f64
    }
}

/// Median of an already sorted slice; NaN when empty.
pub fn compute_median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Median and unscaled median absolute deviation of the finite values.
///
/// Returns `None` when no finite value is present.
pub fn median_and_mad(values: &[f64]) -> Option<(f64, f64)> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);
    let median = compute_median(&finite);

    let mut deviations: Vec<f64> = finite.iter().map(|&x| (x - median).abs()).collect();
    deviations.sort_by(f64::total_cmp);
    let mad = compute_median(&deviations);

    Some((median, mad))
}

/// Supplies one G-statistic per site, in input order.
///
/// Degenerate sites are the implementation's business: it may return NaN for
/// them. The returned vector must have exactly one value per record.
pub trait GStatistic {
    fn g_statistics(&self, records: &[SiteRecord]) -> Vec<f64>;
}

impl<F> GStatistic for F
where
    F: Fn(&[SiteRecord]) -> Vec<f64>,
{
    fn g_statistics(&self, records: &[SiteRecord]) -> Vec<f64> {
        self(records)
    }
}

/// Per-site 2x2 log-likelihood ratio over REF/ALT depths of the two bulks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContingencyG;

impl GStatistic for ContingencyG {
    fn g_statistics(&self, records: &[SiteRecord]) -> Vec<f64> {
        records
            .par_iter()
            .map(|r| {
                g_statistic(
                    r.high.ref_depth as f64,
                    r.high.alt_depth as f64,
                    r.low.ref_depth as f64,
                    r.low.alt_depth as f64,
                )
            })
            .collect()
    }
}
