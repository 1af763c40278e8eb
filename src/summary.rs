use crate::statistics::compute_median;
use crate::types::SiteRecord;
use statrs::statistics::Statistics;
use std::cmp::Ordering;

/// Distribution of the finite G-statistics of a record set
#[derive(Debug, Clone, PartialEq)]
pub struct GStatSummary {
    pub n_sites: usize,
    pub n_finite: usize,
    pub mean: f64,
    pub median: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub max: f64,
}

impl GStatSummary {
    /// `None` when no site carries a finite G-statistic.
    pub fn from_records(records: &[SiteRecord]) -> Option<Self> {
        let mut g_values: Vec<f64> = records
            .iter()
            .map(|r| r.g_stat)
            .filter(|g| g.is_finite())
            .collect();
        if g_values.is_empty() {
            return None;
        }
        g_values.sort_by(f64::total_cmp);

        let percentile = |p: f64| -> f64 {
            let idx = (p * g_values.len() as f64) as usize;
            g_values[idx.min(g_values.len() - 1)]
        };

        Some(Self {
            n_sites: records.len(),
            n_finite: g_values.len(),
            mean: g_values.iter().mean(),
            median: compute_median(&g_values),
            p90: percentile(0.90),
            p95: percentile(0.95),
            p99: percentile(0.99),
            max: Statistics::max(g_values.iter()),
        })
    }

    pub fn report_lines(&self) -> Vec<String> {
        vec![
            format!("Sites with finite G: {} / {}", self.n_finite, self.n_sites),
            format!("Mean G: {:.3}", self.mean),
            format!("Median G: {:.3}", self.median),
            format!("90th percentile: {:.3}", self.p90),
            format!("95th percentile: {:.3}", self.p95),
            format!("99th percentile: {:.3}", self.p99),
            format!("Max G: {:.3}", self.max),
        ]
    }
}

/// Number of sites per chromosome, chromosomes in natural order.
pub fn chrom_counts(records: &[SiteRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for r in records {
        match counts.iter_mut().find(|(c, _)| *c == r.chrom) {
            Some((_, n)) => *n += 1,
            None => counts.push((r.chrom.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| natural_chrom_cmp(&a.0, &b.0));
    counts
}

/// Natural chromosome sort: chr1 < chr2 < ... < chr10 < chr11 < chrX
pub fn natural_chrom_cmp(a: &str, b: &str) -> Ordering {
    match (extract_chrom_number(a), extract_chrom_number(b)) {
        (Some(an), Some(bn)) => an.cmp(&bn),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn extract_chrom_number(chrom: &str) -> Option<u64> {
    let stripped = chrom
        .strip_prefix("chr")
        .or_else(|| chrom.strip_prefix("Chr"))
        .or_else(|| chrom.strip_prefix("CHR"))
        .unwrap_or(chrom);
    stripped.parse::<u64>().ok()
}
