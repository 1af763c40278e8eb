/// A delimited variant table as read from disk: one header row, then one
/// row per site. Cells are kept as raw strings until import.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the column named exactly `name` (case-sensitive).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-sample column suffixes. Column names are `<sample>.<FIELD>`.
pub const DEPTH_FIELD: &str = "DP";
pub const ALLELE_DEPTH_FIELD: &str = "AD";
pub const GENOTYPE_QUALITY_FIELD: &str = "GQ";

/// Build a per-sample column name, e.g. `sample_column("pool_R", "DP")` is `pool_R.DP`.
pub fn sample_column(sample: &str, field: &str) -> String {
    format!("{}.{}", sample, field)
}

/// Read counts and derived index for one bulk at one site
#[derive(Debug, Clone, PartialEq)]
pub struct BulkCall {
    pub depth: u32,
    pub ref_depth: u32,
    // depth - ref_depth; negative when AD's first token exceeds DP
    pub alt_depth: i64,
    pub gq: f64,
    pub snp_index: f64,
}

/// One imported site with all derived fields
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRecord {
    pub chrom: String,
    pub pos: u64,
    pub ref_allele: Option<String>,
    pub alt_allele: Option<String>,

    pub high: BulkCall,
    pub low: BulkCall,

    pub ref_freq: f64,
    pub delta_snp_index: f64,
    pub g_stat: f64,
}

impl SiteRecord {
    /// Combined read depth of both bulks.
    pub fn total_depth(&self) -> u64 {
        self.high.depth as u64 + self.low.depth as u64
    }
}
