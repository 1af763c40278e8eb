use crate::error::{Error, Result};
use crate::report::StageLog;
use crate::statistics::{self, GStatistic};
use crate::types::{
    sample_column, BulkCall, RawTable, SiteRecord, ALLELE_DEPTH_FIELD, DEPTH_FIELD,
    GENOTYPE_QUALITY_FIELD,
};

pub const CHROM_COLUMN: &str = "CHROM";
pub const POS_COLUMN: &str = "POS";
pub const REF_COLUMN: &str = "REF";
pub const ALT_COLUMN: &str = "ALT";

/// Cells treated as a missing genotype quality.
const MISSING_MARKERS: [&str; 3] = ["NA", ".", ""];

/// Column indices of the three per-sample fields for one bulk.
#[derive(Debug, Clone)]
struct SampleColumns {
    depth: (usize, String),
    allele_depth: (usize, String),
    gq: (usize, String),
}

impl SampleColumns {
    fn resolve(table: &RawTable, sample: &str) -> Result<Self> {
        let find = |field: &str| -> Result<(usize, String)> {
            let name = sample_column(sample, field);
            match table.column(&name) {
                Some(idx) => Ok((idx, name)),
                None => Err(Error::MissingColumn {
                    column: name,
                    sample: sample.to_string(),
                }),
            }
        };
        Ok(Self {
            depth: find(DEPTH_FIELD)?,
            allele_depth: find(ALLELE_DEPTH_FIELD)?,
            gq: find(GENOTYPE_QUALITY_FIELD)?,
        })
    }

    fn call(&self, row: &[String], row_num: usize) -> Result<BulkCall> {
        let depth: u32 = parse_cell(row, &self.depth, row_num)?;
        let ref_depth = parse_ref_depth(row, &self.allele_depth, row_num)?;
        let gq = parse_quality(row, &self.gq, row_num)?;

        let alt_depth = depth as i64 - ref_depth as i64;

        Ok(BulkCall {
            depth,
            ref_depth,
            alt_depth,
            gq,
            snp_index: statistics::snp_index(alt_depth, depth),
        })
    }
}

fn parse_error(row_num: usize, column: &str, value: &str) -> Error {
    Error::Parse {
        row: row_num,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_cell<T: std::str::FromStr>(
    row: &[String],
    (idx, name): &(usize, String),
    row_num: usize,
) -> Result<T> {
    let raw = row[*idx].trim();
    raw.parse().map_err(|_| parse_error(row_num, name, raw))
}

/// First comma-delimited token of an allele-depth cell, e.g. `"30,10"` gives 30.
fn parse_ref_depth(row: &[String], (idx, name): &(usize, String), row_num: usize) -> Result<u32> {
    let raw = row[*idx].trim();
    let first = raw.split(',').next().unwrap_or_default().trim();
    first.parse().map_err(|_| parse_error(row_num, name, raw))
}

fn parse_quality(row: &[String], column: &(usize, String), row_num: usize) -> Result<f64> {
    let raw = row[column.0].trim();
    if MISSING_MARKERS.contains(&raw) {
        return Ok(f64::NAN);
    }
    let gq: f64 = parse_cell(row, column, row_num)?;
    if gq < 0.0 {
        return Err(parse_error(row_num, &column.1, raw));
    }
    Ok(gq)
}

/// Build the per-site record set for a pair of bulks.
///
/// Columns are resolved by name (`CHROM`, `POS`, `<bulk>.DP`, `<bulk>.AD`,
/// `<bulk>.GQ`); `REF` and `ALT` are carried through when present. Rows whose
/// chromosome is not in `chroms` are dropped before any field is parsed. The
/// G-statistic collaborator is called once, on the finished set.
///
/// Any missing column, malformed cell or ragged row fails the whole import.
pub fn import<G: GStatistic + ?Sized>(
    table: &RawTable,
    high_bulk: &str,
    low_bulk: &str,
    chroms: Option<&[String]>,
    g_stat: &G,
    log: &dyn StageLog,
) -> Result<Vec<SiteRecord>> {
    let site_column = |name: &str| -> Result<(usize, String)> {
        table
            .column(name)
            .map(|idx| (idx, name.to_string()))
            .ok_or_else(|| Error::MissingSiteColumn(name.to_string()))
    };
    let chrom_col = site_column(CHROM_COLUMN)?;
    let pos_col = site_column(POS_COLUMN)?;
    let ref_col = table.column(REF_COLUMN);
    let alt_col = table.column(ALT_COLUMN);

    let high_cols = SampleColumns::resolve(table, high_bulk)?;
    let low_cols = SampleColumns::resolve(table, low_bulk)?;

    log.stage(&format!("High bulk: {}", high_bulk));
    log.stage(&format!("Low bulk: {}", low_bulk));

    let width = table.headers.len();
    let mut records = Vec::with_capacity(table.len());
    let mut dropped_by_chrom = 0usize;

    for (i, row) in table.rows.iter().enumerate() {
        // 1-based, header is row 0
        let row_num = i + 1;
        if row.len() != width {
            return Err(Error::RowWidth {
                row: row_num,
                expected: width,
                actual: row.len(),
            });
        }

        let chrom = row[chrom_col.0].trim();
        if let Some(allowed) = chroms {
            if !allowed.iter().any(|c| c == chrom) {
                dropped_by_chrom += 1;
                continue;
            }
        }

        let pos: u64 = parse_cell(row, &pos_col, row_num)?;
        let high = high_cols.call(row, row_num)?;
        let low = low_cols.call(row, row_num)?;

        let ref_freq =
            statistics::ref_allele_freq(high.ref_depth, low.ref_depth, high.depth, low.depth);
        let delta_snp_index = statistics::delta_snp_index(high.snp_index, low.snp_index);

        records.push(SiteRecord {
            chrom: chrom.to_string(),
            pos,
            ref_allele: ref_col.map(|idx| row[idx].clone()),
            alt_allele: alt_col.map(|idx| row[idx].clone()),
            high,
            low,
            ref_freq,
            delta_snp_index,
            g_stat: f64::NAN,
        });
    }

    if let Some(allowed) = chroms {
        log.stage(&format!(
            "Chromosome allow-list ({} names) removed {} of {} sites",
            allowed.len(),
            dropped_by_chrom,
            table.len()
        ));
    }

    let negative_alt = records
        .iter()
        .filter(|r| r.high.alt_depth < 0 || r.low.alt_depth < 0)
        .count();
    if negative_alt > 0 {
        log.stage(&format!(
            "{} sites have a reference depth above total depth (negative ALT depth)",
            negative_alt
        ));
    }

    log.stage(&format!("Calculating G-statistic for {} sites", records.len()));
    let g_values = g_stat.g_statistics(&records);
    if g_values.len() != records.len() {
        return Err(Error::StatisticLength {
            expected: records.len(),
            actual: g_values.len(),
        });
    }
    for (record, g) in records.iter_mut().zip(g_values) {
        record.g_stat = g;
    }

    log.stage(&format!("Imported {} sites", records.len()));
    Ok(records)
}
