use crate::error::Result;
use crate::types::SiteRecord;
use csv::Writer;
use std::io::Write;
use std::path::Path;

pub const HEADER: [&str; 17] = [
    "chrom",
    "pos",
    "ref",
    "alt",
    "high_dp",
    "high_ref_depth",
    "high_alt_depth",
    "high_gq",
    "high_snp_index",
    "low_dp",
    "low_ref_depth",
    "low_alt_depth",
    "low_gq",
    "low_snp_index",
    "ref_freq",
    "delta_snp_index",
    "g_stat",
];

/// Six decimals, `NA` for undefined values.
fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        "NA".to_string()
    } else {
        format!("{:.6}", v)
    }
}

pub fn write_records(records: &[SiteRecord], path: &Path) -> Result<()> {
    let wtr = Writer::from_path(path)?;
    write_all(records, wtr)
}

pub fn write_records_to<W: Write>(records: &[SiteRecord], sink: W) -> Result<()> {
    write_all(records, Writer::from_writer(sink))
}

fn write_all<W: Write>(records: &[SiteRecord], mut wtr: Writer<W>) -> Result<()> {
    wtr.write_record(HEADER)?;

    for r in records {
        wtr.write_record(&[
            r.chrom.clone(),
            r.pos.to_string(),
            r.ref_allele.clone().unwrap_or_default(),
            r.alt_allele.clone().unwrap_or_default(),
            r.high.depth.to_string(),
            r.high.ref_depth.to_string(),
            r.high.alt_depth.to_string(),
            fmt_float(r.high.gq),
            fmt_float(r.high.snp_index),
            r.low.depth.to_string(),
            r.low.ref_depth.to_string(),
            r.low.alt_depth.to_string(),
            fmt_float(r.low.gq),
            fmt_float(r.low.snp_index),
            fmt_float(r.ref_freq),
            fmt_float(r.delta_snp_index),
            fmt_float(r.g_stat),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
