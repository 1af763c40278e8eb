use approx::assert_relative_eq;
use bsa_snpset::{
    filter, import, output, table_reader, ContingencyG, Error, FilterCriteria, MemoryLog, NullLog,
    SiteRecord,
};
use std::io::Write;

const TABLE: &str = "\
CHROM\tPOS\tREF\tALT\tHigh.AD\tHigh.DP\tHigh.GQ\tLow.AD\tLow.DP\tLow.GQ
1\t100\tA\tT\t30,10\t40\t99\t10,30\t40\t99
1\t200\tG\tC\t5,0\t5\t99\t0,5\t5\t99
";

fn write_table(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn load(text: &str) -> Vec<SiteRecord> {
    let file = write_table(text);
    let table = table_reader::load_table(file.path(), b'\t').unwrap();
    import(&table, "High", "Low", None, &ContingencyG, &NullLog).unwrap()
}

#[test]
fn two_site_example() {
    let records = load(TABLE);
    assert_eq!(records.len(), 2);

    let a = &records[0];
    assert_relative_eq!(a.high.snp_index, 0.25);
    assert_relative_eq!(a.low.snp_index, 0.75);
    assert_relative_eq!(a.delta_snp_index, -0.5);
    assert_relative_eq!(a.ref_freq, 0.5);

    let b = &records[1];
    assert_relative_eq!(b.high.snp_index, 0.0);
    assert_relative_eq!(b.low.snp_index, 1.0);
    assert_relative_eq!(b.delta_snp_index, -1.0);
    assert_relative_eq!(b.ref_freq, 0.5);

    let criteria = FilterCriteria {
        min_total_depth: Some(20),
        ..FilterCriteria::none()
    };
    let kept = filter(&records, &criteria, &NullLog);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].pos, 100);
}

#[test]
fn filtered_records_written_to_csv() {
    let records = load(TABLE);
    let criteria = FilterCriteria {
        min_total_depth: Some(20),
        ..FilterCriteria::default()
    };
    let log = MemoryLog::new();
    let kept = filter(&records, &criteria, &log);
    // MAD, min total depth, min GQ
    assert_eq!(log.len(), 3);

    let out = tempfile::NamedTempFile::new().unwrap();
    output::write_records(&kept, out.path()).unwrap();

    let mut rdr = csv::Reader::from_path(out.path()).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.len(), output::HEADER.len());
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][1], "100");
    assert_eq!(&rows[0][15], "-0.500000");
}

#[test]
fn zero_depth_row_survives_import() {
    let text = "\
CHROM\tPOS\tHigh.AD\tHigh.DP\tHigh.GQ\tLow.AD\tLow.DP\tLow.GQ
2\t10\t0\t0\t99\t3,4\t7\t99
";
    let records = load(text);
    assert!(records[0].high.snp_index.is_nan());
    assert!(records[0].delta_snp_index.is_nan());
    assert_relative_eq!(records[0].ref_freq, 3.0 / 7.0);
}

#[test]
fn missing_low_bulk_columns() {
    let file = write_table(TABLE);
    let table = table_reader::load_table(file.path(), b'\t').unwrap();
    let err = import(&table, "High", "Pool2", None, &ContingencyG, &NullLog).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { .. }));
    assert!(err.to_string().contains("Pool2.DP"));
}

#[test]
fn short_row_is_rejected() {
    let text = "\
CHROM\tPOS\tHigh.AD\tHigh.DP\tHigh.GQ\tLow.AD\tLow.DP\tLow.GQ
2\t10\t5,5\t10\t99\t3,4
";
    let file = write_table(text);
    let table = table_reader::load_table(file.path(), b'\t').unwrap();
    let err = import(&table, "High", "Low", None, &ContingencyG, &NullLog).unwrap_err();
    assert!(matches!(err, Error::RowWidth { row: 1, .. }));
}

#[test]
fn chrom_allow_list_then_filter() {
    let text = "\
CHROM\tPOS\tHigh.AD\tHigh.DP\tHigh.GQ\tLow.AD\tLow.DP\tLow.GQ
1\t10\t10,10\t20\t99\t10,10\t20\t99
2\t10\t10,10\t20\t99\t10,10\t20\t99
3\t10\t10,10\t20\t60\t10,10\t20\t99
";
    let file = write_table(text);
    let table = table_reader::load_table(file.path(), b'\t').unwrap();
    let allow = vec!["1".to_string(), "3".to_string()];
    let records = import(
        &table,
        "High",
        "Low",
        Some(allow.as_slice()),
        &ContingencyG,
        &NullLog,
    )
    .unwrap();
    assert_eq!(records.len(), 2);

    let kept = filter(&records, &FilterCriteria::default(), &NullLog);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].chrom, "1");
}
