use crate::error::{Error, Result};
use crate::types::RawTable;
use std::io::Read;
use std::path::Path;

/// Read a delimited variant table (e.g. GATK VariantsToTable output, which is
/// tab-separated) into a [`RawTable`].
///
/// Rows are read flexibly so that a short or long row surfaces later as
/// [`Error::RowWidth`] with its row number rather than as a CSV error.
pub fn load_table(path: &Path, delimiter: u8) -> Result<RawTable> {
    let rdr = reader_builder(delimiter).from_path(path)?;
    collect_table(rdr)
}

/// Same as [`load_table`] over any reader.
pub fn read_table<R: Read>(source: R, delimiter: u8) -> Result<RawTable> {
    let rdr = reader_builder(delimiter).from_reader(source);
    collect_table(rdr)
}

fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.delimiter(delimiter).has_headers(true).flexible(true);
    builder
}

fn collect_table<R: Read>(mut rdr: csv::Reader<R>) -> Result<RawTable> {
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::EmptyTable("no header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    Ok(RawTable::new(headers, rows))
}
