//! Error types for table import and filtering.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing site column '{0}'")]
    MissingSiteColumn(String),

    #[error("Missing column '{column}' required for sample '{sample}'")]
    MissingColumn { column: String, sample: String },

    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row} has {actual} fields, header has {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("G-statistic returned {actual} values for {expected} sites")]
    StatisticLength { expected: usize, actual: usize },

    #[error("Invalid filter criteria: {0}")]
    InvalidCriteria(String),

    #[error("Empty table: {0}")]
    EmptyTable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
