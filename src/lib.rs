//! Import two-bulk variant tables for BSA-Seq and filter the derived sites.
//!
//! [`import::import`] turns a [`types::RawTable`] into [`types::SiteRecord`]s
//! with SNP indices, reference allele frequency and a G-statistic;
//! [`filter::filter`] narrows them with [`filter::FilterCriteria`].

pub mod error;
pub mod filter;
pub mod import;
pub mod output;
pub mod report;
pub mod statistics;
pub mod summary;
pub mod table_reader;
pub mod types;

pub use error::{Error, Result};
pub use filter::{filter, FilterCriteria, FilterStage};
pub use import::import;
pub use report::{MemoryLog, NullLog, StageLog, StderrLog};
pub use statistics::{ContingencyG, GStatistic};
pub use types::{BulkCall, RawTable, SiteRecord};
