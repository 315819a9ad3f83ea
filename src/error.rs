//! Error types for loading the source tables and building reports.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("spreadsheet error in {}: {source}", .path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} has no worksheets", .path.display())]
    NoWorksheet { path: PathBuf },
    #[error("unsupported file extension for {}", .path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("{table} table is missing required column {column}")]
    MissingColumn { table: &'static str, column: &'static str },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("age group code {code} is outside 0..=29")]
    UnknownAgeGroup { code: i32 },
    #[error("mortality row {row} has no age group code")]
    MissingAgeGroup { row: usize },
}

pub type Result<T> = std::result::Result<T, LoadError>;
