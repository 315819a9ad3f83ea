//! Command-line configuration.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mortality_report",
    about = "Aggregates the 2019 non-fetal mortality records into chart tables"
)]
pub struct Config {
    /// Directory holding the source spreadsheets
    #[arg(long, default_value = "Anexos")]
    pub data_dir: PathBuf,

    /// Mortality records file, relative to the data directory
    #[arg(long, default_value = "Anexo1.NoFetal2019_CE_15-03-23.xlsx")]
    pub mortality: PathBuf,

    /// Cause-of-death code file, relative to the data directory
    #[arg(long, default_value = "Anexo2.CodigosDeMuerte_CE_15-03-23.xlsx")]
    pub cause_codes: PathBuf,

    /// Administrative-division (DIVIPOLA) file, relative to the data directory
    #[arg(long, default_value = "Divipola_CE_.xlsx")]
    pub divipola: PathBuf,

    /// Where the report CSV files and summary.json are written
    #[arg(long, default_value = "reports")]
    pub output_dir: PathBuf,

    /// Rows shown per table in the console preview
    #[arg(long, default_value_t = 10)]
    pub preview_rows: usize,
}

/// Locations of the three source tables.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSources {
    pub mortality: PathBuf,
    pub cause_codes: PathBuf,
    pub divipola: PathBuf,
}

impl Config {
    pub fn sources(&self) -> DataSources {
        DataSources {
            mortality: self.data_dir.join(&self.mortality),
            cause_codes: self.data_dir.join(&self.cause_codes),
            divipola: self.data_dir.join(&self.divipola),
        }
    }
}
