use crate::config::DataSources;
use crate::error::{LoadError, Result};
use crate::lookup::{DivisionLookup, COD_DPTO, COD_MUNIC};
use crate::types::{MortalityRecord, RawTable};
use crate::util::{cell, cell_to_string, parse_code, parse_i32_safe};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use log::{info, warn};
use std::path::Path;

pub const ANO: &str = "ANO";
pub const MES: &str = "MES";
pub const SEXO: &str = "SEXO";
pub const GRUPO_EDAD: &str = "GRUPO_EDAD1";
pub const CAUSA_DEFUNCION: &str = "CAUSA_DEFUNCION";

pub const MORTALITY_RENAMES: [(&str, &str); 4] = [
    ("COD_DEPARTAMENTO", COD_DPTO),
    ("COD_MUNICIPIO", COD_MUNIC),
    ("AO", ANO),
    ("COD_MUERTE", CAUSA_DEFUNCION),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows kept with at least one blank or unparseable code.
    pub incomplete_rows: usize,
}

/// The source tables, loaded once and read by every report.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub mortality: Vec<MortalityRecord>,
    pub divipola: DivisionLookup,
    /// Loaded for completeness; cause descriptions come from the static
    /// catalog, not from this table.
    pub cause_codes: RawTable,
    pub load_report: LoadReport,
}

impl Dataset {
    /// Load all three sources. Mortality and DIVIPOLA are required; the
    /// cause-code table falls back to empty.
    pub fn load(sources: &DataSources) -> Result<Self> {
        info!("loading mortality records from {}", sources.mortality.display());
        let (mortality, load_report) = load_mortality(&sources.mortality)?;
        let cause_codes = load_cause_codes(&sources.cause_codes);
        info!("loading divipola from {}", sources.divipola.display());
        let divipola = DivisionLookup::from_table(read_table(&sources.divipola)?)?;

        info!(
            "mortality records: {} of {} rows ({} incomplete)",
            load_report.loaded_rows, load_report.total_rows, load_report.incomplete_rows
        );
        info!(
            "divipola: {} departments, {} municipalities",
            divipola.department_count(),
            divipola.municipality_count()
        );
        Ok(Dataset {
            mortality,
            divipola,
            cause_codes,
            load_report,
        })
    }
}

/// Read the first worksheet (or a CSV file) as a header row plus string rows.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") => read_csv_table(path),
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => read_sheet_table(path),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn read_sheet_table(path: &Path) -> Result<RawTable> {
    let spreadsheet_err = |source| LoadError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(spreadsheet_err)?;

    let mut rows = range
        .rows()
        .map(|r| r.iter().map(cell_to_string).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    Ok(RawTable {
        headers,
        rows: rows.collect(),
    })
}

fn read_csv_table(path: &Path) -> Result<RawTable> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        rows.push(record.iter().map(|f| f.trim().to_string()).collect());
    }
    Ok(RawTable { headers, rows })
}

pub fn load_mortality(path: &Path) -> Result<(Vec<MortalityRecord>, LoadReport)> {
    mortality_from_table(read_table(path)?)
}

/// Rename to canonical columns and convert rows into typed records. Every
/// row is kept; blank or unparseable codes become `None` and the row is
/// counted as incomplete.
pub fn mortality_from_table(mut table: RawTable) -> Result<(Vec<MortalityRecord>, LoadReport)> {
    for header in &mut table.headers {
        *header = header.trim().to_string();
    }
    table.rename_columns(&MORTALITY_RENAMES);
    let require = |column: &'static str| {
        table.column(column).map(Some).ok_or(LoadError::MissingColumn {
            table: "mortality",
            column,
        })
    };
    let dept_col = require(COD_DPTO)?;
    let munic_col = require(COD_MUNIC)?;
    let cause_col = require(CAUSA_DEFUNCION)?;
    let age_col = require(GRUPO_EDAD)?;
    let year_col = table.column(ANO);
    let month_col = table.column(MES);
    let sex_col = table.column(SEXO);

    let total_rows = table.len();
    let mut incomplete_rows = 0usize;
    let mut records = Vec::with_capacity(total_rows);
    for row in &table.rows {
        let record = MortalityRecord {
            dept_code: parse_code(cell(row, dept_col)),
            munic_code: parse_code(cell(row, munic_col)),
            year: parse_i32_safe(cell(row, year_col)),
            month: parse_i32_safe(cell(row, month_col)),
            cause_code: cell(row, cause_col)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            sex: parse_i32_safe(cell(row, sex_col)),
            age_group: parse_i32_safe(cell(row, age_col)),
        };
        if record.municipality_key().is_none()
            || record.cause_code.is_none()
            || record.age_group.is_none()
        {
            incomplete_rows += 1;
        }
        records.push(record);
    }
    if incomplete_rows > 0 {
        warn!(
            "mortality: {} rows have a blank or unparseable code",
            incomplete_rows
        );
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: records.len(),
        incomplete_rows,
    };
    Ok((records, report))
}

/// Never fails: a missing or unreadable file becomes an empty table.
pub fn load_cause_codes(path: &Path) -> RawTable {
    match read_table(path) {
        Ok(table) => {
            if table.is_empty() {
                warn!("cause code table {} has no rows", path.display());
            } else {
                info!("cause codes loaded: {} rows", table.len());
            }
            table
        }
        Err(e) => {
            warn!("could not load cause codes, continuing without them: {}", e);
            RawTable::default()
        }
    }
}
