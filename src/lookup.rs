//! Administrative-division lookup (DIVIPOLA).
//!
//! Column names are normalized to `COD_DPTO`/`NOM_DPTO`/`COD_MUNIC`/`NOM_MUNIC`
//! before the table is indexed. Municipality codes are only unique within
//! their department, so municipalities are keyed by the pair.

use crate::error::LoadError;
use crate::types::RawTable;
use crate::util::{cell, parse_code};
use log::debug;
use std::collections::HashMap;

pub const COD_DPTO: &str = "COD_DPTO";
pub const NOM_DPTO: &str = "NOM_DPTO";
pub const COD_MUNIC: &str = "COD_MUNIC";
pub const NOM_MUNIC: &str = "NOM_MUNIC";

pub const DIVIPOLA_RENAMES: [(&str, &str); 4] = [
    ("COD_DEPARTAMENTO", COD_DPTO),
    ("DEPARTAMENTO", NOM_DPTO),
    ("COD_MUNICIPIO", COD_MUNIC),
    ("MUNICIPIO", NOM_MUNIC),
];

#[derive(Debug, Clone, Default)]
pub struct DivisionLookup {
    departments: HashMap<u32, String>,
    municipalities: HashMap<(u32, u32), String>,
}

impl DivisionLookup {
    /// Build the lookup from a raw DIVIPOLA sheet. The first name seen for a
    /// key wins; rows with unparseable codes are ignored.
    pub fn from_table(mut table: RawTable) -> Result<Self, LoadError> {
        table.rename_columns(&DIVIPOLA_RENAMES);
        let require = |column: &'static str| {
            table.column(column).ok_or(LoadError::MissingColumn {
                table: "divipola",
                column,
            })
        };
        let dept_col = Some(require(COD_DPTO)?);
        let dept_name_col = Some(require(NOM_DPTO)?);
        let munic_col = Some(require(COD_MUNIC)?);
        let munic_name_col = Some(require(NOM_MUNIC)?);

        let mut lookup = DivisionLookup::default();
        let mut conflicts = 0usize;
        for row in &table.rows {
            let Some(dept) = parse_code(cell(row, dept_col)) else {
                continue;
            };
            if let Some(name) = cell(row, dept_name_col).filter(|s| !s.is_empty()) {
                conflicts += usize::from(lookup.insert_department(dept, name));
            }
            let Some(munic) = parse_code(cell(row, munic_col)) else {
                continue;
            };
            if let Some(name) = cell(row, munic_name_col).filter(|s| !s.is_empty()) {
                conflicts += usize::from(lookup.insert_municipality(dept, munic, name));
            }
        }
        if conflicts > 0 {
            debug!("divipola: {} conflicting duplicate names discarded", conflicts);
        }
        Ok(lookup)
    }

    /// Returns `true` when an existing, different name was kept.
    pub fn insert_department(&mut self, code: u32, name: &str) -> bool {
        match self.departments.get(&code) {
            Some(existing) => existing != name,
            None => {
                self.departments.insert(code, name.to_string());
                false
            }
        }
    }

    /// Returns `true` when an existing, different name was kept.
    pub fn insert_municipality(&mut self, dept: u32, munic: u32, name: &str) -> bool {
        match self.municipalities.get(&(dept, munic)) {
            Some(existing) => existing != name,
            None => {
                self.municipalities.insert((dept, munic), name.to_string());
                false
            }
        }
    }

    pub fn department_name(&self, code: u32) -> Option<String> {
        self.departments.get(&code).cloned()
    }

    pub fn municipality_name(&self, dept: u32, munic: u32) -> Option<String> {
        self.municipalities.get(&(dept, munic)).cloned()
    }

    pub fn department_count(&self) -> usize {
        self.departments.len()
    }

    pub fn municipality_count(&self) -> usize {
        self.municipalities.len()
    }
}
