use crate::catalog::HOMICIDE_PREFIX;
use serde::Serialize;
use tabled::Tabled;

/// A sheet read as strings: one header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Rename headers in place. Names not present are ignored.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) {
        for header in &mut self.headers {
            if let Some((_, to)) = renames.iter().find(|(from, _)| header.as_str() == *from) {
                *header = (*to).to_string();
            }
        }
    }
}

/// One death. Codes that are blank or unparseable in the source are `None`;
/// each report skips only the rows whose own key is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityRecord {
    pub dept_code: Option<u32>,
    pub munic_code: Option<u32>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub cause_code: Option<String>,
    pub sex: Option<i32>,
    pub age_group: Option<i32>,
}

impl MortalityRecord {
    /// Department and municipality together; municipality codes are only
    /// unique within their department.
    pub fn municipality_key(&self) -> Option<(u32, u32)> {
        Some((self.dept_code?, self.munic_code?))
    }

    /// Cause code starts with [`HOMICIDE_PREFIX`].
    pub fn is_homicide(&self) -> bool {
        self.cause_code
            .as_deref()
            .is_some_and(|c| c.starts_with(HOMICIDE_PREFIX))
    }
}

fn display_name(name: &Option<String>) -> String {
    name.clone().unwrap_or_default()
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct DepartmentTotalRow {
    #[serde(rename = "NOM_DPTO")]
    #[tabled(rename = "Departamento", display_with = "display_name")]
    pub department: Option<String>,
    #[serde(rename = "muertes")]
    #[tabled(rename = "Muertes")]
    pub deaths: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct MonthlyTotalRow {
    #[serde(rename = "mes_nombre")]
    #[tabled(rename = "Mes")]
    pub month: String,
    #[serde(rename = "muertes")]
    #[tabled(rename = "Muertes")]
    pub deaths: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ViolentMunicipalityRow {
    #[serde(rename = "NOM_MUNIC")]
    #[tabled(rename = "Ciudad", display_with = "display_name")]
    pub municipality: Option<String>,
    #[serde(rename = "homicidios")]
    #[tabled(rename = "Homicidios")]
    pub homicides: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct LowMortalityRow {
    #[serde(rename = "NOM_MUNIC")]
    #[tabled(rename = "Ciudad", display_with = "display_name")]
    pub municipality: Option<String>,
    #[serde(rename = "muertes")]
    #[tabled(rename = "Muertes")]
    pub deaths: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CauseRow {
    #[serde(rename = "codigo")]
    #[tabled(rename = "Código")]
    pub code: String,
    #[serde(rename = "causa")]
    #[tabled(rename = "Causa")]
    pub description: String,
    #[serde(rename = "total")]
    #[tabled(rename = "Total Casos")]
    pub total: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct SexDepartmentRow {
    #[serde(rename = "NOM_DPTO")]
    #[tabled(rename = "Departamento", display_with = "display_name")]
    pub department: Option<String>,
    #[serde(rename = "SEXO")]
    #[tabled(rename = "Sexo")]
    pub sex: String,
    #[serde(rename = "muertes")]
    #[tabled(rename = "Muertes")]
    pub deaths: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct AgeGroupRow {
    #[serde(rename = "grupo")]
    #[tabled(rename = "Grupo de Edad")]
    pub group: String,
    #[serde(rename = "muertes")]
    #[tabled(rename = "Muertes")]
    pub deaths: usize,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub generated_at: String,
    pub years: Vec<i32>,
    pub total_records: usize,
    pub incomplete_rows: usize,
    pub total_departments: usize,
    pub total_municipalities: usize,
    pub cause_code_catalog_rows: usize,
    pub homicide_records: usize,
}
