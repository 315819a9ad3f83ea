use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

/// Write `rows` to `<dir>/<chart_id>.csv` and return the path written.
pub fn write_csv<T: Serialize>(
    dir: &Path,
    chart_id: &str,
    rows: &[T],
) -> Result<PathBuf, Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{chart_id}.csv"));
    let mut wtr = csv::Writer::from_path(&path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(path)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown rendering of the first `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", title);
    println!("{}\n", render_table(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CauseRow, DepartmentTotalRow};

    #[test]
    fn csv_uses_output_column_names_and_blank_join_misses() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![
            DepartmentTotalRow { department: Some("ANTIOQUIA".into()), deaths: 3 },
            DepartmentTotalRow { department: None, deaths: 1 },
        ];
        let path = write_csv(&dir.path().join("out"), "mapa-departamentos", &rows).unwrap();
        assert!(path.ends_with("mapa-departamentos.csv"));
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "NOM_DPTO,muertes\nANTIOQUIA,3\n,1\n");
    }

    #[test]
    fn json_summary_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_json(&path, &serde_json::json!({ "total_records": 3 })).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["total_records"], 3);
    }

    #[test]
    fn preview_truncates_rows() {
        let rows: Vec<CauseRow> = (0..3)
            .map(|i| CauseRow {
                code: format!("C{i}"),
                description: "Causa no especificada".into(),
                total: 3 - i,
            })
            .collect();
        let out = render_table(&rows, 2);
        assert!(out.contains("Total Casos"));
        assert!(out.contains("C1"));
        assert!(!out.contains("C2"));
        assert_eq!(render_table::<CauseRow>(&[], 5), "(no rows)");
    }
}
