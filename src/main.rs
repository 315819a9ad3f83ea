// Entry point: load the three source tables once, then build every chart
// table, write it to CSV and print a markdown preview.
mod catalog;
mod config;
mod error;
mod loader;
mod lookup;
mod output;
mod reports;
mod types;
mod util;

use anyhow::Context;
use clap::Parser;
use config::Config;
use loader::Dataset;
use log::{error, info};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Write one chart table and preview it. A failed write is logged and does
/// not stop the remaining charts.
fn emit<T>(out_dir: &Path, chart_id: &str, title: &str, rows: &[T], preview_rows: usize)
where
    T: Serialize + Tabled + Clone,
{
    match output::write_csv(out_dir, chart_id, rows) {
        Ok(path) => info!("{}: {} rows -> {}", chart_id, rows.len(), path.display()),
        Err(e) => error!("{}: write error: {}", chart_id, e),
    }
    output::preview_table(title, rows, preview_rows);
}

fn run(config: &Config) -> anyhow::Result<()> {
    let data = Dataset::load(&config.sources()).context("failed to load source tables")?;

    println!(
        "Registros de mortalidad: {} ({} incompletos)",
        util::format_int(data.mortality.len()),
        util::format_int(data.load_report.incomplete_rows)
    );
    println!(
        "Códigos de causas cargados: {} registros\n",
        util::format_int(data.cause_codes.len())
    );

    let out = config.output_dir.as_path();
    let n = config.preview_rows;

    emit(
        out,
        "mapa-departamentos",
        "Distribución de Muertes por Departamento",
        &reports::department_totals(&data),
        n,
    );
    emit(
        out,
        "lineas-meses",
        "Muertes por Mes en Colombia",
        &reports::monthly_totals(&data),
        n,
    );
    emit(
        out,
        "barras-violentas",
        "5 Ciudades Más Violentas (Homicidios)",
        &reports::top_violent_municipalities(&data),
        n,
    );
    emit(
        out,
        "circular-menor-mortalidad",
        "10 Ciudades con Menor Índice de Mortalidad",
        &reports::lowest_mortality_municipalities(&data),
        n,
    );
    emit(
        out,
        "tabla-causas",
        "10 Principales Causas de Muerte",
        &reports::top_causes(&data),
        n,
    );
    emit(
        out,
        "barras-apiladas-sexo",
        "Muertes por Sexo y Departamento",
        &reports::sex_by_department(&data),
        n,
    );
    match reports::age_group_distribution(&data) {
        Ok(rows) => emit(
            out,
            "histograma-edad",
            "Distribución de Muertes por Grupos de Edad",
            &rows,
            n,
        ),
        Err(e) => error!("histograma-edad: {}", e),
    }

    let summary = reports::generate_summary(&data);
    let summary_path = out.join("summary.json");
    if let Err(e) = output::write_json(&summary_path, &summary) {
        error!("summary: write error: {}", e);
    } else {
        info!("summary -> {}", summary_path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::parse();
    run(&config)
}
