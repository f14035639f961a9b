// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use diarias::{load_csv, load_workbook, ReferenceData};

/// Default reference workbook, looked up in the working directory
const DATA_FILE: &str = "diarias.xlsx";

/// Optional branding asset; its absence only degrades the visual
const LOGO_FILE: &str = "logo.png";

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = env::args().collect();

    // No flags beyond startup: an optional data path (a workbook, or a
    // pair of CSVs: municipios.csv diarias.csv)
    let data = load_reference_data(&args)?;

    run_ui_mode(data)
}

fn load_reference_data(args: &[String]) -> Result<ReferenceData> {
    println!("📂 Carregando dados de referência...");

    let data = match args.get(1) {
        Some(first) if first.ends_with(".csv") => {
            let diarias_path = args
                .get(2)
                .context("Uso: diarias <municipios.csv> <diarias.csv>")?;
            load_csv(Path::new(first), Path::new(diarias_path))
        }
        Some(first) => load_workbook(Path::new(first)),
        None => load_workbook(&PathBuf::from(DATA_FILE)),
    }
    .context("Falha ao carregar os dados de referência")?;

    println!(
        "✓ {} municípios, {} tipos de diária",
        data.municipalities.len(),
        data.categories.len()
    );

    Ok(data)
}

/// The branding asset is loaded by fixed filename; a missing file is a
/// warning, never an error.
fn check_branding() -> bool {
    match fs::read(LOGO_FILE) {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!("arquivo de logo não encontrado: {LOGO_FILE} ({err})");
            false
        }
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(data: ReferenceData) -> Result<()> {
    let branded = check_branding();

    println!("Iniciando formulário... (Esc para sair)\n");

    let mut app = ui::App::new(data, branded);
    ui::run_ui(&mut app)?;

    println!("\n✅ Sessão encerrada");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_data: ReferenceData) -> Result<()> {
    let _ = check_branding();

    eprintln!("❌ Formulário interativo indisponível!");
    eprintln!("   Recompile com: cargo build --features tui");
    std::process::exit(1);
}
