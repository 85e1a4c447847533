//! Mesh Recurve: Headless-Host.
//!
//! Lädt ein Mesh mit Kanten-Selektion aus JSON, richtet den Edge-Loop mit der
//! gewünschten Auflösung auf eine Bézier-Kurve aus und gibt das Mesh als JSON
//! auf stdout aus.
//!
//! Aufruf: `mesh-recurve <mesh.json> [--resolution N] [--config PATH] [--write-config]`

use anyhow::Context;
use clap::Parser;
use mesh_recurve::shared::options::MAX_RESOLUTION;
use mesh_recurve::{EditMesh, RecurveOperator, RecurveOptions, SessionDisposition, SessionIntent};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Mesh Recurve v{} startet...", env!("CARGO_PKG_VERSION"));

    let args = Cli::parse();
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(RecurveOptions::config_path);
    let options = RecurveOptions::load_from_file(&config_path);

    if args.write_config {
        options.save_to_file(&config_path)?;
    }
    let Some(mesh_path) = args.mesh else {
        return Ok(());
    };

    let content = std::fs::read_to_string(&mesh_path)
        .with_context(|| format!("Mesh-Datei nicht lesbar: {}", mesh_path.display()))?;
    let mut mesh: EditMesh = serde_json::from_str(&content)
        .with_context(|| format!("Mesh-Datei fehlerhaft: {}", mesh_path.display()))?;

    run_recurve(&mut mesh, options, args.resolution)?;

    println!("{}", serde_json::to_string_pretty(&mesh)?);
    Ok(())
}

/// Kommandozeilen-Argumente
#[derive(Parser)]
#[command(
    name = "mesh-recurve",
    version,
    about = "Edge-Loop eines Meshes auf eine glatte Bézier-Kurve ausrichten"
)]
struct Cli {
    /// Mesh als JSON (Vertices, Kanten, Kanten-Selektion)
    #[arg(required_unless_present = "write_config")]
    mesh: Option<PathBuf>,

    /// Ziel-Auflösung (Anzahl Kurven-Knoten), sonst aus der Konfiguration
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Pfad zur Optionen-Datei (Standard: mesh_recurve.toml neben der Binary)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Aktuelle Optionen in die Optionen-Datei schreiben
    #[arg(long)]
    write_config: bool,
}

/// Spielt eine Sitzung ohne Benutzer durch: Auflösung einstellen, zweimal bestätigen.
fn run_recurve(
    mesh: &mut EditMesh,
    options: RecurveOptions,
    resolution: Option<usize>,
) -> anyhow::Result<()> {
    let mut operator = RecurveOperator::new(options);
    if operator.invoke(mesh)? != SessionDisposition::Running {
        return Ok(());
    }

    if let Some(target) = resolution {
        let target = target.min(MAX_RESOLUTION);
        while let Some(session) = operator.session() {
            let current = session.resolution();
            let intent = if current < target {
                SessionIntent::IncreaseResolution
            } else if current > target && current > session.min_resolution() {
                SessionIntent::DecreaseResolution
            } else {
                break;
            };
            operator.modal(mesh, intent)?;
        }
    }

    if let Some(text) = operator.status_text() {
        log::info!("{}", text);
    }

    // Auflösung übernehmen, danach Ergebnis finalisieren
    operator.modal(mesh, SessionIntent::Confirm)?;
    let disposition = operator.modal(mesh, SessionIntent::Confirm)?;
    log::info!("Recurve beendet: {:?}", disposition);
    log::info!("Verlauf: {}", operator.intent_log().summary());
    Ok(())
}
