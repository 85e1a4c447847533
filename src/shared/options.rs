//! Zentrale Konfiguration für Recurve.
//!
//! `RecurveOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::curve::DEFAULT_HANDLE_LENGTH_FACTOR;
use anyhow::Context;
use serde::{Deserialize, Serialize};

// ── Kurve ───────────────────────────────────────────────────────────

/// Start-Auflösung (Anzahl Kurven-Knoten) einer neuen Sitzung.
pub const INITIAL_RESOLUTION: usize = 3;
/// Abtastdichte der Kurve bei der Rückprojektion (Punkte je Segment).
pub const SAMPLES_PER_SEGMENT: usize = 12;
/// Obergrenze der Auflösung (Kurven-Knoten)
pub const MAX_RESOLUTION: usize = 1024;
/// Obergrenze der Abtastdichte je Segment
pub const MAX_SAMPLES_PER_SEGMENT: usize = 256;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Recurve-Optionen.
/// Wird als `mesh_recurve.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurveOptions {
    /// Auflösung beim Start einer Sitzung (wird auf das Topologie-Minimum angehoben)
    pub initial_resolution: usize,
    /// Punkte je Bézier-Segment bei der Rückprojektion
    pub samples_per_segment: usize,
    /// Länge der Auto-Handles relativ zum Abstand zum Nachbar-Knoten
    pub handle_length_factor: f64,
}

impl Default for RecurveOptions {
    fn default() -> Self {
        Self {
            initial_resolution: INITIAL_RESOLUTION,
            samples_per_segment: SAMPLES_PER_SEGMENT,
            handle_length_factor: DEFAULT_HANDLE_LENGTH_FACTOR,
        }
    }
}

impl RecurveOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts.sanitized()
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Schreibt die (bereinigten) Optionen als TOML-Datei, z.B. als Vorlage
    /// über `mesh-recurve --write-config`.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(&self.clone().sanitized())
            .context("Optionen nicht als TOML darstellbar")?;
        std::fs::write(path, content)
            .with_context(|| format!("Optionen-Datei nicht schreibbar: {}", path.display()))?;
        log::info!("Recurve-Optionen geschrieben: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("mesh_recurve"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("mesh_recurve.toml")
    }

    /// Korrigiert unbrauchbare Werte (0 Abtastpunkte, negative Handle-Länge)
    /// und begrenzt Auflösung und Abtastdichte nach oben.
    pub fn sanitized(mut self) -> Self {
        if self.initial_resolution > MAX_RESOLUTION {
            log::warn!(
                "initial_resolution = {} zu groß, begrenzt auf {}",
                self.initial_resolution,
                MAX_RESOLUTION
            );
            self.initial_resolution = MAX_RESOLUTION;
        }
        if self.samples_per_segment == 0 {
            log::warn!("samples_per_segment = 0, verwende {}", SAMPLES_PER_SEGMENT);
            self.samples_per_segment = SAMPLES_PER_SEGMENT;
        } else if self.samples_per_segment > MAX_SAMPLES_PER_SEGMENT {
            log::warn!(
                "samples_per_segment = {} zu groß, begrenzt auf {}",
                self.samples_per_segment,
                MAX_SAMPLES_PER_SEGMENT
            );
            self.samples_per_segment = MAX_SAMPLES_PER_SEGMENT;
        }
        if !self.handle_length_factor.is_finite() || self.handle_length_factor < 0.0 {
            log::warn!(
                "handle_length_factor = {} ungültig, verwende {:.3}",
                self.handle_length_factor,
                DEFAULT_HANDLE_LENGTH_FACTOR
            );
            self.handle_length_factor = DEFAULT_HANDLE_LENGTH_FACTOR;
        }
        self
    }
}
