//! Recurve-Sitzung: Edge-Loop → Kontrollkurve → Rückprojektion auf die Vertex-Kette.
//!
//! Ablauf:
//! 1. `start()` erfasst Edge-Loop, Vertex-Kette und Original-Positionen (einmalig)
//! 2. `ChoosingResolution`: Auflösung ändern baut die Kurve aus den Original-Punkten neu
//! 3. `Editing`: Kurven-Änderungen werden laufend auf die Kette projiziert
//! 4. `Confirm` finalisiert, `Cancel` stellt die Original-Positionen wieder her

use super::{SessionDisposition, SessionIntent};
use crate::core::curve::ControlCurve;
use crate::core::edge_loop::{
    find_edge_loop, pick_starting_edge, vertices_of_edge_loop, EdgeLoop,
};
use crate::core::{MeshHost, VertexId};
use crate::shared::curve_geometry::{min_point_count, resample_by_count};
use crate::shared::options::MAX_RESOLUTION;
use crate::shared::RecurveOptions;
use anyhow::{bail, Context};
use glam::DVec3;
use std::collections::HashMap;

/// Label des Undo-Checkpoints vor der ersten Mutation
pub const UNDO_LABEL: &str = "Recurve";

/// Phasen einer Recurve-Sitzung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Auflösung wählen (Startzustand)
    ChoosingResolution,
    /// Kurve bearbeiten, Kette folgt live
    Editing,
    /// Erfolgreich beendet
    Finished,
    /// Abgebrochen, Original-Positionen wiederhergestellt
    Aborted,
}

/// Zustand einer laufenden Recurve-Sitzung.
///
/// Die Sitzung hält keine Referenz auf das Host-Mesh; der Host wird jeder
/// mutierenden Methode explizit übergeben. Geschrieben werden ausschließlich
/// die Vertices der erfassten Kette.
pub struct RecurveSession {
    edge_loop: EdgeLoop,
    /// Vertex-Kette in Lauf-Reihenfolge
    chain: Vec<VertexId>,
    /// Positionen der Kette beim Start (Quelle für jeden Kurven-Neuaufbau)
    initial_points: Vec<DVec3>,
    /// Original-Positionen je Vertex (nur für Abbruch)
    original_positions: HashMap<VertexId, DVec3>,
    curve: ControlCurve,
    resolution: usize,
    phase: SessionPhase,
    samples_per_segment: usize,
    handle_length_factor: f64,
}

impl RecurveSession {
    /// Startet eine Sitzung auf der aktuellen Kanten-Selektion des Hosts.
    ///
    /// Gibt `Ok(None)` zurück wenn keine Kanten selektiert sind (nichts zu tun).
    /// Schlägt die Erfassung fehl, bleibt das Host-Mesh unverändert.
    pub fn start(
        host: &mut dyn MeshHost,
        options: &RecurveOptions,
    ) -> anyhow::Result<Option<Self>> {
        let selected = host.selected_edges();
        let Some(starting_edge) = pick_starting_edge(&selected) else {
            log::info!("Recurve: keine Kanten selektiert, nichts zu tun");
            return Ok(None);
        };

        let edge_loop = find_edge_loop(starting_edge, &selected);
        let chain = vertices_of_edge_loop(&edge_loop);
        let is_cyclic = edge_loop.is_cyclic;

        if chain.len() < min_point_count(is_cyclic) {
            bail!(
                "Recurve: Edge-Loop zu kurz ({} Vertices, zyklisch: {})",
                chain.len(),
                is_cyclic
            );
        }

        let initial_points = chain
            .iter()
            .map(|&id| {
                host.vertex_position(id)
                    .with_context(|| format!("Recurve: Vertex {} nicht im Mesh", id))
            })
            .collect::<anyhow::Result<Vec<DVec3>>>()?;
        let original_positions: HashMap<VertexId, DVec3> =
            chain.iter().copied().zip(initial_points.iter().copied()).collect();

        host.push_undo_checkpoint(UNDO_LABEL);

        let options = options.clone().sanitized();
        let resolution = options
            .initial_resolution
            .clamp(min_point_count(is_cyclic), MAX_RESOLUTION);
        let curve = Self::build_curve(
            &initial_points,
            is_cyclic,
            resolution,
            options.handle_length_factor,
        );

        let mut session = Self {
            edge_loop,
            chain,
            initial_points,
            original_positions,
            curve,
            resolution,
            phase: SessionPhase::ChoosingResolution,
            samples_per_segment: options.samples_per_segment,
            handle_length_factor: options.handle_length_factor,
        };

        log::info!(
            "Recurve gestartet: {} Kanten, {} Vertices, zyklisch: {}, Auflösung {}",
            session.edge_loop.len(),
            session.chain.len(),
            is_cyclic,
            resolution
        );

        session.project_onto_chain(host)?;
        Ok(Some(session))
    }

    /// Kontrollkurve aus den Original-Punkten mit `resolution` Knoten.
    fn build_curve(
        points: &[DVec3],
        is_cyclic: bool,
        resolution: usize,
        handle_length_factor: f64,
    ) -> ControlCurve {
        let knots = resample_by_count(points, is_cyclic, resolution);
        ControlCurve::from_knots(&knots, is_cyclic, handle_length_factor)
    }

    /// Aktuelle Phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Aktuelle Auflösung (Anzahl Kurven-Knoten)
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Kleinste erlaubte Auflösung: 3 für Ringe, 2 für offene Pfade
    pub fn min_resolution(&self) -> usize {
        min_point_count(self.edge_loop.is_cyclic)
    }

    /// Geschlossener Ring?
    pub fn is_cyclic(&self) -> bool {
        self.edge_loop.is_cyclic
    }

    /// Erfasster Edge-Loop
    pub fn edge_loop(&self) -> &EdgeLoop {
        &self.edge_loop
    }

    /// Vertex-Kette in Lauf-Reihenfolge
    pub fn chain(&self) -> &[VertexId] {
        &self.chain
    }

    /// Aktuelle Kontrollkurve
    pub fn curve(&self) -> &ControlCurve {
        &self.curve
    }

    /// Ist die Sitzung beendet (erfolgreich oder abgebrochen)?
    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, SessionPhase::Finished | SessionPhase::Aborted)
    }

    /// Statustext für das Overlay des Hosts
    pub fn status_text(&self) -> String {
        match self.phase {
            SessionPhase::ChoosingResolution => format!(
                "Auflösung: {} (Mausrad/+/- ändern, Enter bestätigt, Esc bricht ab)",
                self.resolution
            ),
            SessionPhase::Editing => format!(
                "Kurve bearbeiten: {} Knoten (Enter übernimmt, Esc bricht ab)",
                self.resolution
            ),
            SessionPhase::Finished => "Recurve abgeschlossen".to_string(),
            SessionPhase::Aborted => "Recurve abgebrochen".to_string(),
        }
    }

    /// Setzt die Auflösung (geklemmt auf Minimum und `MAX_RESOLUTION`) und baut die Kurve neu auf.
    ///
    /// Die Kurve entsteht immer aus den Original-Punkten der Kette, nicht aus
    /// der aktuellen Kurve.
    pub fn set_resolution(
        &mut self,
        host: &mut dyn MeshHost,
        resolution: usize,
    ) -> anyhow::Result<()> {
        let clamped = resolution.clamp(self.min_resolution(), MAX_RESOLUTION);
        if clamped != resolution {
            log::debug!(
                "Recurve: Auflösung {} außerhalb [{}, {}], geklemmt auf {}",
                resolution,
                self.min_resolution(),
                MAX_RESOLUTION,
                clamped
            );
        }
        self.resolution = clamped;
        self.curve = Self::build_curve(
            &self.initial_points,
            self.edge_loop.is_cyclic,
            clamped,
            self.handle_length_factor,
        );
        self.project_onto_chain(host)
    }

    /// Auflösung um 1 erhöhen.
    pub fn increase_resolution(&mut self, host: &mut dyn MeshHost) -> anyhow::Result<()> {
        self.set_resolution(host, self.resolution + 1)
    }

    /// Auflösung um 1 verringern (nie unter das Minimum).
    pub fn decrease_resolution(&mut self, host: &mut dyn MeshHost) -> anyhow::Result<()> {
        self.set_resolution(host, self.resolution.saturating_sub(1))
    }

    /// Projiziert die aktuelle Kurve auf die Vertex-Kette.
    ///
    /// Die Kurve wird dicht abgetastet und per Arc-Length auf die Länge der Kette
    /// verteilt. Ringe werden als geschlossene Polyline mit einem Punkt mehr
    /// verteilt; der doppelte Schlusspunkt entfällt.
    pub fn project_onto_chain(&self, host: &mut dyn MeshHost) -> anyhow::Result<()> {
        let dense = self.curve.evaluate(self.samples_per_segment);
        let target = if self.edge_loop.is_cyclic {
            self.chain.len() + 1
        } else {
            self.chain.len()
        };
        let mut points = resample_by_count(&dense, false, target);
        points.truncate(self.chain.len());

        for (&id, &point) in self.chain.iter().zip(&points) {
            if !host.set_vertex_position(id, point) {
                bail!("Recurve: Vertex {} konnte nicht gesetzt werden", id);
            }
        }
        log::debug!(
            "Recurve: {} Vertices auf Kurve mit {} Knoten projiziert",
            points.len(),
            self.curve.knot_count()
        );
        Ok(())
    }

    /// Stellt die Original-Positionen aller Ketten-Vertices wieder her.
    pub fn restore(&self, host: &mut dyn MeshHost) -> anyhow::Result<()> {
        for id in &self.chain {
            let Some(&position) = self.original_positions.get(id) else {
                continue;
            };
            if !host.set_vertex_position(*id, position) {
                bail!("Recurve: Vertex {} konnte nicht wiederhergestellt werden", id);
            }
        }
        Ok(())
    }

    /// Verarbeitet einen Intent und gibt die Disposition für den Host zurück.
    pub fn handle_intent(
        &mut self,
        host: &mut dyn MeshHost,
        intent: SessionIntent,
    ) -> anyhow::Result<SessionDisposition> {
        if self.is_terminated() {
            bail!("Recurve-Sitzung ist bereits beendet ({:?})", self.phase);
        }

        match self.phase {
            SessionPhase::ChoosingResolution => self.choose_resolution(host, intent),
            _ => self.edit(host, intent),
        }
    }

    fn choose_resolution(
        &mut self,
        host: &mut dyn MeshHost,
        intent: SessionIntent,
    ) -> anyhow::Result<SessionDisposition> {
        match intent {
            SessionIntent::Cancel => self.abort(host),
            SessionIntent::Confirm => {
                self.phase = SessionPhase::Editing;
                log::info!("Recurve: Auflösung {} übernommen", self.resolution);
                Ok(SessionDisposition::Running)
            }
            SessionIntent::IncreaseResolution => {
                self.increase_resolution(host)?;
                Ok(SessionDisposition::Running)
            }
            SessionIntent::DecreaseResolution => {
                self.decrease_resolution(host)?;
                Ok(SessionDisposition::Running)
            }
            _ => Ok(SessionDisposition::PassThrough),
        }
    }

    fn edit(
        &mut self,
        host: &mut dyn MeshHost,
        intent: SessionIntent,
    ) -> anyhow::Result<SessionDisposition> {
        match intent {
            SessionIntent::Cancel => self.abort(host),
            SessionIntent::Confirm => {
                self.project_onto_chain(host)?;
                self.phase = SessionPhase::Finished;
                log::info!(
                    "Recurve abgeschlossen: {} Vertices, {} Knoten",
                    self.chain.len(),
                    self.resolution
                );
                Ok(SessionDisposition::Finished)
            }
            SessionIntent::PointerMoved => {
                self.project_onto_chain(host)?;
                Ok(SessionDisposition::PassThrough)
            }
            SessionIntent::MoveKnot { knot, position } => {
                if !self.curve.move_knot(knot, position) {
                    bail!("Recurve: Knoten {} existiert nicht", knot);
                }
                self.project_onto_chain(host)?;
                Ok(SessionDisposition::PassThrough)
            }
            SessionIntent::MoveHandle {
                knot,
                side,
                position,
            } => {
                if !self.curve.move_handle(knot, side, position) {
                    bail!("Recurve: Knoten {} existiert nicht", knot);
                }
                self.project_onto_chain(host)?;
                Ok(SessionDisposition::PassThrough)
            }
            SessionIntent::SetHandleMode { knot, mode } => {
                if !self.curve.set_handle_mode(knot, mode) {
                    bail!("Recurve: Knoten {} existiert nicht", knot);
                }
                self.project_onto_chain(host)?;
                Ok(SessionDisposition::PassThrough)
            }
            SessionIntent::IncreaseResolution | SessionIntent::DecreaseResolution => {
                Ok(SessionDisposition::PassThrough)
            }
        }
    }

    fn abort(&mut self, host: &mut dyn MeshHost) -> anyhow::Result<SessionDisposition> {
        self.restore(host)?;
        self.phase = SessionPhase::Aborted;
        log::info!("Recurve abgebrochen, Original-Positionen wiederhergestellt");
        Ok(SessionDisposition::Cancelled)
    }
}
