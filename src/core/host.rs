//! Schnittstelle zum Mesh der Host-Anwendung.

use super::mesh::{MeshEdge, VertexId};
use glam::DVec3;

/// Fähigkeiten des Host-Meshs, die eine Recurve-Sitzung benötigt.
///
/// Die Sitzung bekommt den Host bei jedem Aufruf explizit übergeben und
/// schreibt ausschließlich Positionen der Vertices ihrer eigenen Kette.
pub trait MeshHost {
    /// Aktuell selektierte Kanten in Selektionsreihenfolge.
    fn selected_edges(&self) -> Vec<MeshEdge>;

    /// Position eines Vertex, `None` wenn die ID unbekannt ist.
    fn vertex_position(&self, id: VertexId) -> Option<DVec3>;

    /// Setzt die Position eines Vertex. Gibt `false` zurück wenn die ID unbekannt ist.
    fn set_vertex_position(&mut self, id: VertexId, position: DVec3) -> bool;

    /// Setzt einen Undo-Checkpoint vor der ersten Mutation.
    fn push_undo_checkpoint(&mut self, _label: &str) {}
}
