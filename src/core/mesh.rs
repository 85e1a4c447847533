//! Minimale Edit-Mesh-Datenstruktur: Vertices, Kanten und Kanten-Selektion.
//!
//! Steht stellvertretend für das Mesh der Host-Anwendung und wird von der
//! CLI, den Tests und den Benchmarks verwendet.

use super::host::MeshHost;
use glam::DVec3;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stabile Vertex-Identität
pub type VertexId = u64;
/// Stabile Kanten-Identität
pub type EdgeId = u64;

/// Ein Mesh-Vertex mit Position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshVertex {
    /// Eindeutige ID
    pub id: VertexId,
    /// Position in Objekt-Koordinaten
    pub position: DVec3,
}

impl MeshVertex {
    /// Erstellt einen neuen Vertex.
    pub fn new(id: VertexId, position: DVec3) -> Self {
        Self { id, position }
    }
}

/// Ungerichtete Kante zwischen zwei Vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshEdge {
    /// Eindeutige ID
    pub id: EdgeId,
    /// Die beiden Endpunkte (Reihenfolge ohne Bedeutung)
    pub vertices: [VertexId; 2],
}

impl MeshEdge {
    /// Erstellt eine neue Kante.
    pub fn new(id: EdgeId, a: VertexId, b: VertexId) -> Self {
        Self {
            id,
            vertices: [a, b],
        }
    }

    /// Prüft ob `vertex` ein Endpunkt der Kante ist.
    pub fn touches(&self, vertex: VertexId) -> bool {
        self.vertices[0] == vertex || self.vertices[1] == vertex
    }

    /// Liefert den gegenüberliegenden Endpunkt (oder `None` wenn `vertex` nicht anliegt).
    pub fn other_vertex(&self, vertex: VertexId) -> Option<VertexId> {
        match self.vertices {
            [a, b] if a == vertex => Some(b),
            [a, b] if b == vertex => Some(a),
            _ => None,
        }
    }
}

/// In-Memory-Mesh mit Kanten-Selektion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditMesh {
    /// Alle Vertices, indexiert nach ihrer ID
    pub vertices: HashMap<VertexId, MeshVertex>,
    /// Alle Kanten, indexiert nach ihrer ID
    pub edges: HashMap<EdgeId, MeshEdge>,
    /// Selektierte Kanten in Selektionsreihenfolge
    #[serde(default)]
    pub selected_edges: IndexSet<EdgeId>,
    /// Gesetzte Undo-Checkpoints (nur Labels, Undo selbst liegt beim Host)
    #[serde(skip)]
    undo_checkpoints: Vec<String>,
}

impl EditMesh {
    /// Erstellt ein leeres Mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fügt einen Vertex hinzu (überschreibt bei gleicher ID).
    pub fn add_vertex(&mut self, vertex: MeshVertex) {
        self.vertices.insert(vertex.id, vertex);
    }

    /// Fügt eine Kante hinzu (überschreibt bei gleicher ID).
    pub fn add_edge(&mut self, edge: MeshEdge) {
        self.edges.insert(edge.id, edge);
    }

    /// Selektiert eine Kante. Gibt `false` zurück wenn die Kante nicht existiert.
    pub fn select_edge(&mut self, edge_id: EdgeId) -> bool {
        if !self.edges.contains_key(&edge_id) {
            return false;
        }
        self.selected_edges.insert(edge_id);
        true
    }

    /// Hebt die Kanten-Selektion auf.
    pub fn clear_selection(&mut self) {
        self.selected_edges.clear();
    }

    /// Anzahl der Vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Anzahl der Kanten
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Labels aller bisher gesetzten Undo-Checkpoints
    pub fn undo_checkpoints(&self) -> &[String] {
        &self.undo_checkpoints
    }
}

impl MeshHost for EditMesh {
    fn selected_edges(&self) -> Vec<MeshEdge> {
        self.selected_edges
            .iter()
            .filter_map(|id| self.edges.get(id).copied())
            .collect()
    }

    fn vertex_position(&self, id: VertexId) -> Option<DVec3> {
        self.vertices.get(&id).map(|v| v.position)
    }

    fn set_vertex_position(&mut self, id: VertexId, position: DVec3) -> bool {
        let Some(vertex) = self.vertices.get_mut(&id) else {
            return false;
        };
        vertex.position = position;
        true
    }

    fn push_undo_checkpoint(&mut self, label: &str) {
        self.undo_checkpoints.push(label.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_vertex() {
        let edge = MeshEdge::new(1, 10, 20);
        assert_eq!(edge.other_vertex(10), Some(20));
        assert_eq!(edge.other_vertex(20), Some(10));
        assert_eq!(edge.other_vertex(30), None);
        assert!(edge.touches(20));
        assert!(!edge.touches(30));
    }

    #[test]
    fn test_selected_edges_keep_selection_order() {
        let mut mesh = EditMesh::new();
        for id in 1..=3 {
            mesh.add_vertex(MeshVertex::new(id, DVec3::ZERO));
        }
        mesh.add_edge(MeshEdge::new(1, 1, 2));
        mesh.add_edge(MeshEdge::new(2, 2, 3));

        assert!(mesh.select_edge(2));
        assert!(mesh.select_edge(1));
        assert!(!mesh.select_edge(99));

        let ids: Vec<EdgeId> = mesh.selected_edges().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_set_vertex_position_unknown_id() {
        let mut mesh = EditMesh::new();
        mesh.add_vertex(MeshVertex::new(1, DVec3::ZERO));
        assert!(mesh.set_vertex_position(1, DVec3::X));
        assert!(!mesh.set_vertex_position(2, DVec3::X));
        assert_eq!(mesh.vertex_position(1), Some(DVec3::X));
    }
}
