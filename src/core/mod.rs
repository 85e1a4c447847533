//! Core-Domänentypen: Mesh, Edge-Loops, Kontrollkurve und Host-Schnittstelle.

/// Kontrollkurve aus kubischen Bézier-Segmenten
pub mod curve;
pub mod edge_loop;
pub mod host;
pub mod mesh;

pub use curve::{BezierKnot, BezierSegment, ControlCurve, HandleMode, HandleSide};
pub use edge_loop::{find_edge_loop, pick_starting_edge, vertices_of_edge_loop, EdgeLoop};
pub use host::MeshHost;
pub use mesh::{EdgeId, EditMesh, MeshEdge, MeshVertex, VertexId};
