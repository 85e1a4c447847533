//! Mesh Recurve Library.
//! Edge-Loop auf eine glatte Bézier-Kurve neu ausrichten: Loop-Erkennung,
//! Arc-Length-Resampling, Kurven-Auswertung und Rückprojektion.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    RecurveOperator, RecurveSession, SessionDisposition, SessionIntent, SessionPhase,
};
pub use core::{
    BezierKnot, BezierSegment, ControlCurve, EdgeLoop, EditMesh, HandleMode, HandleSide,
    MeshEdge, MeshHost, MeshVertex,
};
pub use core::{EdgeId, VertexId};
pub use shared::RecurveOptions;
