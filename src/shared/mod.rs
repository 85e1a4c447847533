//! Geteilte Typen und reine Geometrie für layer-übergreifende Nutzung.

pub mod curve_geometry;
pub mod options;

pub use curve_geometry::{cubic_bezier, polyline_length, resample_by_count};
pub use options::RecurveOptions;
pub use options::{INITIAL_RESOLUTION, MAX_RESOLUTION, SAMPLES_PER_SEGMENT};
