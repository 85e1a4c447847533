//! Stückweise kubische Bézier-Kurve mit automatischen oder freien Handles.

use crate::shared::curve_geometry::cubic_bezier;
use glam::DVec3;

/// Standard-Länge eines Auto-Handles relativ zum Abstand zum Nachbar-Knoten.
pub const DEFAULT_HANDLE_LENGTH_FACTOR: f64 = 1.0 / 3.0;

/// Wie ein Handle positioniert wird
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleMode {
    /// Aus den Nachbar-Knoten abgeleitet (glatter Verlauf)
    #[default]
    Auto,
    /// Vom Benutzer gesetzt, bleibt bei Knoten-Änderungen stehen
    Free,
}

/// Seite eines Handles relativ zum Knoten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSide {
    /// Richtung vorheriger Knoten
    Left,
    /// Richtung nächster Knoten
    Right,
}

/// Ein Knoten der Kurve samt seinen beiden Handles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierKnot {
    /// Position, durch die die Kurve exakt läuft
    pub position: DVec3,
    /// Handle Richtung vorheriger Knoten
    pub handle_left: DVec3,
    /// Handle Richtung nächster Knoten
    pub handle_right: DVec3,
    pub left_mode: HandleMode,
    pub right_mode: HandleMode,
}

impl BezierKnot {
    /// Knoten mit Auto-Handles, die vorerst auf dem Knoten liegen.
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            handle_left: position,
            handle_right: position,
            left_mode: HandleMode::Auto,
            right_mode: HandleMode::Auto,
        }
    }
}

/// Ein kubisches Segment: Start-Knoten, Start-Handle, End-Handle, End-Knoten
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierSegment {
    pub start: DVec3,
    pub start_handle: DVec3,
    pub end_handle: DVec3,
    pub end: DVec3,
}

impl BezierSegment {
    /// Punkt auf dem Segment für t ∈ [0, 1].
    pub fn point_at(&self, t: f64) -> DVec3 {
        cubic_bezier(self.start, self.start_handle, self.end_handle, self.end, t)
    }
}

/// Kontrollkurve einer Recurve-Sitzung
#[derive(Debug, Clone, PartialEq)]
pub struct ControlCurve {
    knots: Vec<BezierKnot>,
    is_cyclic: bool,
    handle_length_factor: f64,
}

impl ControlCurve {
    /// Erstellt eine Kurve durch `positions` mit ausschließlich Auto-Handles.
    pub fn from_knots(positions: &[DVec3], is_cyclic: bool, handle_length_factor: f64) -> Self {
        let mut curve = Self {
            knots: positions.iter().copied().map(BezierKnot::new).collect(),
            is_cyclic,
            handle_length_factor,
        };
        curve.recalculate_auto_handles();
        curve
    }

    /// Alle Knoten in Kurven-Reihenfolge
    pub fn knots(&self) -> &[BezierKnot] {
        &self.knots
    }

    /// Anzahl der Knoten (entspricht der Auflösung)
    pub fn knot_count(&self) -> usize {
        self.knots.len()
    }

    /// true = geschlossene Kurve
    pub fn is_cyclic(&self) -> bool {
        self.is_cyclic
    }

    /// Index des Vorgängers (zyklisch umlaufend)
    fn prev_index(&self, idx: usize) -> Option<usize> {
        match idx {
            0 if self.is_cyclic => self.knots.len().checked_sub(1),
            0 => None,
            i => Some(i - 1),
        }
    }

    /// Index des Nachfolgers (zyklisch umlaufend)
    fn next_index(&self, idx: usize) -> Option<usize> {
        if idx + 1 < self.knots.len() {
            Some(idx + 1)
        } else if self.is_cyclic && self.knots.len() > 1 {
            Some(0)
        } else {
            None
        }
    }

    /// Berechnet die Auto-Handles eines Knotens neu (freie Handles bleiben stehen).
    ///
    /// Richtung: normierte Sehne zwischen Vorgänger und Nachfolger, an offenen
    /// Enden die Richtung zum einzigen Nachbarn. Länge: Abstand zum jeweiligen
    /// Nachbarn mal `handle_length_factor`.
    fn recalculate_knot(&mut self, idx: usize) {
        let position = self.knots[idx].position;
        let prev = self.prev_index(idx).map(|i| self.knots[i].position);
        let next = self.next_index(idx).map(|i| self.knots[i].position);

        let direction = match (prev, next) {
            (Some(p), Some(n)) => (n - p).normalize_or_zero(),
            (None, Some(n)) => (n - position).normalize_or_zero(),
            (Some(p), None) => (position - p).normalize_or_zero(),
            (None, None) => DVec3::ZERO,
        };

        let factor = self.handle_length_factor;
        let left_len = prev.map_or_else(
            || next.map_or(0.0, |n| position.distance(n)),
            |p| position.distance(p),
        ) * factor;
        let right_len = next.map_or_else(
            || prev.map_or(0.0, |p| position.distance(p)),
            |n| position.distance(n),
        ) * factor;

        let knot = &mut self.knots[idx];
        if knot.left_mode == HandleMode::Auto {
            knot.handle_left = position - direction * left_len;
        }
        if knot.right_mode == HandleMode::Auto {
            knot.handle_right = position + direction * right_len;
        }
    }

    /// Berechnet alle Auto-Handles neu.
    pub fn recalculate_auto_handles(&mut self) {
        for idx in 0..self.knots.len() {
            self.recalculate_knot(idx);
        }
    }

    /// Verschiebt einen Knoten. Auto-Handles des Knotens und seiner Nachbarn
    /// werden nachgeführt, freie Handles wandern mit dem Knoten mit.
    /// Gibt `false` zurück wenn der Index ungültig ist.
    pub fn move_knot(&mut self, idx: usize, position: DVec3) -> bool {
        let Some(knot) = self.knots.get_mut(idx) else {
            return false;
        };
        let delta = position - knot.position;
        knot.position = position;
        if knot.left_mode == HandleMode::Free {
            knot.handle_left += delta;
        }
        if knot.right_mode == HandleMode::Free {
            knot.handle_right += delta;
        }

        let neighbours = [self.prev_index(idx), Some(idx), self.next_index(idx)];
        for i in neighbours.into_iter().flatten() {
            self.recalculate_knot(i);
        }
        true
    }

    /// Setzt ein Handle frei. Die Seite wechselt in den Modus `Free`.
    /// Gibt `false` zurück wenn der Index ungültig ist.
    pub fn move_handle(&mut self, idx: usize, side: HandleSide, position: DVec3) -> bool {
        let Some(knot) = self.knots.get_mut(idx) else {
            return false;
        };
        match side {
            HandleSide::Left => {
                knot.handle_left = position;
                knot.left_mode = HandleMode::Free;
            }
            HandleSide::Right => {
                knot.handle_right = position;
                knot.right_mode = HandleMode::Free;
            }
        }
        true
    }

    /// Setzt den Modus beider Handles eines Knotens. `Auto` leitet die Handles neu ab.
    /// Gibt `false` zurück wenn der Index ungültig ist.
    pub fn set_handle_mode(&mut self, idx: usize, mode: HandleMode) -> bool {
        let Some(knot) = self.knots.get_mut(idx) else {
            return false;
        };
        knot.left_mode = mode;
        knot.right_mode = mode;
        self.recalculate_knot(idx);
        true
    }

    /// Alle Segmente der Kurve, bei zyklischen Kurven inkl. Schluss-Segment.
    pub fn segments(&self) -> Vec<BezierSegment> {
        let n = self.knots.len();
        let segment_count = match n {
            0 | 1 => 0,
            _ if self.is_cyclic => n,
            _ => n - 1,
        };
        (0..segment_count)
            .map(|i| {
                let a = &self.knots[i];
                let b = &self.knots[(i + 1) % n];
                BezierSegment {
                    start: a.position,
                    start_handle: a.handle_right,
                    end_handle: b.handle_left,
                    end: b.position,
                }
            })
            .collect()
    }

    /// Tastet die Kurve in eine dichte Polyline ab.
    ///
    /// Pro Segment `samples_per_segment` Punkte bei t = i / samples (ohne Endpunkt),
    /// danach einmalig der Endpunkt des letzten Segments. Gemeinsame Knoten werden
    /// nicht doppelt ausgegeben; zyklische Kurven enden wieder auf dem ersten Knoten.
    pub fn evaluate(&self, samples_per_segment: usize) -> Vec<DVec3> {
        let samples = samples_per_segment.max(1);
        let segments = self.segments();
        let Some(last) = segments.last() else {
            return self.knots.iter().map(|k| k.position).collect();
        };

        let mut result = Vec::with_capacity(segments.len() * samples + 1);
        for segment in &segments {
            for i in 0..samples {
                let t = i as f64 / samples as f64;
                result.push(segment.point_at(t));
            }
        }
        result.push(last.end);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn knots_on_x(xs: &[f64]) -> Vec<DVec3> {
        xs.iter().map(|&x| DVec3::new(x, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_auto_handles_open_curve() {
        let curve = ControlCurve::from_knots(
            &knots_on_x(&[0.0, 3.0, 9.0]),
            false,
            DEFAULT_HANDLE_LENGTH_FACTOR,
        );
        let k = curve.knots();
        // Mittlerer Knoten: Richtung +X, links 3/3, rechts 6/3
        assert_relative_eq!(k[1].handle_left.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(k[1].handle_right.x, 5.0, epsilon = 1e-12);
        // Enden zeigen zum einzigen Nachbarn
        assert_relative_eq!(k[0].handle_right.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(k[2].handle_left.x, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_auto_handles_cyclic_square_are_tangent() {
        let square = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(3.0, 3.0, 0.0),
            DVec3::new(0.0, 3.0, 0.0),
        ];
        let curve = ControlCurve::from_knots(&square, true, DEFAULT_HANDLE_LENGTH_FACTOR);
        let k0 = curve.knots()[0];
        // Nachbarn (0,3) und (3,0) → Richtung (1,-1)/√2, Länge 1
        let dir = DVec3::new(1.0, -1.0, 0.0).normalize();
        assert!(k0.handle_right.distance(k0.position + dir) < 1e-12);
        assert!(k0.handle_left.distance(k0.position - dir) < 1e-12);
    }

    #[test]
    fn test_segments_count() {
        let pts = knots_on_x(&[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(ControlCurve::from_knots(&pts, false, 0.3).segments().len(), 3);
        assert_eq!(ControlCurve::from_knots(&pts, true, 0.3).segments().len(), 4);
    }

    #[test]
    fn test_evaluate_open_does_not_duplicate_shared_knots() {
        let curve = ControlCurve::from_knots(
            &knots_on_x(&[0.0, 1.0, 2.0]),
            false,
            DEFAULT_HANDLE_LENGTH_FACTOR,
        );
        let dense = curve.evaluate(12);
        assert_eq!(dense.len(), 2 * 12 + 1);
        assert_eq!(dense[0], DVec3::ZERO);
        assert_eq!(dense[12], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(*dense.last().unwrap(), DVec3::new(2.0, 0.0, 0.0));
        for w in dense.windows(2) {
            assert!(w[1].x > w[0].x, "Abtastung nicht monoton: {:?}", w);
        }
    }

    #[test]
    fn test_evaluate_cyclic_closes_on_first_knot() {
        let triangle = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(1.0, 2.0, 1.0),
        ];
        let curve = ControlCurve::from_knots(&triangle, true, DEFAULT_HANDLE_LENGTH_FACTOR);
        let dense = curve.evaluate(5);
        assert_eq!(dense.len(), 3 * 5 + 1);
        assert_eq!(dense[0], triangle[0]);
        assert_eq!(dense[5], triangle[1]);
        assert_eq!(dense[10], triangle[2]);
        assert_eq!(*dense.last().unwrap(), triangle[0]);
    }

    #[test]
    fn test_move_handle_switches_to_free_and_survives_knot_move() {
        let mut curve = ControlCurve::from_knots(
            &knots_on_x(&[0.0, 3.0, 6.0]),
            false,
            DEFAULT_HANDLE_LENGTH_FACTOR,
        );
        let handle = DVec3::new(4.0, 2.0, 0.0);
        assert!(curve.move_handle(1, HandleSide::Right, handle));
        assert_eq!(curve.knots()[1].right_mode, HandleMode::Free);
        assert_eq!(curve.knots()[1].left_mode, HandleMode::Auto);

        // Nachbar verschieben: freies Handle bleibt, Auto-Handle wird nachgeführt
        assert!(curve.move_knot(2, DVec3::new(9.0, 0.0, 0.0)));
        assert_eq!(curve.knots()[1].handle_right, handle);
        assert_relative_eq!(curve.knots()[2].handle_left.x, 7.0, epsilon = 1e-12);

        // Knoten selbst verschieben: freies Handle wandert mit
        assert!(curve.move_knot(1, DVec3::new(3.0, 1.0, 0.0)));
        assert_eq!(curve.knots()[1].handle_right, DVec3::new(4.0, 3.0, 0.0));

        assert!(curve.set_handle_mode(1, HandleMode::Auto));
        assert_eq!(curve.knots()[1].right_mode, HandleMode::Auto);
        assert!(!curve.move_handle(5, HandleSide::Left, DVec3::ZERO));
    }

    #[test]
    fn test_degenerate_knots_keep_handles_on_knot() {
        let p = DVec3::new(1.0, 1.0, 1.0);
        let curve = ControlCurve::from_knots(&[p, p], false, DEFAULT_HANDLE_LENGTH_FACTOR);
        for knot in curve.knots() {
            assert_eq!(knot.handle_left, p);
            assert_eq!(knot.handle_right, p);
        }
    }
}
