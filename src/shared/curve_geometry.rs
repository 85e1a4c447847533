//! Reine Geometrie-Funktionen für Polylinien und kubische Bézier-Segmente.
//!
//! Layer-neutral: kann von `core` und `app` importiert werden ohne
//! Zirkel-Abhängigkeiten zu erzeugen. Alle Funktionen sind seiteneffektfrei.

use glam::DVec3;

/// Approximierte Länge einer Polyline.
pub fn polyline_length(points: &[DVec3]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Minimale Punktanzahl, die `resample_by_count` für eine Topologie akzeptiert.
pub fn min_point_count(is_cyclic: bool) -> usize {
    if is_cyclic {
        3
    } else {
        2
    }
}

/// Verteilt exakt `target_count` Punkte gleichmäßig (Arc-Length) entlang einer Polyline.
///
/// - offen: Abstand `L / (n - 1)`, erster und (bis auf Rundung) letzter Punkt bleiben erhalten
/// - zyklisch: Abstand `L / n`, wobei `L` das implizite Schluss-Segment
///   `points[last] → points[0]` enthält; das Schluss-Segment erzeugt keinen
///   zusätzlichen Ausgabepunkt
///
/// Der erste Ausgabepunkt ist immer `points[0]`. Fehlt durch Rundung ein Punkt,
/// wird `points[last]` angehängt. Polylinien der Länge 0 liefern den ersten Punkt
/// `target_count`-mal.
///
/// # Panics
/// Bei leerer Eingabe oder `target_count` unterhalb von [`min_point_count`].
pub fn resample_by_count(points: &[DVec3], is_cyclic: bool, target_count: usize) -> Vec<DVec3> {
    assert!(!points.is_empty(), "Resample auf leerer Polyline");
    assert!(
        target_count >= min_point_count(is_cyclic),
        "Resample mit {} Punkten unterhalb des Minimums (zyklisch: {})",
        target_count,
        is_cyclic
    );

    let first = points[0];
    let last = points[points.len() - 1];

    // Segmente inkl. implizitem Schluss-Segment bei zyklischen Pfaden
    let closing = is_cyclic.then_some((last, first));
    let segments: Vec<(DVec3, DVec3)> = points
        .windows(2)
        .map(|w| (w[0], w[1]))
        .chain(closing)
        .collect();

    let total = polyline_length(points) + closing.map_or(0.0, |(a, b)| a.distance(b));
    if total <= f64::EPSILON {
        return vec![first; target_count];
    }

    let divisions = if is_cyclic {
        target_count
    } else {
        target_count - 1
    };
    let spacing = total / divisions as f64;

    let mut result = Vec::with_capacity(target_count);
    result.push(first);

    let mut traversed = 0.0f64; // Arc-Length bis zum Anfang des aktuellen Segments
    for (a, b) in segments {
        let seg_len = a.distance(b);
        // Ziel-Distanz als Vielfaches des Abstands (kein Aufsummieren von Rundungsfehlern)
        while result.len() < target_count {
            let target = spacing * result.len() as f64;
            if target > traversed + seg_len {
                break;
            }
            let t = if seg_len > f64::EPSILON {
                ((target - traversed) / seg_len).clamp(0.0, 1.0)
            } else {
                0.0
            };
            result.push(a.lerp(b, t));
        }
        traversed += seg_len;
    }

    // Rundungsfehler: letzter Zielpunkt knapp hinter dem Pfadende
    while result.len() < target_count {
        result.push(last);
    }
    result
}

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
pub fn cubic_bezier(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}
