// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON: f64 = 1e-9;
    /// Flächen unterhalb dieses Werts gelten als degeneriert (z.B. Splitter nach dem Puffern).
    pub const AREA_EPSILON: f64 = 1e-9;
}

/// Winkel-Hilfsfunktionen (alle Winkel in Grad)
pub mod angles {
    /// Normalisiert eine ungerichtete Richtung auf [0, 180).
    pub fn normalize_undirected(degrees: f64) -> f64 {
        let folded = degrees.rem_euclid(180.0);
        // rem_euclid kann bei winzigen negativen Eingaben exakt 180.0 liefern
        if folded >= 180.0 { 0.0 } else { folded }
    }

    /// Faltet eine ungerichtete Richtung in den lesbaren Bereich (-90, 90].
    /// Text mit diesem Winkel steht nie auf dem Kopf.
    pub fn readable_rotation(degrees: f64) -> f64 {
        let undirected = normalize_undirected(degrees);
        if undirected > 90.0 {
            undirected - 180.0
        } else {
            undirected
        }
    }
}

/// Geometrische Hilfsfunktionen (einfach, ohne komplexe Strukturen)
pub mod simple_geometry {
    use super::constants::EPSILON;
    use geo::Coord;

    pub fn distance(p1: Coord<f64>, p2: Coord<f64>) -> f64 {
        (p2.x - p1.x).hypot(p2.y - p1.y)
    }

    /// Projiziert einen Punkt auf ein Segment.
    /// Liefert den Parameter `t` in [0, 1] und den projizierten Punkt.
    pub fn project_point_on_segment(
        point: Coord<f64>,
        start: Coord<f64>,
        end: Coord<f64>,
    ) -> (f64, Coord<f64>) {
        let seg = end - start;
        let length_sq = seg.x * seg.x + seg.y * seg.y;
        if length_sq < EPSILON {
            return (0.0, start); // Segment ist ein Punkt
        }
        let rel = point - start;
        let t = ((rel.x * seg.x + rel.y * seg.y) / length_sq).clamp(0.0, 1.0);
        (t, start + seg * t)
    }

    /// Abstand eines Punktes zu einem Segment
    pub fn point_segment_distance(point: Coord<f64>, start: Coord<f64>, end: Coord<f64>) -> f64 {
        let (_, projected) = project_point_on_segment(point, start, end);
        distance(point, projected)
    }

    /// Rotiert einen Vektor um einen Winkel (Radiant, gegen den Uhrzeigersinn)
    pub fn rotate(v: Coord<f64>, angle_rad: f64) -> Coord<f64> {
        let (sin_a, cos_a) = angle_rad.sin_cos();
        Coord {
            x: v.x * cos_a - v.y * sin_a,
            y: v.x * sin_a + v.y * cos_a,
        }
    }
}
