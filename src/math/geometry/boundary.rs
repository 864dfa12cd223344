// src/math/geometry/boundary.rs

use crate::math::types::*;
use crate::math::utils::{
    constants::EPSILON,
    simple_geometry::{distance, project_point_on_segment},
};
use geo::LineString;

/// Position auf einem Ring eines Polygons, gemessen als Bogenlänge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPosition {
    /// 0 = Außenring, 1.. = Löcher
    pub ring_index: usize,
    /// Bogenlänge vom ersten Vertex des Rings bis zur Position
    pub arc_length: f64,
    /// Der Punkt selbst
    pub point: Point2D,
    /// Abstand des Abfragepunkts zu dieser Position
    pub distance: f64,
}

/// Liefert alle Ringe eines Polygons, Außenring zuerst.
pub fn rings(polygon: &Polygon2D) -> impl Iterator<Item = &LineString<f64>> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors())
}

/// Findet die Randposition mit dem kleinsten Abstand zu `point` über alle Ringe.
pub fn nearest_boundary_position(polygon: &Polygon2D, point: Point2D) -> Option<RingPosition> {
    let mut best: Option<RingPosition> = None;

    for (ring_index, ring) in rings(polygon).enumerate() {
        let mut walked = 0.0;
        for line in ring.lines() {
            let (t, projected) = project_point_on_segment(point, line.start, line.end);
            let seg_len = distance(line.start, line.end);
            let d = distance(point, projected);
            if best.map_or(true, |b| d < b.distance) {
                best = Some(RingPosition {
                    ring_index,
                    arc_length: walked + t * seg_len,
                    point: projected,
                    distance: d,
                });
            }
            walked += seg_len;
        }
    }

    best
}

/// Ein Ring mit vorberechneten kumulierten Bogenlängen.
pub struct ArcLengthRing<'a> {
    coords: &'a [Point2D],
    cumulative: Vec<f64>,
}

impl<'a> ArcLengthRing<'a> {
    pub fn new(ring: &'a LineString<f64>) -> Self {
        let coords = ring.0.as_slice();
        let mut cumulative = Vec::with_capacity(coords.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for pair in coords.windows(2) {
            total += distance(pair[0], pair[1]);
            cumulative.push(total);
        }
        Self { coords, cumulative }
    }

    /// Gesamtlänge des Rings
    pub fn perimeter(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Interpoliert den Punkt an Bogenlänge `s`. Der Ring wird zyklisch durchlaufen.
    pub fn interpolate(&self, s: f64) -> Option<Point2D> {
        let perimeter = self.perimeter();
        if self.coords.len() < 2 || perimeter < EPSILON {
            return self.coords.first().copied();
        }
        let s = s.rem_euclid(perimeter);
        // Erstes Segment, dessen Ende hinter `s` liegt
        let idx = self
            .cumulative
            .partition_point(|&c| c <= s)
            .clamp(1, self.coords.len() - 1);
        let (start, end) = (self.coords[idx - 1], self.coords[idx]);
        let seg_len = self.cumulative[idx] - self.cumulative[idx - 1];
        if seg_len < EPSILON {
            return Some(start);
        }
        let t = ((s - self.cumulative[idx - 1]) / seg_len).clamp(0.0, 1.0);
        Some(start + (end - start) * t)
    }

    /// Tastet den Ring symmetrisch um `center` ab: höchstens `max_samples` gleichmäßig
    /// verteilte Punkte im Bereich `center ± half_length`. Aufeinanderfolgende Duplikate
    /// werden verworfen.
    pub fn sample_around(&self, center: f64, half_length: f64, max_samples: usize) -> Vec<Point2D> {
        let perimeter = self.perimeter();
        if max_samples == 0 || perimeter < EPSILON {
            return Vec::new();
        }
        // Nicht weiter als einmal um den Ring herum
        let half_length = half_length.min(perimeter / 2.0);
        let count = max_samples.max(2);
        let step = 2.0 * half_length / (count - 1) as f64;

        let mut samples: Vec<Point2D> = Vec::with_capacity(count);
        for i in 0..count {
            let s = center - half_length + step * i as f64;
            if let Some(p) = self.interpolate(s) {
                let duplicate = samples
                    .last()
                    .is_some_and(|last| distance(*last, p) < EPSILON);
                if !duplicate {
                    samples.push(p);
                }
            }
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{coord, polygon};

    fn river() -> Polygon2D {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ]
    }

    #[test]
    fn test_nearest_boundary_position() {
        let pos = nearest_boundary_position(&river(), coord! { x: 40.0, y: 3.0 }).unwrap();
        assert_eq!(pos.ring_index, 0);
        assert_relative_eq!(pos.arc_length, 40.0);
        assert_relative_eq!(pos.distance, 3.0);
        assert_relative_eq!(pos.point.y, 0.0);
    }

    #[test]
    fn test_interpolate_wraps_around() {
        let poly = river();
        let ring = ArcLengthRing::new(poly.exterior());
        assert_relative_eq!(ring.perimeter(), 220.0);
        let p = ring.interpolate(-10.0).unwrap();
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 10.0);
        let q = ring.interpolate(105.0).unwrap();
        assert_relative_eq!(q.x, 100.0);
        assert_relative_eq!(q.y, 5.0);
    }

    #[test]
    fn test_sample_around_is_capped() {
        let poly = river();
        let ring = ArcLengthRing::new(poly.exterior());
        let samples = ring.sample_around(50.0, 10.0, 5);
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|p| p.y.abs() < 1e-9));
        assert_relative_eq!(samples[0].x, 40.0);
        assert_relative_eq!(samples[4].x, 60.0);
    }
}
