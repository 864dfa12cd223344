// src/labeling/direction.rs

use crate::labeling::config::DirectionConfig;
use crate::labeling::types::DirectionAngle;
use crate::math::geometry::boundary::{ArcLengthRing, nearest_boundary_position, rings};
use crate::math::types::*;
use crate::math::utils::constants::EPSILON;
use nalgebra::Matrix2;

/// Schätzt die lokale Fließrichtung eines Flusses am Ankerpunkt.
///
/// Das Ufer wird um den nächstgelegenen Randpunkt herum abgetastet (begrenzte Anzahl
/// Stützstellen, unabhängig von der Vertex-Anzahl). Die Hauptachse der Stützstellen
/// (Eigenvektor der Kovarianzmatrix zum größten Eigenwert) ist die Fließrichtung.
/// Ein gekrümmter Fluss wird so nach seiner lokalen, nicht nach seiner globalen
/// Ausrichtung beschriftet.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionEstimator {
    config: DirectionConfig,
}

impl DirectionEstimator {
    pub fn new(config: DirectionConfig) -> Self {
        Self { config }
    }

    /// Liefert nie einen Fehler: bei zu wenigen Stützstellen oder degenerierter
    /// Verteilung wird horizontal (0°) angenommen.
    pub fn estimate(&self, polygon: &Polygon2D, anchor: Point2D) -> DirectionAngle {
        let samples = self.sample_boundary(polygon, anchor);
        if samples.len() < self.config.min_samples {
            log::debug!(
                "only {} boundary samples near anchor, assuming horizontal flow",
                samples.len()
            );
            return DirectionAngle::HORIZONTAL;
        }
        principal_axis(&samples).unwrap_or_else(|| {
            log::debug!("boundary samples are degenerate, assuming horizontal flow");
            DirectionAngle::HORIZONTAL
        })
    }

    /// Stützstellen auf dem Ring, der dem Anker am nächsten liegt
    pub fn sample_boundary(&self, polygon: &Polygon2D, anchor: Point2D) -> Vec<Point2D> {
        let Some(position) = nearest_boundary_position(polygon, anchor) else {
            return Vec::new();
        };
        let Some(ring) = rings(polygon).nth(position.ring_index) else {
            return Vec::new();
        };
        ArcLengthRing::new(ring).sample_around(
            position.arc_length,
            self.config.sample_half_length,
            self.config.max_samples,
        )
    }
}

/// Hauptachse einer Punktwolke als ungerichteter Winkel.
/// `None`, wenn die Punkte (nahezu) zusammenfallen.
fn principal_axis(points: &[Point2D]) -> Option<DirectionAngle> {
    let n = points.len() as f64;
    if n < 2.0 {
        return None;
    }
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for p in points {
        let (dx, dy) = (p.x - mean_x, p.y - mean_y);
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx + syy < EPSILON {
        return None;
    }

    let eigen = Matrix2::new(sxx, sxy, sxy, syy).symmetric_eigen();
    let major = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
        0
    } else {
        1
    };
    let axis = eigen.eigenvectors.column(major);
    Some(DirectionAngle::from_degrees(axis[1].atan2(axis[0]).to_degrees()))
}
