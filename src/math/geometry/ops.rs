// src/math/geometry/ops.rs

use crate::math::types::*;
use crate::math::utils::{constants::AREA_EPSILON, simple_geometry::point_segment_distance};
use geo::{Area, Buffer, Centroid, Contains, InteriorPoint, MultiPolygon, Point};
use polylabel::polylabel;

/// Die geometrischen Primitive, die die Platzierungslogik benötigt.
///
/// Die Auswahl-, Retry- und Klassifikationslogik in `labeling` kennt nur diesen Trait,
/// nicht die konkrete Geometrie-Engine dahinter.
pub trait GeometryOps {
    /// Ungerichtete Fläche (Löcher abgezogen)
    fn area(&self, polygon: &Polygon2D) -> f64;

    /// Flächenschwerpunkt; `None` bei degenerierten Polygonen
    fn centroid(&self, polygon: &Polygon2D) -> Option<Point2D>;

    /// Irgendein Punkt im Inneren, wie ihn die Engine selbst bestimmt
    fn interior_point(&self, polygon: &Polygon2D) -> Option<Point2D>;

    /// Striktes Enthaltensein: Punkte auf dem Rand zählen nicht.
    fn contains_point(&self, polygon: &Polygon2D, point: Point2D) -> bool;

    /// Prüft ob `inner` vollständig in `outer` liegt
    fn contains_polygon(&self, outer: &Polygon2D, inner: &Polygon2D) -> bool;

    /// Negativer Puffer (Erosion) um `distance`. Das Ergebnis darf leer sein.
    fn erode(&self, polygon: &Polygon2D, distance: f64) -> MultiPolygon2D;

    /// Pol der Unzugänglichkeit mit Genauigkeit `tolerance`; `None` wenn die Suche scheitert.
    fn pole(&self, polygon: &Polygon2D, tolerance: f64) -> Option<Point2D>;

    /// Kürzester Abstand eines Punktes zu irgendeinem Ring (Außenring oder Loch)
    fn boundary_distance(&self, polygon: &Polygon2D, point: Point2D) -> f64 {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .flat_map(|ring| ring.lines())
            .map(|line| point_segment_distance(point, line.start, line.end))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Implementierung von [`GeometryOps`] mit dem `geo`-Crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoBackend;

impl GeometryOps for GeoBackend {
    fn area(&self, polygon: &Polygon2D) -> f64 {
        polygon.unsigned_area()
    }

    fn centroid(&self, polygon: &Polygon2D) -> Option<Point2D> {
        polygon.centroid().map(|p| p.0)
    }

    fn interior_point(&self, polygon: &Polygon2D) -> Option<Point2D> {
        polygon.interior_point().map(|p| p.0)
    }

    fn contains_point(&self, polygon: &Polygon2D, point: Point2D) -> bool {
        polygon.contains(&Point(point))
    }

    fn contains_polygon(&self, outer: &Polygon2D, inner: &Polygon2D) -> bool {
        outer.contains(inner)
    }

    fn erode(&self, polygon: &Polygon2D, distance: f64) -> MultiPolygon2D {
        if distance <= 0.0 {
            return MultiPolygon::new(vec![polygon.clone()]);
        }
        let eroded = polygon.buffer(-distance);
        // Numerische Splitter verwerfen
        MultiPolygon::new(
            eroded
                .into_iter()
                .filter(|part| part.unsigned_area() > AREA_EPSILON)
                .collect(),
        )
    }

    fn pole(&self, polygon: &Polygon2D, tolerance: f64) -> Option<Point2D> {
        match polylabel(polygon, &tolerance) {
            Ok(point) => Some(point.0),
            Err(err) => {
                log::debug!("polylabel failed: {:?}", err);
                None
            }
        }
    }
}
