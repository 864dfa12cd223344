// src/labeling/anchor.rs

use crate::labeling::config::AnchorConfig;
use crate::labeling::error::InfeasibleReason;
use crate::labeling::types::{Anchor, AnchorSource};
use crate::math::geometry::GeometryOps;
use crate::math::types::*;

/// Pol der Unzugänglichkeit samt Abstand zum nächsten Rand (Näherung des Inkreisradius).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pole {
    pub point: Point2D,
    pub distance: f64,
}

/// Findet einen Punkt, der strikt im Inneren eines Polygons liegt.
///
/// Reihenfolge der Kandidaten:
/// 1. Flächenschwerpunkt (nur wenn er den Punkt-in-Polygon-Test besteht; bei
///    konkaven oder gekrümmten Flüssen liegt er oft außerhalb)
/// 2. Pol der Unzugänglichkeit
/// 3. der Innenpunkt der Geometrie-Engine
///
/// Jeder Kandidat wird explizit geprüft. Gleiche Eingabe ergibt immer denselben Anker.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteriorAnchorFinder {
    config: AnchorConfig,
}

impl InteriorAnchorFinder {
    pub fn new(config: AnchorConfig) -> Self {
        Self { config }
    }

    pub fn find<G: GeometryOps>(
        &self,
        ops: &G,
        polygon: &Polygon2D,
    ) -> Result<Anchor, InfeasibleReason> {
        if let Some(centroid) = ops.centroid(polygon) {
            if ops.contains_point(polygon, centroid) {
                return Ok(Anchor {
                    point: centroid,
                    source: AnchorSource::Centroid,
                    clearance: ops.boundary_distance(polygon, centroid),
                });
            }
            log::debug!(
                "centroid ({:.3}, {:.3}) lies outside the polygon, falling back to pole search",
                centroid.x,
                centroid.y
            );
        }

        if let Some(pole) = self.pole(ops, polygon) {
            if pole.distance > 0.0 && ops.contains_point(polygon, pole.point) {
                return Ok(Anchor {
                    point: pole.point,
                    source: AnchorSource::PoleOfInaccessibility,
                    clearance: pole.distance,
                });
            }
        }

        if let Some(point) = ops.interior_point(polygon) {
            if ops.contains_point(polygon, point) {
                log::warn!("pole search failed, using engine interior point");
                return Ok(Anchor {
                    point,
                    source: AnchorSource::InteriorPoint,
                    clearance: ops.boundary_distance(polygon, point),
                });
            }
        }

        Err(InfeasibleReason::NoInteriorPoint)
    }

    /// Pol der Unzugänglichkeit mit relativer Genauigkeit
    pub fn pole<G: GeometryOps>(&self, ops: &G, polygon: &Polygon2D) -> Option<Pole> {
        let bounds = Bounds2D::from_polygon(polygon)?;
        let tolerance = bounds.width().min(bounds.height()) * self.config.pole_tolerance_ratio;
        if !(tolerance > 0.0) {
            return None;
        }
        let point = ops.pole(polygon, tolerance)?;
        let distance = ops.boundary_distance(polygon, point);
        Some(Pole {
            point,
            distance: if ops.contains_point(polygon, point) {
                distance
            } else {
                -distance
            },
        })
    }

    /// Näherung des Inkreisradius: Abstand des Pols zum Rand (0 wenn keiner existiert).
    pub fn inradius<G: GeometryOps>(&self, ops: &G, polygon: &Polygon2D) -> f64 {
        self.pole(ops, polygon)
            .map_or(0.0, |pole| pole.distance.max(0.0))
    }

    /// Der am weitesten vom Rand entfernte Pol über alle Teile eines Bereichs.
    pub fn find_in_region<G: GeometryOps>(
        &self,
        ops: &G,
        region: &MultiPolygon2D,
    ) -> Option<Anchor> {
        region
            .iter()
            .filter_map(|part| self.pole(ops, part))
            .filter(|pole| pole.distance > 0.0)
            .fold(None, |best: Option<Pole>, pole| match best {
                Some(b) if b.distance >= pole.distance => Some(b),
                _ => Some(pole),
            })
            .map(|pole| Anchor {
                point: pole.point,
                source: AnchorSource::SafeRegionPole,
                clearance: pole.distance,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::GeoBackend;
    use approx::assert_abs_diff_eq;
    use geo::{MultiPolygon, polygon};

    /// C-förmiges Polygon, dessen Schwerpunkt in der Öffnung liegt
    fn crescent() -> Polygon2D {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 40.0, y: 0.0),
            (x: 40.0, y: 6.0),
            (x: 6.0, y: 6.0),
            (x: 6.0, y: 34.0),
            (x: 40.0, y: 34.0),
            (x: 40.0, y: 40.0),
            (x: 0.0, y: 40.0),
        ]
    }

    #[test]
    fn test_centroid_used_when_inside() {
        let rect = polygon![
            (x: 0.0, y: 0.0),
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ];
        let anchor = InteriorAnchorFinder::default().find(&GeoBackend, &rect).unwrap();
        assert_eq!(anchor.source, AnchorSource::Centroid);
        assert_abs_diff_eq!(anchor.point.x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(anchor.point.y, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(anchor.clearance, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_crescent_falls_back_to_pole() {
        let shape = crescent();
        let ops = GeoBackend;
        let centroid = ops.centroid(&shape).unwrap();
        assert!(!ops.contains_point(&shape, centroid));

        let anchor = InteriorAnchorFinder::default().find(&ops, &shape).unwrap();
        assert_eq!(anchor.source, AnchorSource::PoleOfInaccessibility);
        assert!(ops.contains_point(&shape, anchor.point));
        assert!(anchor.clearance > 0.0);
    }

    #[test]
    fn test_anchor_is_deterministic() {
        let finder = InteriorAnchorFinder::default();
        let a = finder.find(&GeoBackend, &crescent()).unwrap();
        let b = finder.find(&GeoBackend, &crescent()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_region_pole_prefers_widest_part() {
        let narrow = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 2.0), (x: 0.0, y: 2.0)];
        let wide = polygon![(x: 20.0, y: 0.0), (x: 30.0, y: 0.0), (x: 30.0, y: 8.0), (x: 20.0, y: 8.0)];
        let region = MultiPolygon::new(vec![narrow, wide]);
        let anchor = InteriorAnchorFinder::default()
            .find_in_region(&GeoBackend, &region)
            .unwrap();
        assert_eq!(anchor.source, AnchorSource::SafeRegionPole);
        assert!(anchor.point.x > 20.0);
        assert_abs_diff_eq!(anchor.clearance, 4.0, epsilon = 0.1);
    }

    #[test]
    fn test_flat_polygon_has_no_pole() {
        let flat = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 5.0, y: 0.0)];
        assert!(InteriorAnchorFinder::default().pole(&GeoBackend, &flat).is_none());
        assert_eq!(InteriorAnchorFinder::default().inradius(&GeoBackend, &flat), 0.0);
    }

    #[test]
    fn test_inradius_of_rectangle() {
        let rect = polygon![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 2.0), (x: 0.0, y: 2.0)];
        let r = InteriorAnchorFinder::default().inradius(&GeoBackend, &rect);
        assert_abs_diff_eq!(r, 1.0, epsilon = 0.05);
    }
}
