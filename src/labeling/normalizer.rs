// src/labeling/normalizer.rs

use crate::labeling::error::InfeasibleReason;
use crate::labeling::types::DominantPolygon;
use crate::math::error::MathError;
use crate::math::geometry::GeometryOps;
use crate::math::types::*;
use crate::math::utils::constants::AREA_EPSILON;
use geo::{Geometry, MultiPolygon};

/// Flussgeometrie, wie sie von außen kommt. Die Fallunterscheidung passiert
/// einmal im [`GeometryNormalizer`]; danach gibt es nur noch ein Polygon.
#[derive(Debug, Clone, PartialEq)]
pub enum RiverGeometry {
    Polygon(Polygon2D),
    MultiPolygon(MultiPolygon2D),
}

impl RiverGeometry {
    /// Alle Teile, unabhängig von der Variante
    pub fn parts(&self) -> &[Polygon2D] {
        match self {
            RiverGeometry::Polygon(polygon) => std::slice::from_ref(polygon),
            RiverGeometry::MultiPolygon(multi) => &multi.0,
        }
    }
}

impl From<Polygon2D> for RiverGeometry {
    fn from(polygon: Polygon2D) -> Self {
        RiverGeometry::Polygon(polygon)
    }
}

impl From<MultiPolygon2D> for RiverGeometry {
    fn from(multi: MultiPolygon2D) -> Self {
        RiverGeometry::MultiPolygon(multi)
    }
}

impl TryFrom<Geometry<f64>> for RiverGeometry {
    type Error = MathError;

    fn try_from(geometry: Geometry<f64>) -> Result<Self, Self::Error> {
        match geometry {
            Geometry::Polygon(polygon) => Ok(polygon.into()),
            Geometry::MultiPolygon(multi) => Ok(multi.into()),
            Geometry::Rect(rect) => Ok(rect.to_polygon().into()),
            Geometry::Triangle(triangle) => Ok(triangle.to_polygon().into()),
            Geometry::GeometryCollection(collection) => {
                let mut parts = Vec::new();
                for member in collection {
                    let river = RiverGeometry::try_from(member)?;
                    parts.extend_from_slice(river.parts());
                }
                Ok(MultiPolygon::new(parts).into())
            }
            other => Err(MathError::UnsupportedGeometry {
                kind: geometry_kind(&other).to_string(),
            }),
        }
    }
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Reduziert eine beliebige Flussgeometrie auf das flächengrößte Einzelpolygon.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryNormalizer;

impl GeometryNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Wählt das flächengrößte Teil. Bei gleicher Fläche gewinnt das erste Teil.
    /// Degenerierte Teile (zu wenige Vertices, Fläche ~0) werden übergangen.
    pub fn normalize<G: GeometryOps>(
        &self,
        ops: &G,
        geometry: &RiverGeometry,
    ) -> Result<DominantPolygon, InfeasibleReason> {
        let parts = geometry.parts();
        let mut best: Option<(&Polygon2D, f64)> = None;

        for part in parts {
            if part.exterior().0.len() < 4 {
                continue;
            }
            let area = ops.area(part);
            if !area.is_finite() || area <= AREA_EPSILON {
                continue;
            }
            if best.is_none_or(|(_, best_area)| area > best_area) {
                best = Some((part, area));
            }
        }

        match best {
            Some((polygon, area)) => {
                let discarded = parts.len() - 1;
                if discarded > 0 {
                    log::debug!(
                        "dominant polygon area {:.3}, {} smaller part(s) discarded",
                        area,
                        discarded
                    );
                }
                Ok(DominantPolygon::new(polygon.clone(), area, discarded))
            }
            None => Err(InfeasibleReason::EmptyGeometry),
        }
    }
}
