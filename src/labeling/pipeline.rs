// src/labeling/pipeline.rs

use crate::labeling::anchor::InteriorAnchorFinder;
use crate::labeling::config::{Padding, PlacementConfig};
use crate::labeling::direction::DirectionEstimator;
use crate::labeling::error::{ContractViolation, InfeasibleReason};
use crate::labeling::normalizer::{GeometryNormalizer, RiverGeometry};
use crate::labeling::orientation::OrientationClassifier;
use crate::labeling::padding::PaddingEngine;
use crate::labeling::renderer::TextRenderer;
use crate::labeling::types::*;
use crate::labeling::validator::PlacementValidator;
use crate::math::geometry::{GeoBackend, GeometryOps};
use crate::math::types::Point2D;

/// Führt die gesamte Platzierung für einen Fluss aus.
///
/// Zustände: `Start → Normalized → AnchorFound → Padded → Oriented → Validating →
/// {Placed | Infeasible}`. Nur `Validating` springt (begrenzt) zurück.
/// Geometrisch unmögliche Eingaben ergeben `PlacementResult::Infeasible`, nie einen `Err`;
/// `Err` gibt es nur bei Fehlbenutzung (siehe [`ContractViolation`]).
///
/// Der Placer hält keinen veränderlichen Zustand. Unabhängige Läufe (z.B. ein Fluss
/// pro Thread) können denselben Placer teilen.
#[derive(Debug, Clone)]
pub struct LabelPlacer<R, G = GeoBackend> {
    config: PlacementConfig,
    renderer: R,
    ops: G,
}

impl<R: TextRenderer> LabelPlacer<R, GeoBackend> {
    pub fn new(config: PlacementConfig, renderer: R) -> Result<Self, ContractViolation> {
        Self::with_ops(config, renderer, GeoBackend)
    }
}

impl<R: TextRenderer, G: GeometryOps> LabelPlacer<R, G> {
    pub fn with_ops(config: PlacementConfig, renderer: R, ops: G) -> Result<Self, ContractViolation> {
        config.validate()?;
        if let Padding::Fixed(padding) = config.padding {
            check_padding(padding)?;
        }
        Ok(Self {
            config,
            renderer,
            ops,
        })
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Platziert `label` und liefert das Ergebnis samt Zustandsprotokoll.
    pub fn place(
        &self,
        geometry: &RiverGeometry,
        label: &str,
    ) -> Result<PlacementOutcome, ContractViolation> {
        if label.trim().is_empty() {
            return Err(ContractViolation::EmptyLabel);
        }
        let padding = self.padding_distance()?;

        let mut trace = StageTrace::new();
        trace.enter(PipelineStage::Start);
        let result = match self.run(geometry, label, padding, &mut trace) {
            Ok(placement) => {
                trace.enter(PipelineStage::Placed);
                log::info!(
                    "placed '{}' at ({:.3}, {:.3}), {}, font size {}",
                    label,
                    placement.anchor.point.x,
                    placement.anchor.point.y,
                    placement.orientation,
                    placement.font_size
                );
                PlacementResult::Placed(placement)
            }
            Err(reason) => {
                trace.enter(PipelineStage::Infeasible);
                log::info!("cannot place '{}': {}", label, reason);
                PlacementResult::Infeasible { reason }
            }
        };

        Ok(PlacementOutcome { result, trace })
    }

    /// Wie [`place`](Self::place), ohne Protokoll.
    pub fn place_label(
        &self,
        geometry: &RiverGeometry,
        label: &str,
    ) -> Result<PlacementResult, ContractViolation> {
        self.place(geometry, label).map(|outcome| outcome.result)
    }

    fn run(
        &self,
        geometry: &RiverGeometry,
        label: &str,
        padding: f64,
        trace: &mut StageTrace,
    ) -> Result<Placement, InfeasibleReason> {
        let ops = &self.ops;

        let dominant = GeometryNormalizer::new().normalize(ops, geometry)?;
        trace.enter(PipelineStage::Normalized);
        let polygon = dominant.polygon();

        let finder = InteriorAnchorFinder::new(self.config.anchor);
        let anchor = finder.find(ops, polygon)?;
        trace.enter(PipelineStage::AnchorFound);
        log::debug!(
            "anchor ({:.3}, {:.3}) from {:?}, clearance {:.3}",
            anchor.point.x,
            anchor.point.y,
            anchor.source,
            anchor.clearance
        );

        let region = PaddingEngine::new().erode_with_fallbacks(
            ops,
            polygon,
            padding,
            &self.config.fallback_paddings,
        );
        if region.is_empty() {
            return Err(InfeasibleReason::InfeasiblePadding {
                padding,
                inradius: finder.inradius(ops, polygon),
            });
        }
        trace.enter(PipelineStage::Padded);

        let direction = DirectionEstimator::new(self.config.direction).estimate(polygon, anchor.point);
        let orientation = OrientationClassifier::new(self.config.orientation).classify(direction);
        trace.enter(PipelineStage::Oriented);
        log::debug!(
            "local flow direction {:.2}°, orientation {}",
            direction.degrees(),
            orientation
        );

        trace.enter(PipelineStage::Validating);
        let validator = PlacementValidator::new(ops, &self.renderer, &finder, self.config.retry);
        let validated = validator.validate(&anchor, &orientation, direction, label, &region, trace)?;

        Ok(Placement {
            anchor: validated.anchor,
            orientation,
            direction,
            font_size: validated.font_size,
            text: validated.text,
            label_box: validated.label_box,
            padding: region.padding(),
            attempts: validated.attempts,
        })
    }

    /// Fester Abstand oder Vielfaches der Zeilenhöhe bei maximaler Schriftgröße.
    /// Die Zeilenhöhe liefert der Renderer, gemessen an einem einzelnen Zeichen.
    fn padding_distance(&self) -> Result<f64, ContractViolation> {
        match self.config.padding {
            Padding::Fixed(padding) => check_padding(padding),
            Padding::LineHeightRatio(ratio) => {
                let sample = self.renderer.measure(
                    Point2D { x: 0.0, y: 0.0 },
                    0.0,
                    "M",
                    self.config.retry.max_font_size,
                );
                check_padding(ratio * sample.height())
            }
        }
    }
}

fn check_padding(padding: f64) -> Result<f64, ContractViolation> {
    if padding.is_finite() && padding >= 0.0 {
        Ok(padding)
    } else {
        Err(ContractViolation::InvalidPadding(padding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::renderer::MonospaceMetrics;
    use crate::math::types::{MultiPolygon2D, Polygon2D};
    use approx::assert_relative_eq;
    use geo::polygon;

    fn placer(config: PlacementConfig) -> LabelPlacer<MonospaceMetrics> {
        LabelPlacer::new(config, MonospaceMetrics::new().with_units_per_point(0.5)).unwrap()
    }

    fn river() -> RiverGeometry {
        polygon![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 10.0), (x: 0.0, y: 10.0)].into()
    }

    #[test]
    fn test_stage_sequence_for_simple_river() {
        let outcome = placer(PlacementConfig::new().with_padding(1.0))
            .place(&river(), "ELBE")
            .unwrap();
        assert!(outcome.result.is_placed());
        assert_eq!(
            outcome.trace.stages(),
            &[
                PipelineStage::Start,
                PipelineStage::Normalized,
                PipelineStage::AnchorFound,
                PipelineStage::Padded,
                PipelineStage::Oriented,
                PipelineStage::Validating,
                PipelineStage::Placed,
            ]
        );
        assert_eq!(outcome.trace.loop_backs(), 0);
    }

    #[test]
    fn test_negative_padding_is_contract_violation() {
        let err = LabelPlacer::new(
            PlacementConfig::new().with_padding(-1.0),
            MonospaceMetrics::new(),
        )
        .unwrap_err();
        assert_eq!(err, ContractViolation::InvalidPadding(-1.0));
    }

    #[test]
    fn test_blank_label_is_contract_violation() {
        let placer = placer(PlacementConfig::new().with_padding(1.0));
        assert_eq!(
            placer.place(&river(), "   ").unwrap_err(),
            ContractViolation::EmptyLabel
        );
    }

    #[test]
    fn test_line_height_padding() {
        let placer = placer(PlacementConfig::new().with_line_height_padding(0.25));
        let result = placer.place_label(&river(), "ELBE").unwrap();
        let placement = result.placement().unwrap();
        // Zeilenhöhe bei 12pt: 12 * 1.2 * 0.5 = 7.2
        assert_relative_eq!(placement.padding, 1.8, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_geometry_is_reported() {
        let empty = RiverGeometry::MultiPolygon(geo::MultiPolygon::new(vec![]));
        let outcome = placer(PlacementConfig::default()).place(&empty, "ELBE").unwrap();
        assert_eq!(outcome.result.reason(), Some(&InfeasibleReason::EmptyGeometry));
        assert_eq!(outcome.trace.last(), Some(PipelineStage::Infeasible));
    }

    /// Geometrie-Engine, deren Punkt-in-Polygon-Test nie zutrifft
    struct NoInterior;

    impl GeometryOps for NoInterior {
        fn area(&self, polygon: &Polygon2D) -> f64 {
            GeoBackend.area(polygon)
        }
        fn centroid(&self, polygon: &Polygon2D) -> Option<Point2D> {
            GeoBackend.centroid(polygon)
        }
        fn interior_point(&self, polygon: &Polygon2D) -> Option<Point2D> {
            GeoBackend.interior_point(polygon)
        }
        fn contains_point(&self, _polygon: &Polygon2D, _point: Point2D) -> bool {
            false
        }
        fn contains_polygon(&self, outer: &Polygon2D, inner: &Polygon2D) -> bool {
            GeoBackend.contains_polygon(outer, inner)
        }
        fn erode(&self, polygon: &Polygon2D, distance: f64) -> MultiPolygon2D {
            GeoBackend.erode(polygon, distance)
        }
        fn pole(&self, polygon: &Polygon2D, tolerance: f64) -> Option<Point2D> {
            GeoBackend.pole(polygon, tolerance)
        }
    }

    #[test]
    fn test_no_interior_point_stops_before_padding() {
        let placer = LabelPlacer::with_ops(
            PlacementConfig::new().with_padding(1.0),
            MonospaceMetrics::new().with_units_per_point(0.5),
            NoInterior,
        )
        .unwrap();
        let outcome = placer.place(&river(), "ELBE").unwrap();
        assert_eq!(
            outcome.result,
            PlacementResult::Infeasible {
                reason: InfeasibleReason::NoInteriorPoint
            }
        );
        assert_eq!(outcome.trace.last(), Some(PipelineStage::Infeasible));
        assert!(!outcome.trace.stages().contains(&PipelineStage::Padded));
        assert!(!outcome.trace.stages().contains(&PipelineStage::AnchorFound));
    }
}
