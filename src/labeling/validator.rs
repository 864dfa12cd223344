// src/labeling/validator.rs

use crate::labeling::anchor::InteriorAnchorFinder;
use crate::labeling::config::RetryConfig;
use crate::labeling::error::InfeasibleReason;
use crate::labeling::renderer::{LabelBox, TextRenderer};
use crate::labeling::types::{
    Anchor, AnchorSource, DirectionAngle, OrientationDecision, PipelineStage, SafeRegion,
    StageTrace,
};
use crate::math::geometry::GeometryOps;
use crate::math::types::*;
use crate::math::utils::{constants::EPSILON, simple_geometry::distance};

/// Eine Beschriftung, deren gerenderte Box vollständig im Sicherheitsbereich liegt.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLabel {
    pub anchor: Anchor,
    pub font_size: f64,
    pub text: String,
    pub label_box: LabelBox,
    pub attempts: usize,
}

/// Prüft gerenderte Beschriftungen gegen den Sicherheitsbereich und steuert die Retries.
///
/// Versuchsplan je Schriftgröße (absteigend von `max_font_size` bis `min_font_size`):
/// 1. der ursprüngliche Anker
/// 2. der Pol des um die halbe kurze Seite der Textbox zusätzlich erodierten Bereichs
///    (Rücksprung zu Padded/AnchorFound)
/// 3. Verschiebungen entlang der Ufer-Normalen um `k * offset_step`, abwechselnd zu
///    beiden Seiten, solange der Punkt im Sicherheitsbereich liegt
///
/// Jeder Render-und-Prüf-Schritt zählt als Versuch, `max_attempts` begrenzt die Summe.
pub struct PlacementValidator<'a, G, R> {
    ops: &'a G,
    renderer: &'a R,
    anchor_finder: &'a InteriorAnchorFinder,
    config: RetryConfig,
}

impl<'a, G: GeometryOps, R: TextRenderer> PlacementValidator<'a, G, R> {
    pub fn new(
        ops: &'a G,
        renderer: &'a R,
        anchor_finder: &'a InteriorAnchorFinder,
        config: RetryConfig,
    ) -> Self {
        Self {
            ops,
            renderer,
            anchor_finder,
            config,
        }
    }

    /// Prüft genau eine Kombination aus Anker, Ausrichtung und Schriftgröße.
    pub fn check(
        &self,
        anchor: Point2D,
        decision: &OrientationDecision,
        text: &str,
        font_size: f64,
        region: &SafeRegion,
    ) -> (bool, LabelBox) {
        let label_box = self
            .renderer
            .measure(anchor, decision.rotation_deg(), text, font_size);
        (region.contains_box(self.ops, &label_box), label_box)
    }

    pub fn validate(
        &self,
        anchor: &Anchor,
        decision: &OrientationDecision,
        direction: DirectionAngle,
        label: &str,
        region: &SafeRegion,
        trace: &mut StageTrace,
    ) -> Result<ValidatedLabel, InfeasibleReason> {
        let text = decision.render_text(label);
        let offsets = self.offset_candidates(anchor, direction, region);
        let mut attempts = 0;

        for font_size in self.config.font_sizes() {
            let mut tried: Vec<Point2D> = Vec::new();
            // Der Rücksprung wird nur berechnet, wenn der ursprüngliche Anker scheitert
            let reanchored = std::iter::once_with(|| {
                self.reanchor(anchor, decision, &text, font_size, region, trace)
            })
            .flatten();
            let candidates = std::iter::once(*anchor)
                .chain(reanchored)
                .chain(offsets.iter().copied());

            for candidate in candidates {
                if tried.iter().any(|p| distance(*p, candidate.point) < EPSILON) {
                    continue;
                }
                if attempts >= self.config.max_attempts {
                    return Err(self.overflow(attempts));
                }
                tried.push(candidate.point);
                attempts += 1;

                let (fits, label_box) =
                    self.check(candidate.point, decision, &text, font_size, region);
                if fits {
                    log::debug!(
                        "label fits at ({:.3}, {:.3}) with font size {} after {} attempt(s)",
                        candidate.point.x,
                        candidate.point.y,
                        font_size,
                        attempts
                    );
                    return Ok(ValidatedLabel {
                        anchor: candidate,
                        font_size,
                        text: text.to_string(),
                        label_box,
                        attempts,
                    });
                }
            }
            log::debug!("font size {} does not fit, reducing", font_size);
        }

        Err(self.overflow(attempts))
    }

    fn overflow(&self, attempts: usize) -> InfeasibleReason {
        log::warn!("label overflow after {} attempts", attempts);
        InfeasibleReason::LabelOverflow {
            attempts,
            min_font_size: self.config.min_font_size,
        }
    }

    /// Neuer Anker im zusätzlich erodierten Bereich: um die halbe kurze Seite der Box
    /// geschrumpft, sodass jeder innere Punkt genug Platz für die Textmitte hat.
    fn reanchor(
        &self,
        anchor: &Anchor,
        decision: &OrientationDecision,
        text: &str,
        font_size: f64,
        region: &SafeRegion,
        trace: &mut StageTrace,
    ) -> Option<Anchor> {
        let sample = self
            .renderer
            .measure(anchor.point, decision.rotation_deg(), text, font_size);
        let margin = sample.width().min(sample.height()) / 2.0;
        if !(margin > 0.0) {
            return None;
        }

        trace.enter(PipelineStage::Padded);
        let tighter: MultiPolygon2D = geo::MultiPolygon::new(
            region
                .region()
                .iter()
                .flat_map(|part| self.ops.erode(part, margin))
                .collect(),
        );
        let pole = self.anchor_finder.find_in_region(self.ops, &tighter);
        if pole.is_some() {
            trace.enter(PipelineStage::AnchorFound);
        }
        trace.enter(PipelineStage::Validating);
        pole
    }

    /// Verschiebungen entlang der Ufer-Normalen, abwechselnd zu beiden Seiten
    fn offset_candidates(
        &self,
        anchor: &Anchor,
        direction: DirectionAngle,
        region: &SafeRegion,
    ) -> Vec<Anchor> {
        let normal = direction.normal();
        let mut candidates = Vec::new();
        for k in 1..=self.config.max_offset_steps {
            let offset = self.config.offset_step * k as f64;
            for sign in [1.0, -1.0] {
                let point = anchor.point + normal * (sign * offset);
                if let Some(clearance) = region.clearance(self.ops, point) {
                    candidates.push(Anchor {
                        point,
                        source: AnchorSource::NormalOffset,
                        clearance,
                    });
                }
            }
        }
        candidates
    }
}
