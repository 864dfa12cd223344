// src/labeling/orientation.rs

use crate::labeling::config::OrientationThresholds;
use crate::labeling::types::{DirectionAngle, OrientationDecision};
use crate::math::utils::angles::readable_rotation;

/// Ordnet eine Fließrichtung genau einer Textausrichtung zu.
///
/// Die Richtung wird zuerst in den lesbaren Bereich (-90°, 90°] gefaltet (`r`), dann:
/// - `|r| <= horizontal_tolerance` → `Horizontal`
/// - `|r| >= 90 - vertical_tolerance` → `VerticalStacked`
/// - sonst `Rotated(r)`
///
/// Total und deterministisch, solange sich die Bänder nicht überlappen
/// (wird von `PlacementConfig::validate` geprüft).
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationClassifier {
    thresholds: OrientationThresholds,
}

impl OrientationClassifier {
    pub fn new(thresholds: OrientationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, direction: DirectionAngle) -> OrientationDecision {
        let rotation = readable_rotation(direction.degrees());
        let deviation = rotation.abs();

        if deviation <= self.thresholds.horizontal_tolerance_deg {
            OrientationDecision::Horizontal
        } else if deviation >= 90.0 - self.thresholds.vertical_tolerance_deg {
            OrientationDecision::VerticalStacked
        } else {
            OrientationDecision::Rotated(rotation)
        }
    }
}
