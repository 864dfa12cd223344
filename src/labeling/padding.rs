// src/labeling/padding.rs

use crate::labeling::types::SafeRegion;
use crate::math::geometry::GeometryOps;
use crate::math::types::*;

/// Erodiert ein Polygon nach innen und liefert den Bereich, in dem eine Beschriftung
/// mindestens `padding` vom Ufer entfernt ist. Löcher bleiben erhalten.
///
/// Ein leeres Ergebnis ist gültig: der Fluss ist dann für diesen Abstand zu schmal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddingEngine;

impl PaddingEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn erode<G: GeometryOps>(&self, ops: &G, polygon: &Polygon2D, padding: f64) -> SafeRegion {
        let region = ops.erode(polygon, padding);
        if region.0.is_empty() {
            log::debug!("erosion by {} leaves no interior", padding);
        }
        SafeRegion::new(region, padding)
    }

    /// Probiert `primary` und danach die Ausweich-Abstände der Reihe nach.
    /// Liefert den ersten nicht-leeren Bereich, sonst den (leeren) Bereich für `primary`.
    pub fn erode_with_fallbacks<G: GeometryOps>(
        &self,
        ops: &G,
        polygon: &Polygon2D,
        primary: f64,
        fallbacks: &[f64],
    ) -> SafeRegion {
        let first = self.erode(ops, polygon, primary);
        if !first.is_empty() {
            return first;
        }
        for &padding in fallbacks {
            let region = self.erode(ops, polygon, padding);
            if !region.is_empty() {
                log::info!(
                    "padding {} empties the river, using fallback padding {}",
                    primary,
                    padding
                );
                return region;
            }
        }
        first
    }
}
