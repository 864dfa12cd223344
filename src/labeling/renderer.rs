// src/labeling/renderer.rs

use crate::math::types::*;
use crate::math::utils::simple_geometry::{distance, rotate};
use geo::{LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Das (ggf. rotierte) Rechteck, das ein gerenderter Text einnimmt,
/// in Koordinaten der Flussgeometrie. Ecken gegen den Uhrzeigersinn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelBox {
    pub corners: [Point2D; 4],
}

impl LabelBox {
    /// Rechteck der Größe `width × height`, zentriert auf `center`, um `rotation_deg` gedreht.
    pub fn centered(center: Point2D, width: f64, height: f64, rotation_deg: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let angle = rotation_deg.to_radians();
        let corners = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
            .map(|(x, y)| center + rotate(Point2D { x, y }, angle));
        Self { corners }
    }

    pub fn to_polygon(&self) -> Polygon2D {
        let mut ring: Vec<Point2D> = self.corners.to_vec();
        ring.push(self.corners[0]);
        Polygon::new(LineString::new(ring), vec![])
    }

    /// Achsenparallele Hülle
    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::from_points_iter(self.corners).unwrap_or_else(Bounds2D::empty)
    }

    /// Länge der Textrichtung
    pub fn width(&self) -> f64 {
        distance(self.corners[0], self.corners[1])
    }

    pub fn height(&self) -> f64 {
        distance(self.corners[1], self.corners[2])
    }

    pub fn center(&self) -> Point2D {
        (self.corners[0] + self.corners[2]) * 0.5
    }
}

/// Der Render-Kollaborator: liefert für Anker, Rotation, Text und Schriftgröße die
/// Bounding Box des gerenderten Texts. Der Anker ist die Textmitte (horizontal und vertikal
/// zentriert). Mehrzeiliger Text ist durch `\n` getrennt.
pub trait TextRenderer {
    fn measure(&self, anchor: Point2D, rotation_deg: f64, text: &str, font_size: f64) -> LabelBox;
}

impl<T: TextRenderer + ?Sized> TextRenderer for &T {
    fn measure(&self, anchor: Point2D, rotation_deg: f64, text: &str, font_size: f64) -> LabelBox {
        (**self).measure(anchor, rotation_deg, text, font_size)
    }
}

/// Einfache Schriftmetrik mit fester Zeichenbreite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonospaceMetrics {
    /// Zeichenbreite relativ zur Schriftgröße
    pub advance_ratio: f64,
    /// Zeilenhöhe relativ zur Schriftgröße
    pub line_height_ratio: f64,
    /// Geometrie-Einheiten pro Punkt Schriftgröße
    pub units_per_point: f64,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height_ratio: 1.2,
            units_per_point: 1.0,
        }
    }
}

impl MonospaceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units_per_point(mut self, units: f64) -> Self {
        self.units_per_point = units;
        self
    }
}

impl TextRenderer for MonospaceMetrics {
    fn measure(&self, anchor: Point2D, rotation_deg: f64, text: &str, font_size: f64) -> LabelBox {
        let lines: Vec<&str> = text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let scale = font_size * self.units_per_point;
        let width = longest as f64 * self.advance_ratio * scale;
        let height = lines.len() as f64 * self.line_height_ratio * scale;
        LabelBox::centered(anchor, width, height, rotation_deg)
    }
}
