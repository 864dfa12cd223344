// src/labeling/config.rs

use crate::math::error::{MathError, MathResult};
use serde::{Deserialize, Serialize};

/// Wie der Abstand zwischen Beschriftung und Flussufer bestimmt wird.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Padding {
    /// Fester Abstand in Geometrie-Einheiten
    Fixed(f64),
    /// Vielfaches der Zeilenhöhe bei maximaler Schriftgröße
    LineHeightRatio(f64),
}

impl Default for Padding {
    fn default() -> Self {
        Padding::Fixed(6.0)
    }
}

/// Konfiguration der Ankerpunktsuche.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Genauigkeit der Pol-Suche relativ zur kürzeren Seite der Bounding Box
    pub pole_tolerance_ratio: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            pole_tolerance_ratio: 0.01,
        }
    }
}

/// Konfiguration der lokalen Richtungsschätzung.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionConfig {
    /// Halbe Bogenlänge, über die das Ufer um den nächsten Randpunkt abgetastet wird
    pub sample_half_length: f64,
    /// Obergrenze der Stützstellen, unabhängig von der Vertex-Anzahl
    pub max_samples: usize,
    /// Unterhalb dieser Anzahl wird horizontal (0°) angenommen
    pub min_samples: usize,
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            sample_half_length: 5.0,
            max_samples: 32,
            min_samples: 3,
        }
    }
}

/// Winkelbänder für die Wahl der Textausrichtung (Grad).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationThresholds {
    /// Maximale Abweichung von der Horizontalen für `Horizontal`
    pub horizontal_tolerance_deg: f64,
    /// Maximale Abweichung von der Vertikalen für `VerticalStacked`
    pub vertical_tolerance_deg: f64,
}

impl Default for OrientationThresholds {
    fn default() -> Self {
        Self {
            horizontal_tolerance_deg: 25.0,
            vertical_tolerance_deg: 20.0,
        }
    }
}

/// Retry-Plan der Platzierungsvalidierung.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Bevorzugte Schriftgröße
    pub max_font_size: f64,
    /// Kleinste noch lesbare Schriftgröße
    pub min_font_size: f64,
    pub font_step: f64,
    /// Schrittweite beim Verschieben des Ankers entlang der Ufer-Normalen
    pub offset_step: f64,
    pub max_offset_steps: usize,
    /// Harte Obergrenze für Render-und-Prüf-Versuche insgesamt
    pub max_attempts: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_font_size: 12.0,
            min_font_size: 8.0,
            font_step: 1.0,
            offset_step: 2.0,
            max_offset_steps: 6,
            max_attempts: 64,
        }
    }
}

impl RetryConfig {
    /// Die Schriftgrößen in Versuchsreihenfolge (absteigend, `min_font_size` zuletzt).
    ///
    /// Jede Größe kostet mindestens einen Versuch, die Liste endet deshalb spätestens
    /// nach `max_attempts` Einträgen.
    pub fn font_sizes(&self) -> Vec<f64> {
        let mut sizes = Vec::new();
        let mut step = 0;
        while sizes.len() < self.max_attempts {
            let size = self.max_font_size - step as f64 * self.font_step;
            if !(size > self.min_font_size) {
                sizes.push(self.min_font_size);
                break;
            }
            sizes.push(size);
            step += 1;
        }
        sizes
    }
}

/// Gesamtkonfiguration der Beschriftungsplatzierung.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub padding: Padding,
    /// Kleinere Abstände, die der Reihe nach versucht werden, wenn `padding` den Fluss leert.
    /// Standardmäßig leer: dann ist ein leerer Sicherheitsbereich sofort ein Ergebnis.
    pub fallback_paddings: Vec<f64>,
    pub anchor: AnchorConfig,
    pub direction: DirectionConfig,
    pub orientation: OrientationThresholds,
    pub retry: RetryConfig,
}

impl PlacementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Padding::Fixed(padding);
        self
    }

    pub fn with_line_height_padding(mut self, ratio: f64) -> Self {
        self.padding = Padding::LineHeightRatio(ratio);
        self
    }

    pub fn with_fallback_paddings(mut self, paddings: Vec<f64>) -> Self {
        self.fallback_paddings = paddings;
        self
    }

    pub fn with_font_sizes(mut self, max: f64, min: f64) -> Self {
        self.retry.max_font_size = max;
        self.retry.min_font_size = min;
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.retry.max_attempts = attempts;
        self
    }

    pub fn with_orientation(mut self, thresholds: OrientationThresholds) -> Self {
        self.orientation = thresholds;
        self
    }

    pub fn validate(&self) -> MathResult<()> {
        let invalid = |message: &str| -> MathResult<()> {
            Err(MathError::InvalidConfiguration {
                message: message.to_string(),
            })
        };

        let fallbacks_ok = self
            .fallback_paddings
            .iter()
            .all(|p| p.is_finite() && *p >= 0.0);
        if !fallbacks_ok {
            return invalid("Fallback paddings must be finite and non-negative.");
        }
        if let Padding::LineHeightRatio(ratio) = self.padding {
            if !ratio.is_finite() || ratio < 0.0 {
                return invalid("Line-height padding ratio must be finite and non-negative.");
            }
        }

        if !(self.anchor.pole_tolerance_ratio > 0.0) {
            return invalid("Pole tolerance ratio must be greater than 0.");
        }

        if !(self.direction.sample_half_length > 0.0) {
            return invalid("Direction sample length must be greater than 0.");
        }
        if self.direction.min_samples < 2 {
            return invalid("Direction estimation needs at least 2 samples to fit an axis.");
        }
        if self.direction.max_samples < self.direction.min_samples {
            return invalid("Direction max_samples must not be smaller than min_samples.");
        }

        let h = self.orientation.horizontal_tolerance_deg;
        let v = self.orientation.vertical_tolerance_deg;
        if !(h >= 0.0 && v >= 0.0) {
            return invalid("Orientation tolerances must be non-negative.");
        }
        if h + v >= 90.0 {
            return invalid("Horizontal and vertical orientation bands must not overlap (sum < 90°).");
        }

        let r = &self.retry;
        if !(r.min_font_size > 0.0) || !r.max_font_size.is_finite() {
            return invalid("Font sizes must be finite and greater than 0.");
        }
        if r.min_font_size > r.max_font_size {
            return invalid("min_font_size must not exceed max_font_size.");
        }
        if !(r.font_step > 0.0) {
            return invalid("Font step must be greater than 0.");
        }
        if r.max_font_size > r.min_font_size && r.max_font_size - r.font_step >= r.max_font_size {
            return invalid("Font step is too small to change max_font_size.");
        }
        if !(r.offset_step >= 0.0) {
            return invalid("Offset step must be non-negative.");
        }
        if r.max_attempts == 0 {
            return invalid("At least one placement attempt is required.");
        }
        Ok(())
    }
}
