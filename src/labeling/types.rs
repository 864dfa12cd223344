// src/labeling/types.rs

use crate::labeling::error::InfeasibleReason;
use crate::labeling::renderer::LabelBox;
use crate::math::geometry::GeometryOps;
use crate::math::types::*;
use crate::math::utils::angles::normalize_undirected;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Das größte Einzelpolygon der Eingabe. Wird nie verändert; jede Transformation
/// erzeugt ein neues Polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct DominantPolygon {
    polygon: Polygon2D,
    area: f64,
    discarded_parts: usize,
}

impl DominantPolygon {
    pub(crate) fn new(polygon: Polygon2D, area: f64, discarded_parts: usize) -> Self {
        Self {
            polygon,
            area,
            discarded_parts,
        }
    }

    pub fn polygon(&self) -> &Polygon2D {
        &self.polygon
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Anzahl der verworfenen kleineren Teile (Nebenarme, Rauschen)
    pub fn discarded_parts(&self) -> usize {
        self.discarded_parts
    }
}

/// Woher ein Ankerpunkt stammt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSource {
    Centroid,
    PoleOfInaccessibility,
    InteriorPoint,
    /// Pol des zusätzlich erodierten Sicherheitsbereichs (Retry)
    SafeRegionPole,
    /// Entlang der Ufer-Normalen verschobener Anker (Retry)
    NormalOffset,
}

/// Ein Punkt, der zum Zeitpunkt seiner Berechnung strikt im Referenzpolygon liegt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    pub point: Point2D,
    pub source: AnchorSource,
    /// Abstand zum nächsten Rand des Referenzpolygons
    pub clearance: f64,
}

/// Ergebnis der Erosion. Darf leer sein, wenn der Abstand den Inkreisradius übersteigt.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeRegion {
    region: MultiPolygon2D,
    padding: f64,
}

impl SafeRegion {
    pub(crate) fn new(region: MultiPolygon2D, padding: f64) -> Self {
        Self { region, padding }
    }

    pub fn region(&self) -> &MultiPolygon2D {
        &self.region
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn is_empty(&self) -> bool {
        self.region.0.is_empty()
    }

    pub fn area<G: GeometryOps>(&self, ops: &G) -> f64 {
        self.region.iter().map(|part| ops.area(part)).sum()
    }

    /// Abstand zum Rand des Teils, der `point` strikt enthält; `None` außerhalb.
    pub fn clearance<G: GeometryOps>(&self, ops: &G, point: Point2D) -> Option<f64> {
        self.region
            .iter()
            .find(|part| ops.contains_point(part, point))
            .map(|part| ops.boundary_distance(part, point))
    }

    /// Die Teile sind disjunkt, ein zusammenhängendes Rechteck muss also in einem Teil liegen.
    pub fn contains_box<G: GeometryOps>(&self, ops: &G, label_box: &LabelBox) -> bool {
        let bounds = label_box.bounds();
        let outline = label_box.to_polygon();
        self.region.iter().any(|part| {
            Bounds2D::from_polygon(part).is_some_and(|b| b.contains_bounds(&bounds))
                && ops.contains_polygon(part, &outline)
        })
    }
}

/// Geschätzte lokale Fließrichtung in Grad, ungerichtet in [0, 180).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct DirectionAngle(f64);

impl DirectionAngle {
    pub const HORIZONTAL: DirectionAngle = DirectionAngle(0.0);

    pub fn from_degrees(degrees: f64) -> Self {
        if degrees.is_finite() {
            Self(normalize_undirected(degrees))
        } else {
            Self::HORIZONTAL
        }
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// Einheitsvektor senkrecht zur Fließrichtung
    pub fn normal(&self) -> Point2D {
        let rad = self.0.to_radians();
        Point2D {
            x: -rad.sin(),
            y: rad.cos(),
        }
    }
}

/// Die Textausrichtung, wie sie an den Renderer geht.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "angle", rename_all = "snake_case")]
pub enum OrientationDecision {
    Horizontal,
    /// Ein Zeichen pro Zeile, unrotiert
    VerticalStacked,
    /// Rotation in Grad, immer in (-90, 90]
    Rotated(f64),
}

impl OrientationDecision {
    pub fn rotation_deg(&self) -> f64 {
        match self {
            OrientationDecision::Horizontal | OrientationDecision::VerticalStacked => 0.0,
            OrientationDecision::Rotated(angle) => *angle,
        }
    }

    /// Der tatsächlich gerenderte Text: gestapelt ein Zeichen pro Zeile.
    pub fn render_text<'a>(&self, label: &'a str) -> Cow<'a, str> {
        match self {
            OrientationDecision::VerticalStacked => {
                let chars: Vec<String> = label.chars().map(String::from).collect();
                Cow::Owned(chars.join("\n"))
            }
            _ => Cow::Borrowed(label),
        }
    }
}

impl fmt::Display for OrientationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrientationDecision::Horizontal => write!(f, "horizontal"),
            OrientationDecision::VerticalStacked => write!(f, "vertical (stacked)"),
            OrientationDecision::Rotated(angle) => write!(f, "rotated {:.1}°", angle),
        }
    }
}

/// Eine bestätigte Platzierung.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub anchor: Anchor,
    pub orientation: OrientationDecision,
    pub direction: DirectionAngle,
    pub font_size: f64,
    /// Der gerenderte Text (bei gestapelter Ausrichtung mit Zeilenumbrüchen)
    pub text: String,
    pub label_box: LabelBox,
    /// Tatsächlich verwendeter Abstand zum Ufer
    pub padding: f64,
    /// Anzahl der Render-und-Prüf-Versuche bis zum Erfolg
    pub attempts: usize,
}

/// Endergebnis eines Laufs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlacementResult {
    Placed(Placement),
    Infeasible { reason: InfeasibleReason },
}

impl PlacementResult {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementResult::Placed(_))
    }

    pub fn placement(&self) -> Option<&Placement> {
        match self {
            PlacementResult::Placed(placement) => Some(placement),
            PlacementResult::Infeasible { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&InfeasibleReason> {
        match self {
            PlacementResult::Placed(_) => None,
            PlacementResult::Infeasible { reason } => Some(reason),
        }
    }
}

/// Zustände der Pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Start,
    Normalized,
    AnchorFound,
    Padded,
    Oriented,
    Validating,
    Placed,
    Infeasible,
}

/// Protokoll der durchlaufenen Zustände eines Laufs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageTrace {
    stages: Vec<PipelineStage>,
}

impl StageTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, stage: PipelineStage) {
        log::trace!("pipeline stage -> {:?}", stage);
        self.stages.push(stage);
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn last(&self) -> Option<PipelineStage> {
        self.stages.last().copied()
    }

    /// Wie oft die Validierung zum Anker/Sicherheitsbereich zurückgesprungen ist
    pub fn loop_backs(&self) -> usize {
        self.stages
            .windows(2)
            .filter(|w| w[0] == PipelineStage::Validating && w[1] == PipelineStage::Padded)
            .count()
    }
}

/// Ergebnis plus Zustandsprotokoll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementOutcome {
    pub result: PlacementResult,
    pub trace: StageTrace,
}
