// src/debug/visualization/svg.rs
use crate::labeling::{PlacementResult, RiverGeometry};
use crate::math::types::*;
use ::svg::{Document, Node};
use ::svg::node::element::{Circle, Group, Polygon, Rectangle, Style, Text};
use std::path::Path;

// ===================================================================================
// 1. HILFS-STRUCT für die SVG-Erstellung
// ===================================================================================
/// Baut ein Debug-SVG einer Platzierung auf.
///
/// SVG zählt y nach unten, die Flussgeometrie nach oben. Alle Punkte werden deshalb
/// an der x-Achse gespiegelt, die ViewBox entsprechend verschoben.
struct SvgBuilder {
    document: Document,
    point_radius: f64,
}

impl SvgBuilder {
    /// Erstellt ein neues SVG-Grundgerüst mit Stil und Hintergrund.
    fn new(display_bounds: &Bounds2D, svg_pixel_size: f64) -> Self {
        let min_x = display_bounds.min.x;
        let min_y = -display_bounds.max.y;
        let width = display_bounds.width().max(f64::EPSILON);
        let height = display_bounds.height().max(f64::EPSILON);

        let stroke_w_normal = (width + height) / 2.0 * 0.004;
        let stroke_w_thin = (width + height) / 2.0 * 0.002;
        let point_radius = (width + height) / 2.0 * 0.006;

        let style = Style::new(format!(
            r#"
    .background {{ fill: #f0f0f0; }}
    .river {{ fill: rgba(120, 170, 230, 0.6); stroke: #1f4e8c; stroke-width: {stroke_w_normal}; fill-rule: evenodd; }}
    .safe-region {{ fill: rgba(150, 255, 150, 0.4); stroke: #00aa00; stroke-width: {stroke_w_thin}; stroke-dasharray: {dash},{dash}; fill-rule: evenodd; }}
    .label-box {{ fill: none; stroke: #cc0000; stroke-width: {stroke_w_thin}; }}
    .anchor {{ fill: #ffaaaa; stroke: #cc0000; stroke-width: {stroke_w_thin}; }}
    .label {{ font-family: monospace; fill: #000000; text-anchor: middle; dominant-baseline: middle; }}
    .status {{ font-family: sans-serif; fill: #880000; }}
"#,
            dash = stroke_w_thin * 4.0,
        ));

        let document = Document::new()
            .set("width", svg_pixel_size)
            .set("height", svg_pixel_size * height / width)
            .set("viewBox", (min_x, min_y, width, height))
            .add(style)
            .add(
                Rectangle::new()
                    .set("x", min_x)
                    .set("y", min_y)
                    .set("width", width)
                    .set("height", height)
                    .set("class", "background"),
            );

        Self {
            document,
            point_radius,
        }
    }

    fn add(&mut self, node: impl Into<Box<dyn Node>>) {
        self.document.append(node);
    }

    /// Zeichnet jeden Ring als eigenes Polygon, Löcher liegen also über dem Außenring.
    fn draw_polygon(&mut self, polygon: &Polygon2D, class: &str) {
        let mut group = Group::new().set("class", class);
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            if ring.0.len() < 3 {
                continue;
            }
            group = group.add(Polygon::new().set("points", points_attr(&ring.0)));
        }
        self.add(group);
    }

    /// Zeichnet einen Kreis.
    fn draw_circle(&mut self, center: Point2D, radius: f64, class: &str) {
        self.add(
            Circle::new()
                .set("cx", center.x)
                .set("cy", -center.y)
                .set("r", radius)
                .set("class", class),
        );
    }

    /// Zeichnet mehrzeiligen Text, zentriert auf `center` und um `rotation_deg` gedreht.
    fn draw_label(&mut self, center: Point2D, rotation_deg: f64, text: &str, line_height: f64) {
        let lines: Vec<&str> = text.split('\n').collect();
        let first = -(lines.len() as f64 - 1.0) / 2.0 * line_height;
        let mut group = Group::new().set(
            "transform",
            format!("translate({:.3} {:.3}) rotate({:.3})", center.x, -center.y, -rotation_deg),
        );
        for (i, line) in lines.iter().enumerate() {
            group = group.add(
                Text::new(*line)
                    .set("x", 0.0)
                    .set("y", first + i as f64 * line_height)
                    .set("font-size", line_height * 0.8)
                    .set("class", "label"),
            );
        }
        self.add(group);
    }

    /// Zeichnet Text in der linken oberen Ecke.
    fn draw_status(&mut self, bounds: &Bounds2D, text: &str) {
        let size = self.point_radius * 3.0;
        self.add(
            Text::new(text)
                .set("x", bounds.min.x + size * 0.5)
                .set("y", -bounds.max.y + size * 1.2)
                .set("font-size", size)
                .set("class", "status"),
        );
    }

    fn finish(self) -> Document {
        self.document
    }
}

fn points_attr(coords: &[Point2D]) -> String {
    coords
        .iter()
        .map(|p| format!("{:.3},{:.3}", p.x, -p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

// ===================================================================================
// 2. ÖFFENTLICHE FUNKTIONEN
// ===================================================================================
/// Erstellt ein SVG-Dokument mit Fluss, Sicherheitsbereich, Anker und Beschriftung.
///
/// # Arguments
/// * `geometry` - Die ursprüngliche Flussgeometrie (alle Teile).
/// * `result` - Das Ergebnis der Platzierung.
/// * `safe_region` - Optional der erodierte Bereich, wie ihn die Pipeline geprüft hat.
/// * `svg_pixel_size` - Breite der SVG in Pixeln, die Höhe folgt dem Seitenverhältnis.
pub fn render_placement_svg(
    geometry: &RiverGeometry,
    result: &PlacementResult,
    safe_region: Option<&MultiPolygon2D>,
    svg_pixel_size: f64,
) -> Document {
    let parts = geometry.parts();
    let bounds = parts
        .iter()
        .filter_map(Bounds2D::from_polygon)
        .reduce(|a, b| a.union(&b))
        .unwrap_or_else(|| Bounds2D {
            min: Point2D { x: 0.0, y: 0.0 },
            max: Point2D { x: 1.0, y: 1.0 },
        });
    let margin = bounds.width().max(bounds.height()) * 0.05;
    let display_bounds = bounds.expand(margin);

    let mut svg = SvgBuilder::new(&display_bounds, svg_pixel_size);

    for part in parts {
        svg.draw_polygon(part, "river");
    }
    if let Some(region) = safe_region {
        for part in region {
            svg.draw_polygon(part, "safe-region");
        }
    }

    match result {
        PlacementResult::Placed(placement) => {
            svg.draw_polygon(&placement.label_box.to_polygon(), "label-box");
            let lines = placement.text.split('\n').count().max(1) as f64;
            svg.draw_label(
                placement.label_box.center(),
                placement.orientation.rotation_deg(),
                &placement.text,
                placement.label_box.height() / lines,
            );
            svg.draw_circle(placement.anchor.point, svg.point_radius, "anchor");
            svg.draw_status(
                &display_bounds,
                &format!("{} / {}pt", placement.orientation, placement.font_size),
            );
        }
        PlacementResult::Infeasible { reason } => {
            svg.draw_status(&display_bounds, &reason.to_string());
        }
    }

    svg.finish()
}

/// Schreibt [`render_placement_svg`] in eine Datei.
pub fn create_placement_svg(
    filename: impl AsRef<Path>,
    geometry: &RiverGeometry,
    result: &PlacementResult,
    safe_region: Option<&MultiPolygon2D>,
    svg_pixel_size: f64,
) -> std::io::Result<()> {
    let filename = filename.as_ref();
    let document = render_placement_svg(geometry, result, safe_region, svg_pixel_size);
    ::svg::save(filename, &document)?;
    log::info!("Debug SVG '{}' wurde erstellt.", filename.display());
    Ok(())
}
