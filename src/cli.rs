// src/cli.rs
use crate::debug::visualization::create_placement_svg;
use crate::io::wkt::{parse_river_wkt, read_river_wkt};
use crate::labeling::{
    GeometryNormalizer, LabelPlacer, MonospaceMetrics, PaddingEngine, PlacementConfig,
    PlacementResult, RiverGeometry,
};
use crate::math::geometry::GeoBackend;
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "river-label",
    version,
    about = "Places a name label inside a river polygon"
)]
pub struct Args {
    /// Input WKT file (POLYGON / MULTIPOLYGON) or '-' for stdin
    pub input: PathBuf,

    /// Label text
    #[arg(short = 'l', long = "label", default_value = "ELBE")]
    pub label: String,

    /// Fixed distance between label and river bank, overrides the config file
    #[arg(short = 'p', long = "padding")]
    pub padding: Option<f64>,

    /// Config JSON file ({"placement": {...}, "metrics": {...}})
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Write a debug SVG of the placement to this path
    #[arg(short = 's', long = "svg")]
    pub svg: Option<PathBuf>,

    /// Geometry units per font point, overrides the config file
    #[arg(short = 'u', long = "units-per-point")]
    pub units_per_point: Option<f64>,

    /// Print the stage trace along with the result
    #[arg(long = "trace")]
    pub trace: bool,
}

/// Inhalt der Konfigurationsdatei.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub placement: PlacementConfig,
    pub metrics: MonospaceMetrics,
}

pub fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: CliConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(padding) = args.padding {
        config.placement = config.placement.with_padding(padding);
    }
    if let Some(units) = args.units_per_point {
        config.metrics = config.metrics.with_units_per_point(units);
    }

    let geometry = read_input(&args.input)?;
    let placer = LabelPlacer::new(config.placement, config.metrics)?;
    let outcome = placer.place(&geometry, &args.label)?;

    let json = if args.trace {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome.result)?
    };
    println!("{json}");

    if let Some(svg_path) = args.svg.as_deref() {
        let safe_region = safe_region_for(&geometry, &outcome.result);
        create_placement_svg(svg_path, &geometry, &outcome.result, safe_region.as_ref(), 1200.0)
            .with_context(|| format!("writing {}", svg_path.display()))?;
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<RiverGeometry> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(parse_river_wkt(&buf)?);
    }
    read_river_wkt(path).with_context(|| format!("reading {}", path.display()))
}

/// Der Sicherheitsbereich, in dem die Platzierung geprüft wurde (nur zur Anzeige).
fn safe_region_for(
    geometry: &RiverGeometry,
    result: &PlacementResult,
) -> Option<crate::math::types::MultiPolygon2D> {
    let placement = result.placement()?;
    let ops = GeoBackend;
    let dominant = GeometryNormalizer::new().normalize(&ops, geometry).ok()?;
    let region = PaddingEngine::new().erode(&ops, dominant.polygon(), placement.padding);
    Some(region.region().clone())
}
