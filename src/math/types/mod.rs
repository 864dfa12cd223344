// src/math/types/mod.rs
pub mod bounds;

pub use bounds::*;

// Einheitliche Typen für das gesamte Crate (alles in f64, passend zu `geo`)
pub type Point2D = geo::Coord<f64>;
pub type Polygon2D = geo::Polygon<f64>;
pub type MultiPolygon2D = geo::MultiPolygon<f64>;
