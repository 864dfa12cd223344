// src/io/mod.rs

pub mod wkt;

pub use wkt::{parse_river_wkt, read_river_wkt};
