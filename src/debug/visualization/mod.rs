// src/debug/visualization/mod.rs

pub mod svg;

pub use self::svg::{create_placement_svg, render_placement_svg};
