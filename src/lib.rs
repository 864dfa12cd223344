// src/lib.rs

pub mod cli;
pub mod debug;
pub mod io;
pub mod labeling;
pub mod math;

pub use labeling::{
    ContractViolation, InfeasibleReason, LabelPlacer, MonospaceMetrics, PlacementConfig,
    PlacementResult, RiverGeometry, TextRenderer,
};
