// src/labeling/mod.rs

pub mod anchor;
pub mod config;
pub mod direction;
pub mod error;
pub mod normalizer;
pub mod orientation;
pub mod padding;
pub mod pipeline;
pub mod renderer;
pub mod types;
pub mod validator;

pub use anchor::InteriorAnchorFinder;
pub use config::{
    AnchorConfig, DirectionConfig, OrientationThresholds, Padding, PlacementConfig, RetryConfig,
};
pub use direction::DirectionEstimator;
pub use error::{ContractViolation, InfeasibleReason};
pub use normalizer::{GeometryNormalizer, RiverGeometry};
pub use orientation::OrientationClassifier;
pub use padding::PaddingEngine;
pub use pipeline::LabelPlacer;
pub use renderer::{LabelBox, MonospaceMetrics, TextRenderer};
pub use types::*;
pub use validator::{PlacementValidator, ValidatedLabel};
