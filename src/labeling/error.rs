// src/labeling/error.rs
use crate::math::error::MathError;
use serde::Serialize;
use thiserror::Error;

/// Gründe, warum für eine Flussgeometrie keine gültige Platzierung existiert.
///
/// Das sind keine Programmfehler: die Pipeline wandelt sie in
/// `PlacementResult::Infeasible` um, statt sie als `Err` weiterzureichen.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfeasibleReason {
    #[error("river geometry is empty or has zero area")]
    EmptyGeometry,

    #[error("no point strictly inside the river polygon exists (degenerate sliver geometry)")]
    NoInteriorPoint,

    #[error(
        "river too narrow for padding: eroding by {padding} leaves no safe interior (widest inscribed radius is about {inradius:.3})"
    )]
    InfeasiblePadding { padding: f64, inradius: f64 },

    #[error(
        "label does not fit within padded interior after {attempts} attempts (smallest font size tried: {min_font_size})"
    )]
    LabelOverflow { attempts: usize, min_font_size: f64 },
}

/// Fehlbenutzung der API. Im Gegensatz zu [`InfeasibleReason`] liegt das Problem beim Aufrufer,
/// nicht bei der Geometrie.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractViolation {
    #[error("padding distance must be finite and non-negative, got {0}")]
    InvalidPadding(f64),

    #[error("label text must not be empty")]
    EmptyLabel,

    #[error(transparent)]
    InvalidConfig(#[from] MathError),
}
