// src/math/geometry/mod.rs

pub mod boundary;
pub mod ops;

pub use self::boundary::{ArcLengthRing, RingPosition, nearest_boundary_position};
pub use self::ops::{GeoBackend, GeometryOps};
