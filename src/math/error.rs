// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Unsupported geometry type: {kind}")]
    UnsupportedGeometry { kind: String },

    #[error("Parse error at offset {offset}: {message}")]
    ParseError { offset: usize, message: String },
}

pub type MathResult<T> = Result<T, MathError>;
