//! Error types for metric evaluation
//!

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("predictions and labels differ in length ({0} != {1})")]
    LengthMismatch(usize, usize),
    #[error("class index {index} is out of range for {classes} classes")]
    ClassOutOfRange { index: usize, classes: usize },
    #[error("cannot merge confusion matrices of size {0} and {1}")]
    SizeMismatch(usize, usize),
    #[error("expected {expected} class names, found {found}")]
    ClassNames { expected: usize, found: usize },
    #[error("metric is undefined when only one class is present")]
    SingleClass,
    #[error("metric is undefined without positive labels")]
    NoPositives,
    #[error("k must lie in 1..={len}, got {k}")]
    InvalidK { k: usize, len: usize },
    #[error("not enough samples to compute the metric")]
    NotEnoughSamples,
}
