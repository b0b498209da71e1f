use crate::tensor::TensorKind;
use thiserror::Error;

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SparseError {
    #[error("A sparse tensor needs at least one dimension.")]
    ZeroRank,
    #[error("There are {indices} indices but {values} values.")]
    LengthMismatch { indices: usize, values: usize },
    #[error("Index {position} has {actual} components but the tensor has rank {expected}.")]
    RankMismatch {
        position: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Index {position} is out of bounds: {index} >= {dim} on axis {axis}.")]
    OutOfBound {
        position: usize,
        axis: usize,
        index: u64,
        dim: u64,
    },
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("The requested shape has rank {actual} but the tensor has rank {expected}.")]
    RankMismatch { expected: usize, actual: usize },
    #[error("Dimension {axis} cannot shrink from {declared} to {requested}.")]
    Narrowed {
        axis: usize,
        declared: u64,
        requested: u64,
    },
    #[error("Bad dimension \"{token}\".")]
    BadDimension { token: String },
    #[error("The shape holds {expected} elements but {actual} were given.")]
    DataLength { expected: u64, actual: usize },
    #[error("The number of elements overflows.")]
    Overflow,
}

/// The invalid-argument family raised by dense conversion.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("Expected a sparse tensor but got a {kind} tensor.")]
    NotSparse { kind: TensorKind },
    #[error("Invalid sparse tensor: {0}")]
    InvalidSparse(#[from] SparseError),
    #[error("Invalid shape: {0}")]
    InvalidShape(#[from] ShapeError),
    #[error("Index {index:?} appears more than once.")]
    DuplicateIndex { index: Vec<u64> },
    #[error("Summing the values at index {index:?} overflows.")]
    Overflow { index: Vec<u64> },
    #[error("The dense tensor would hold more than {max} elements.")]
    TooLarge { max: u64 },
    #[error("Invalid conversion options: {reason}.")]
    InvalidOptions { reason: String },
}
