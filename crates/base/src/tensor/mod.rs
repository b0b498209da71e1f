pub mod dense;
pub mod sparse;

pub use dense::DenseTensor;
pub use sparse::SparseTensor;

use crate::scalar::ScalarLike;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorKind {
    Sparse,
    Dense,
}

impl Display for TensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TensorKind::Sparse => f.write_str("sparse"),
            TensorKind::Dense => f.write_str("dense"),
        }
    }
}

/// Any tensor a caller may hand to a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[serde(bound(deserialize = "S: ScalarLike"))]
pub enum Tensor<S> {
    Sparse(SparseTensor<S>),
    Dense(DenseTensor<S>),
}

impl<S: ScalarLike> Tensor<S> {
    pub fn kind(&self) -> TensorKind {
        match self {
            Tensor::Sparse(_) => TensorKind::Sparse,
            Tensor::Dense(_) => TensorKind::Dense,
        }
    }

    pub fn as_sparse(&self) -> Option<&SparseTensor<S>> {
        match self {
            Tensor::Sparse(x) => Some(x),
            Tensor::Dense(_) => None,
        }
    }

    pub fn shape(&self) -> &[u64] {
        match self {
            Tensor::Sparse(x) => x.dense_shape(),
            Tensor::Dense(x) => x.shape(),
        }
    }
}

impl<S> From<SparseTensor<S>> for Tensor<S> {
    fn from(value: SparseTensor<S>) -> Self {
        Tensor::Sparse(value)
    }
}

impl<S> From<DenseTensor<S>> for Tensor<S> {
    fn from(value: DenseTensor<S>) -> Self {
        Tensor::Dense(value)
    }
}
