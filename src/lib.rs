//! Sparse tensor densification.
//!
//! Scatters coordinate-list sparse tensors into dense row-major tensors of a
//! requested shape, filling the unlisted positions with a default value.
#![allow(clippy::needless_range_loop)]

mod functions;
pub mod utils;

pub use base::convert::to_dense_with_shape;
pub use base::error::{ConvertError, ShapeError, SparseError};
pub use base::options::{ConvertOptions, DuplicatePolicy};
pub use base::scalar::{ScalarKind, ScalarLike};
pub use base::shape::{Dim, TensorShape};
pub use base::tensor::{DenseTensor, SparseTensor, Tensor, TensorKind};
pub use functions::{sparse_tensor_to_dense_with_options, sparse_tensor_to_dense_with_shape};
pub use utils::parse::{parse_sparse_tensor, parse_sparse_tensor_literal, ParseTensorError};
