use base::convert::to_dense_with_shape;
use base::error::ConvertError;
use base::options::ConvertOptions;
use base::scalar::ScalarLike;
use base::shape::TensorShape;
use base::tensor::{DenseTensor, Tensor};
use log::debug;
use num_traits::Zero;

/// Converts the sparse tensor `x` into a dense tensor of `shape`.
///
/// Positions not listed in `x` hold `default_value`, or zero when it is `None`.
/// Dimensions of `shape` left unknown take the size `x` declares. Fails with
/// [`ConvertError::NotSparse`] when `x` is not a sparse tensor.
pub fn sparse_tensor_to_dense_with_shape<S: ScalarLike>(
    x: &Tensor<S>,
    shape: &TensorShape,
    default_value: Option<S>,
) -> Result<DenseTensor<S>, ConvertError> {
    sparse_tensor_to_dense_with_options(x, shape, default_value, &ConvertOptions::default())
}

pub fn sparse_tensor_to_dense_with_options<S: ScalarLike>(
    x: &Tensor<S>,
    shape: &TensorShape,
    default_value: Option<S>,
    options: &ConvertOptions,
) -> Result<DenseTensor<S>, ConvertError> {
    let Some(sparse) = x.as_sparse() else {
        return Err(ConvertError::NotSparse { kind: x.kind() });
    };
    let default_value = default_value.unwrap_or_else(S::zero);
    let dense = to_dense_with_shape(sparse, shape, default_value, options)?;
    debug!(
        "densified {} entries of a rank {} {} tensor into {:?}",
        sparse.nnz(),
        sparse.rank(),
        S::SCALAR_KIND,
        dense.shape()
    );
    Ok(dense)
}
