use crate::error::{ConvertError, ShapeError};
use crate::options::{ConvertOptions, DuplicatePolicy};
use crate::scalar::ScalarLike;
use crate::shape::{num_elements, offset, strides, TensorShape};
use crate::tensor::{DenseTensor, SparseTensor};
use validator::Validate;

/// Scatters `x` into a dense tensor of `shape`, filling the rest with `default_value`.
///
/// Unknown dimensions of `shape` take the size declared by `x`. Listed values
/// always overwrite the fill value; repeated indices follow `options.duplicates`.
pub fn to_dense_with_shape<S: ScalarLike>(
    x: &SparseTensor<S>,
    shape: &TensorShape,
    default_value: S,
    options: &ConvertOptions,
) -> Result<DenseTensor<S>, ConvertError> {
    if let Err(errors) = options.validate() {
        return Err(ConvertError::InvalidOptions {
            reason: errors.to_string(),
        });
    }
    let dims = shape.resolve(x.dense_shape())?;
    match num_elements(&dims) {
        Some(n) if n <= options.max_elements => (),
        _ => {
            return Err(ConvertError::TooLarge {
                max: options.max_elements,
            })
        }
    }
    let strides = strides(&dims);
    let mut offsets = Vec::with_capacity(x.nnz());
    for (position, index) in x.indices().iter().enumerate() {
        let offset = offset(&dims, &strides, index).ok_or_else(|| {
            ConvertError::InvalidShape(ShapeError::RankMismatch {
                expected: dims.len(),
                actual: index.len(),
            })
        })?;
        offsets.push((offset, position));
    }
    // stable, so repeated indices keep their input order
    offsets.sort_by_key(|&(offset, _)| offset);

    let mut dense = DenseTensor::filled(dims, default_value)?;
    let data = dense.data_mut();
    let values = x.values();
    let mut previous = None;
    for &(offset, position) in offsets.iter() {
        let slot = &mut data[offset as usize];
        let value = values[position];
        if previous == Some(offset) {
            match options.duplicates {
                DuplicatePolicy::Reject => {
                    return Err(ConvertError::DuplicateIndex {
                        index: x.indices()[position].clone(),
                    })
                }
                DuplicatePolicy::LastWins => *slot = value,
                DuplicatePolicy::Sum => {
                    *slot = slot.checked_sum(value).ok_or_else(|| ConvertError::Overflow {
                        index: x.indices()[position].clone(),
                    })?
                }
            }
        } else {
            *slot = value;
        }
        previous = Some(offset);
    }
    Ok(dense)
}
