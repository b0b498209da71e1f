use crate::error::SparseError;
use crate::scalar::ScalarLike;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Coordinate-list sparse tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SparseTensorParts<S>")]
#[serde(bound(deserialize = "S: ScalarLike"))]
pub struct SparseTensor<S> {
    indices: Vec<Vec<u64>>,
    values: Vec<S>,
    dense_shape: Vec<u64>,
}

#[derive(Deserialize)]
struct SparseTensorParts<S> {
    indices: Vec<Vec<u64>>,
    values: Vec<S>,
    dense_shape: Vec<u64>,
}

impl<S: ScalarLike> TryFrom<SparseTensorParts<S>> for SparseTensor<S> {
    type Error = SparseError;

    fn try_from(parts: SparseTensorParts<S>) -> Result<Self, Self::Error> {
        Self::new_checked(parts.indices, parts.values, parts.dense_shape)
    }
}

impl<S: ScalarLike> SparseTensor<S> {
    #[inline(always)]
    pub fn new(indices: Vec<Vec<u64>>, values: Vec<S>, dense_shape: Vec<u64>) -> Self {
        Self::new_checked(indices, values, dense_shape).expect("invalid data")
    }

    pub fn new_checked(
        indices: Vec<Vec<u64>>,
        values: Vec<S>,
        dense_shape: Vec<u64>,
    ) -> Result<Self, SparseError> {
        let rank = dense_shape.len();
        if rank == 0 {
            return Err(SparseError::ZeroRank);
        }
        if indices.len() != values.len() {
            return Err(SparseError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }
        for (position, index) in indices.iter().enumerate() {
            if index.len() != rank {
                return Err(SparseError::RankMismatch {
                    position,
                    expected: rank,
                    actual: index.len(),
                });
            }
            for axis in 0..rank {
                if !(index[axis] < dense_shape[axis]) {
                    return Err(SparseError::OutOfBound {
                        position,
                        axis,
                        index: index[axis],
                        dim: dense_shape[axis],
                    });
                }
            }
        }
        unsafe { Ok(Self::new_unchecked(indices, values, dense_shape)) }
    }

    /// # Safety
    ///
    /// * `dense_shape` must not be empty.
    /// * `indices.len()` must be equal to `values.len()`.
    /// * Every index must have `dense_shape.len()` components, each less than the matching dimension.
    #[inline(always)]
    pub unsafe fn new_unchecked(
        indices: Vec<Vec<u64>>,
        values: Vec<S>,
        dense_shape: Vec<u64>,
    ) -> Self {
        Self {
            indices,
            values,
            dense_shape,
        }
    }

    pub fn empty(dense_shape: Vec<u64>) -> Result<Self, SparseError> {
        Self::new_checked(Vec::new(), Vec::new(), dense_shape)
    }

    #[inline(always)]
    pub fn indices(&self) -> &[Vec<u64>] {
        &self.indices
    }

    #[inline(always)]
    pub fn values(&self) -> &[S] {
        &self.values
    }

    #[inline(always)]
    pub fn dense_shape(&self) -> &[u64] {
        &self.dense_shape
    }

    #[inline(always)]
    pub fn rank(&self) -> usize {
        self.dense_shape.len()
    }

    /// Number of stored entries.
    #[inline(always)]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u64], S)> + '_ {
        self.indices
            .iter()
            .map(Vec::as_slice)
            .zip(self.values.iter().copied())
    }

    pub fn into_parts(self) -> (Vec<Vec<u64>>, Vec<S>, Vec<u64>) {
        (self.indices, self.values, self.dense_shape)
    }
}

fn write_list(f: &mut std::fmt::Formatter<'_>, items: &[u64]) -> std::fmt::Result {
    f.write_str("[")?;
    for (i, x) in items.iter().enumerate() {
        if i != 0 {
            f.write_str(", ")?;
        }
        Display::fmt(x, f)?;
    }
    f.write_str("]")
}

/// Writes the `{[i, j]: v, ...}/[d0, d1]` literal.
impl<S: ScalarLike> Display for SparseTensor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (index, value)) in self.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write_list(f, index)?;
            write!(f, ": {}", value)?;
        }
        f.write_str("}/")?;
        write_list(f, &self.dense_shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checked_accepts_valid_data() {
        let x = SparseTensor::new_checked(vec![vec![0, 0], vec![1, 2]], vec![5, 7], vec![2, 3]);
        let x = x.unwrap();
        assert_eq!(x.rank(), 2);
        assert_eq!(x.nnz(), 2);
        assert_eq!(x.dense_shape(), &[2, 3]);
        assert_eq!(
            x.iter().collect::<Vec<_>>(),
            vec![(&[0u64, 0][..], 5), (&[1u64, 2][..], 7)]
        );
    }

    #[test]
    fn new_checked_keeps_duplicates_and_order() {
        let x = SparseTensor::new(vec![vec![1], vec![0], vec![1]], vec![1.0f32, 2.0, 3.0], vec![2]);
        assert_eq!(x.indices(), &[vec![1u64], vec![0u64], vec![1u64]]);
    }

    #[test]
    fn new_checked_rejects_invalid_data() {
        assert_eq!(
            SparseTensor::<i32>::new_checked(vec![], vec![], vec![]),
            Err(SparseError::ZeroRank)
        );
        assert_eq!(
            SparseTensor::new_checked(vec![vec![0, 0]], vec![1, 2], vec![2, 3]),
            Err(SparseError::LengthMismatch {
                indices: 1,
                values: 2
            })
        );
        assert_eq!(
            SparseTensor::new_checked(vec![vec![0, 0], vec![1]], vec![1, 2], vec![2, 3]),
            Err(SparseError::RankMismatch {
                position: 1,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            SparseTensor::new_checked(vec![vec![0, 3]], vec![1], vec![2, 3]),
            Err(SparseError::OutOfBound {
                position: 0,
                axis: 1,
                index: 3,
                dim: 3
            })
        );
    }

    #[test]
    fn zero_sized_dimension_holds_no_index() {
        assert!(SparseTensor::<i32>::empty(vec![0, 4]).is_ok());
        assert!(SparseTensor::new_checked(vec![vec![0, 0]], vec![1], vec![0, 4]).is_err());
    }

    #[test]
    fn display_literal() {
        let x = SparseTensor::new(vec![vec![0, 0], vec![1, 2]], vec![5, 7], vec![2, 3]);
        assert_eq!(x.to_string(), "{[0, 0]: 5, [1, 2]: 7}/[2, 3]");
        let empty = SparseTensor::<f32>::empty(vec![4]).unwrap();
        assert_eq!(empty.to_string(), "{}/[4]");
    }

    #[test]
    fn json_parts_are_validated() {
        let x: SparseTensor<i64> = serde_json::from_str(
            r#"{"indices": [[0, 0], [1, 2]], "values": [5, 7], "dense_shape": [2, 3]}"#,
        )
        .unwrap();
        assert_eq!(x.values(), &[5, 7]);
        let ret = serde_json::from_str::<SparseTensor<i64>>(
            r#"{"indices": [[0, 0]], "values": [5, 7], "dense_shape": [2, 3]}"#,
        );
        assert!(ret.is_err());
    }
}
