use crate::error::ShapeError;
use crate::scalar::ScalarLike;
use crate::shape::num_elements;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

/// Fully materialized tensor stored in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DenseTensorParts<S>")]
#[serde(bound(deserialize = "S: ScalarLike"))]
pub struct DenseTensor<S> {
    shape: Vec<u64>,
    data: Vec<S>,
}

#[derive(Deserialize)]
struct DenseTensorParts<S> {
    shape: Vec<u64>,
    data: Vec<S>,
}

impl<S: ScalarLike> TryFrom<DenseTensorParts<S>> for DenseTensor<S> {
    type Error = ShapeError;

    fn try_from(parts: DenseTensorParts<S>) -> Result<Self, Self::Error> {
        Self::from_vec(parts.shape, parts.data)
    }
}

impl<S: ScalarLike> DenseTensor<S> {
    pub fn filled(shape: Vec<u64>, value: S) -> Result<Self, ShapeError> {
        let n = num_elements(&shape)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(ShapeError::Overflow)?;
        Ok(Self {
            shape,
            data: vec![value; n],
        })
    }

    pub fn from_vec(shape: Vec<u64>, data: Vec<S>) -> Result<Self, ShapeError> {
        let expected = num_elements(&shape).ok_or(ShapeError::Overflow)?;
        if expected != data.len() as u64 {
            return Err(ShapeError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    #[inline(always)]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    #[inline(always)]
    pub fn data(&self) -> &[S] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [S] {
        &mut self.data
    }

    #[inline(always)]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    #[inline(always)]
    pub fn num_elements(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, index: &[u64]) -> Option<S> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0u64;
        for (&i, &dim) in index.iter().zip(self.shape.iter()) {
            if !(i < dim) {
                return None;
            }
            offset = offset * dim + i;
        }
        self.data.get(offset as usize).copied()
    }

    pub fn into_vec(self) -> Vec<S> {
        self.data
    }
}

fn write_axis<S: Display>(
    f: &mut std::fmt::Formatter<'_>,
    shape: &[u64],
    data: &[S],
) -> std::fmt::Result {
    let Some((&len, rest)) = shape.split_first() else {
        return Display::fmt(&data[0], f);
    };
    let step = if len == 0 { 0 } else { data.len() / len as usize };
    f.write_char('[')?;
    for i in 0..len as usize {
        if i != 0 {
            f.write_str(", ")?;
        }
        write_axis(f, rest, &data[i * step..(i + 1) * step])?;
    }
    f.write_char(']')
}

/// Writes nested brackets, e.g. `[[5, 0, 0], [0, 0, 7]]`.
impl<S: ScalarLike> Display for DenseTensor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_axis(f, &self.shape, &self.data)
    }
}
