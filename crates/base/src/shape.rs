use crate::error::ShapeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;

/// One dimension of a requested shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    Fixed(u64),
    /// Takes the size declared by the sparse tensor.
    Unknown,
}

impl From<u64> for Dim {
    fn from(value: u64) -> Self {
        Self::Fixed(value)
    }
}

impl From<Option<u64>> for Dim {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Unknown, Self::Fixed)
    }
}

impl From<Dim> for Option<u64> {
    fn from(value: Dim) -> Self {
        match value {
            Dim::Fixed(x) => Some(x),
            Dim::Unknown => None,
        }
    }
}

impl Display for Dim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dim::Fixed(x) => Display::fmt(x, f),
            Dim::Unknown => f.write_str("?"),
        }
    }
}

impl FromStr for Dim {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "?" | "-1" | "None" | "none" | "null" => Ok(Dim::Unknown),
            token => token
                .parse::<u64>()
                .map(Dim::Fixed)
                .map_err(|_| ShapeError::BadDimension {
                    token: token.to_string(),
                }),
        }
    }
}

impl Serialize for Dim {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Option::<u64>::from(*self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Dim {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<u64>::deserialize(deserializer).map(Dim::from)
    }
}

/// Shape requested for a dense result. Dimensions may be left unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TensorShape(Vec<Dim>);

impl TensorShape {
    pub fn new(dims: Vec<Dim>) -> Self {
        Self(dims)
    }

    pub fn fixed(dims: &[u64]) -> Self {
        Self(dims.iter().copied().map(Dim::Fixed).collect())
    }

    pub fn dims(&self) -> &[Dim] {
        &self.0
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn is_fully_defined(&self) -> bool {
        self.0.iter().all(|d| matches!(d, Dim::Fixed(_)))
    }

    /// Combines the requested shape with the shape declared by a sparse tensor.
    ///
    /// Unknown dimensions take the declared size. Fixed dimensions may widen
    /// the declared size but never shrink it.
    pub fn resolve(&self, declared: &[u64]) -> Result<Vec<u64>, ShapeError> {
        if self.rank() != declared.len() {
            return Err(ShapeError::RankMismatch {
                expected: declared.len(),
                actual: self.rank(),
            });
        }
        self.0
            .iter()
            .zip(declared)
            .enumerate()
            .map(|(axis, (&dim, &declared))| match dim {
                Dim::Unknown => Ok(declared),
                Dim::Fixed(requested) if requested >= declared => Ok(requested),
                Dim::Fixed(requested) => Err(ShapeError::Narrowed {
                    axis,
                    declared,
                    requested,
                }),
            })
            .collect()
    }
}

impl From<Vec<Dim>> for TensorShape {
    fn from(value: Vec<Dim>) -> Self {
        Self(value)
    }
}

impl From<&[u64]> for TensorShape {
    fn from(value: &[u64]) -> Self {
        Self::fixed(value)
    }
}

impl<const N: usize> From<[u64; N]> for TensorShape {
    fn from(value: [u64; N]) -> Self {
        Self::fixed(&value)
    }
}

impl FromIterator<Dim> for TensorShape {
    fn from_iter<T: IntoIterator<Item = Dim>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for TensorShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, dim) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            Display::fmt(dim, f)?;
        }
        f.write_str("]")
    }
}

/// Accepts `4,3`, `[4, 3]` and `[4, ?]`.
impl FromStr for TensorShape {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let inner = match s.strip_prefix('[') {
            Some(rest) => rest
                .strip_suffix(']')
                .ok_or_else(|| ShapeError::BadDimension {
                    token: s.to_string(),
                })?,
            None => s,
        };
        if inner.trim().is_empty() {
            return Ok(Self::default());
        }
        inner.split(',').map(Dim::from_str).collect()
    }
}

/// Checked product of `dims`.
pub fn num_elements(dims: &[u64]) -> Option<u64> {
    dims.iter().try_fold(1u64, |acc, &d| acc.checked_mul(d))
}

/// Row-major strides. Callers ensure the element count does not overflow.
pub fn strides(dims: &[u64]) -> Vec<u64> {
    let mut strides = vec![1u64; dims.len()];
    for axis in (0..dims.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * dims[axis + 1];
    }
    strides
}

/// Flat row-major offset of `index`, or `None` if it is outside `dims`.
pub fn offset(dims: &[u64], strides: &[u64], index: &[u64]) -> Option<u64> {
    if index.len() != dims.len() {
        return None;
    }
    let mut offset = 0u64;
    for axis in 0..dims.len() {
        if index[axis] >= dims[axis] {
            return None;
        }
        offset += index[axis] * strides[axis];
    }
    Some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_shape_parse_accept() {
        let exprs: HashMap<&str, TensorShape> = HashMap::from([
            ("4,3", TensorShape::from([4, 3])),
            ("[4, 3]", TensorShape::from([4, 3])),
            (" [ 7 ] ", TensorShape::from([7])),
            (
                "[4, ?]",
                TensorShape::new(vec![Dim::Fixed(4), Dim::Unknown]),
            ),
            (
                "None,-1,0",
                TensorShape::new(vec![Dim::Unknown, Dim::Unknown, Dim::Fixed(0)]),
            ),
            ("[]", TensorShape::default()),
        ]);
        for (e, ans) in exprs {
            let ret = e.parse::<TensorShape>();
            assert_eq!(ret, Ok(ans), "at expr {:?}", e);
        }
    }

    #[test]
    fn test_shape_parse_reject() {
        let exprs: HashMap<&str, ShapeError> = HashMap::from([
            (
                "[4, 3",
                ShapeError::BadDimension {
                    token: "[4, 3".to_string(),
                },
            ),
            (
                "4,x",
                ShapeError::BadDimension {
                    token: "x".to_string(),
                },
            ),
            (
                "4,,3",
                ShapeError::BadDimension {
                    token: "".to_string(),
                },
            ),
            (
                "-2",
                ShapeError::BadDimension {
                    token: "-2".to_string(),
                },
            ),
        ]);
        for (e, err) in exprs {
            let ret = e.parse::<TensorShape>();
            assert_eq!(ret, Err(err), "at expr {:?}", e);
        }
    }

    #[test]
    fn resolve_fills_unknown_and_widens() {
        let shape = TensorShape::new(vec![Dim::Fixed(4), Dim::Unknown]);
        assert_eq!(shape.resolve(&[2, 3]), Ok(vec![4, 3]));
        assert_eq!(TensorShape::from([2, 3]).resolve(&[2, 3]), Ok(vec![2, 3]));
    }

    #[test]
    fn resolve_rejects_narrowing_and_rank_mismatch() {
        assert_eq!(
            TensorShape::from([1, 3]).resolve(&[2, 3]),
            Err(ShapeError::Narrowed {
                axis: 0,
                declared: 2,
                requested: 1
            })
        );
        assert_eq!(
            TensorShape::from([2, 3, 1]).resolve(&[2, 3]),
            Err(ShapeError::RankMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn strides_and_offsets() {
        let dims = [2, 3, 4];
        let strides = strides(&dims);
        assert_eq!(strides, vec![12, 4, 1]);
        assert_eq!(offset(&dims, &strides, &[1, 2, 3]), Some(23));
        assert_eq!(offset(&dims, &strides, &[0, 3, 0]), None);
        assert_eq!(offset(&dims, &strides, &[0, 0]), None);
        assert_eq!(num_elements(&dims), Some(24));
        assert_eq!(num_elements(&[u64::MAX, 2]), None);
        assert_eq!(num_elements(&[5, 0]), Some(0));
    }

    #[test]
    fn display_and_serde() {
        let shape = TensorShape::new(vec![Dim::Fixed(4), Dim::Unknown]);
        assert_eq!(shape.to_string(), "[4, ?]");
        assert_eq!(serde_json::to_string(&shape).unwrap(), "[4,null]");
        let back: TensorShape = serde_json::from_str("[4,null]").unwrap();
        assert_eq!(back, shape);
    }
}
