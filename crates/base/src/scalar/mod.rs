use half::f16;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::str::FromStr;
use thiserror::Error;

/// Element type of a tensor.
///
/// `zero()` is the fill value used when the caller gives no default.
pub trait ScalarLike:
    Copy
    + Send
    + Sync
    + Debug
    + Display
    + PartialEq
    + FromStr
    + num_traits::Zero
    + Serialize
    + for<'a> Deserialize<'a>
    + 'static
{
    const SCALAR_KIND: ScalarKind;

    /// Adds two values, `None` if the sum is not representable.
    ///
    /// Floating point sums never fail; they saturate to infinity.
    fn checked_sum(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_scalar_like {
    (float: $($t:ty => $kind:ident),* ; int: $($u:ty => $ukind:ident),* $(,)?) => {
        $(
            impl ScalarLike for $t {
                const SCALAR_KIND: ScalarKind = ScalarKind::$kind;

                #[inline(always)]
                fn checked_sum(self, rhs: Self) -> Option<Self> {
                    Some(self + rhs)
                }
            }
        )*
        $(
            impl ScalarLike for $u {
                const SCALAR_KIND: ScalarKind = ScalarKind::$ukind;

                #[inline(always)]
                fn checked_sum(self, rhs: Self) -> Option<Self> {
                    self.checked_add(rhs)
                }
            }
        )*
    };
}

impl_scalar_like! {
    float: f16 => F16, f32 => F32, f64 => F64;
    int: i32 => I32, i64 => I64,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    F16,
    F32,
    F64,
    I32,
    I64,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::I32 => "i32",
            Self::I64 => "i64",
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown scalar type \"{name}\".")]
pub struct UnknownScalarKind {
    pub name: String,
}

impl FromStr for ScalarKind {
    type Err = UnknownScalarKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "f16" | "float16" | "half" => Ok(Self::F16),
            "f32" | "float32" | "float" => Ok(Self::F32),
            "f64" | "float64" | "double" => Ok(Self::F64),
            "i32" | "int32" => Ok(Self::I32),
            "i64" | "int64" => Ok(Self::I64),
            name => Err(UnknownScalarKind {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_kind_names_round_trip() {
        for kind in [
            ScalarKind::F16,
            ScalarKind::F32,
            ScalarKind::F64,
            ScalarKind::I32,
            ScalarKind::I64,
        ] {
            assert_eq!(kind.name().parse::<ScalarKind>(), Ok(kind));
        }
        assert_eq!("double".parse::<ScalarKind>(), Ok(ScalarKind::F64));
        assert_eq!(
            "u8".parse::<ScalarKind>(),
            Err(UnknownScalarKind {
                name: "u8".to_string()
            })
        );
    }

    #[test]
    fn scalar_kind_of_types() {
        assert_eq!(<f16 as ScalarLike>::SCALAR_KIND, ScalarKind::F16);
        assert_eq!(<i64 as ScalarLike>::SCALAR_KIND, ScalarKind::I64);
    }

    #[test]
    fn checked_sum_overflow() {
        assert_eq!(i32::MAX.checked_sum(1), None);
        assert_eq!(i64::MIN.checked_sum(-1), None);
        assert_eq!(40i32.checked_sum(2), Some(42));
        assert_eq!(f32::MAX.checked_sum(f32::MAX), Some(f32::INFINITY));
        assert_eq!(
            f16::from_f32(1.5).checked_sum(f16::from_f32(2.0)),
            Some(f16::from_f32(3.5))
        );
    }
}
