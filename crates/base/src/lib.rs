#![allow(clippy::needless_range_loop)]
#![allow(clippy::nonminimal_bool)]

pub mod convert;
pub mod error;
pub mod options;
pub mod scalar;
pub mod shape;
pub mod tensor;
