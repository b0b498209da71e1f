use base::scalar::ScalarLike;
use base::tensor::Tensor;
use densify::{parse_sparse_tensor_literal, ParseTensorError};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

use crate::args::Source;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read the file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bad JSON tensor: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Bad tensor literal: {0}")]
    Literal(#[from] ParseTensorError),
    #[error("Unsupported file {path}, expected `.json` or `.txt`.")]
    Unsupported { path: String },
}

/// Reads a tagged JSON tensor, e.g. `{"kind": "sparse", "indices": ...}`.
fn read_json<S: ScalarLike>(path: &Path) -> Result<Tensor<S>, ReadError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn read_literal<S: ScalarLike>(path: &Path) -> Result<Tensor<S>, ReadError> {
    let text = fs::read_to_string(path)?;
    Ok(Tensor::Sparse(parse_sparse_tensor_literal(text.trim())?))
}

pub fn read_tensor<S: ScalarLike>(source: &Source) -> Result<Tensor<S>, ReadError> {
    match source {
        Source::Literal(literal) => Ok(Tensor::Sparse(parse_sparse_tensor_literal(literal)?)),
        Source::File(path) => match path.extension().and_then(OsStr::to_str) {
            Some("json") => read_json(path),
            Some("txt") => read_literal(path),
            _ => Err(ReadError::Unsupported {
                path: path.display().to_string(),
            }),
        },
    }
}
