use base::error::ConvertError;
use base::scalar::{ScalarKind, ScalarLike};
use base::tensor::Tensor;
use densify::sparse_tensor_to_dense_with_options;
use half::f16;
use log::{debug, error, info};
use thiserror::Error;

use crate::args::{
    ArgumentParseError, Arguments, ConvertArguments, InspectArguments, SubCommandEnum,
};
use crate::read::{read_tensor, ReadError};

mod args;
mod read;

#[derive(Debug, Error)]
enum CommandError {
    #[error("{0}")]
    Arguments(#[from] ArgumentParseError),
    #[error("{0}")]
    Read(#[from] ReadError),
    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),
    #[error("Failed to write JSON: {0}")]
    Write(#[from] serde_json::Error),
}

macro_rules! dispatch {
    ($kind:expr, $f:ident, $args:expr) => {
        match $kind {
            ScalarKind::F16 => $f::<f16>($args),
            ScalarKind::F32 => $f::<f32>($args),
            ScalarKind::F64 => $f::<f64>($args),
            ScalarKind::I32 => $f::<i32>($args),
            ScalarKind::I64 => $f::<i64>($args),
        }
    };
}

fn convert<S: ScalarLike>(args: &ConvertArguments) -> Result<(), CommandError> {
    let source = args.get_source()?;
    let shape = args.get_shape()?;
    let default_value = args.get_default_value::<S>()?;
    let options = args.get_options()?;
    let tensor = read_tensor::<S>(&source)?;
    let dense = sparse_tensor_to_dense_with_options(&tensor, &shape, default_value, &options)?;
    if args.json {
        println!("{}", serde_json::to_string(&dense)?);
    } else {
        println!("{dense}");
    }
    info!(
        "{} elements written with shape {:?}",
        dense.num_elements(),
        dense.shape()
    );
    Ok(())
}

fn inspect<S: ScalarLike>(args: &InspectArguments) -> Result<(), CommandError> {
    let source = args.get_source()?;
    match read_tensor::<S>(&source)? {
        Tensor::Sparse(x) => {
            println!("kind: sparse");
            println!("dtype: {}", S::SCALAR_KIND);
            println!("rank: {}", x.rank());
            println!("nnz: {}", x.nnz());
            println!("dense_shape: {:?}", x.dense_shape());
        }
        Tensor::Dense(x) => {
            println!("kind: dense");
            println!("dtype: {}", S::SCALAR_KIND);
            println!("rank: {}", x.rank());
            println!("shape: {:?}", x.shape());
        }
    }
    Ok(())
}

fn main() {
    let args: Arguments = argh::from_env();
    let mut log_builder = env_logger::builder();
    if args.verbose {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else {
        log_builder.filter_level(log::LevelFilter::Info);
    }
    log_builder.init();
    debug!("arguments: {args:#?}");

    let result = match &args.cmd {
        SubCommandEnum::Convert(convert_args) => convert_args
            .get_scalar_kind()
            .map_err(CommandError::from)
            .and_then(|kind| dispatch!(kind, convert, convert_args)),
        SubCommandEnum::Inspect(inspect_args) => inspect_args
            .get_scalar_kind()
            .map_err(CommandError::from)
            .and_then(|kind| dispatch!(kind, inspect, inspect_args)),
    };
    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }
}
