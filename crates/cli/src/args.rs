use argh::FromArgs;
use log::warn;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use validator::Validate;

use base::options::ConvertOptions;
use base::scalar::{ScalarKind, ScalarLike};
use base::shape::TensorShape;

#[derive(Debug, Eq, PartialEq, Error)]
#[error("Invalid arguments.")]
pub struct ArgumentParseError;

/// Where a sparse tensor is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    File(PathBuf),
    Literal(String),
}

fn source_from(file: &Option<String>, literal: &Option<String>) -> Result<Source, ArgumentParseError> {
    match (file, literal) {
        (Some(file), None) => Ok(Source::File(PathBuf::from(file))),
        (None, Some(literal)) => Ok(Source::Literal(literal.clone())),
        _ => {
            warn!("exactly one of `--file` and `--literal` is required");
            Err(ArgumentParseError)
        }
    }
}

fn scalar_kind_from_str(s: &str) -> Result<ScalarKind, ArgumentParseError> {
    s.parse().map_err(|err| {
        warn!("{err}");
        ArgumentParseError
    })
}

#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand)]
pub enum SubCommandEnum {
    Convert(ConvertArguments),
    Inspect(InspectArguments),
}

#[derive(FromArgs, Debug, PartialEq)]
/// convert a sparse tensor into a dense one
#[argh(subcommand, name = "convert")]
pub struct ConvertArguments {
    /// sparse tensor file path, `.json` or `.txt` holding a literal
    #[argh(option)]
    file: Option<String>,

    /// sparse tensor literal, e.g. `{[0, 0]: 5, [1, 2]: 7}/[2, 3]`
    #[argh(option)]
    literal: Option<String>,

    /// target shape, e.g. `4,3` or `[4, ?]`
    #[argh(option)]
    shape: String,

    /// fill value of the positions not listed, zero if absent
    #[argh(option)]
    default_value: Option<String>,

    /// scalar type: [`f16`, `f32`, `f64`, `i32`, `i64`]
    #[argh(option, default = "String::from(\"f32\")")]
    dtype: String,

    /// conversion options in a TOML file
    #[argh(option)]
    config: Option<String>,

    /// print the dense tensor as JSON
    #[argh(switch)]
    pub json: bool,
}

impl ConvertArguments {
    pub fn get_source(&self) -> Result<Source, ArgumentParseError> {
        source_from(&self.file, &self.literal)
    }

    pub fn get_scalar_kind(&self) -> Result<ScalarKind, ArgumentParseError> {
        scalar_kind_from_str(&self.dtype)
    }

    pub fn get_shape(&self) -> Result<TensorShape, ArgumentParseError> {
        self.shape.parse().map_err(|err| {
            warn!("failed to parse the shape: {err}");
            ArgumentParseError
        })
    }

    pub fn get_default_value<S: ScalarLike>(&self) -> Result<Option<S>, ArgumentParseError> {
        match &self.default_value {
            Some(s) => match s.trim().parse::<S>() {
                Ok(value) => Ok(Some(value)),
                Err(_) => {
                    warn!("failed to parse the default value `{s}` as {}", S::SCALAR_KIND);
                    Err(ArgumentParseError)
                }
            },
            None => Ok(None),
        }
    }

    pub fn get_options(&self) -> Result<ConvertOptions, ArgumentParseError> {
        let options: ConvertOptions = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|err| {
                    warn!("failed to read the config file {path}: {err}");
                    ArgumentParseError
                })?;
                toml::from_str(&text).map_err(|err| {
                    warn!("failed to parse the TOML conversion options: {err}");
                    ArgumentParseError
                })?
            }
            None => ConvertOptions::default(),
        };
        if let Err(err) = options.validate() {
            warn!("invalid conversion options: {err}");
            return Err(ArgumentParseError);
        }
        Ok(options)
    }
}

#[derive(FromArgs, Debug, PartialEq)]
/// describe a sparse tensor
#[argh(subcommand, name = "inspect")]
pub struct InspectArguments {
    /// sparse tensor file path, `.json` or `.txt` holding a literal
    #[argh(option)]
    file: Option<String>,

    /// sparse tensor literal
    #[argh(option)]
    literal: Option<String>,

    /// scalar type: [`f16`, `f32`, `f64`, `i32`, `i64`]
    #[argh(option, default = "String::from(\"f32\")")]
    dtype: String,
}

impl InspectArguments {
    pub fn get_source(&self) -> Result<Source, ArgumentParseError> {
        source_from(&self.file, &self.literal)
    }

    pub fn get_scalar_kind(&self) -> Result<ScalarKind, ArgumentParseError> {
        scalar_kind_from_str(&self.dtype)
    }
}

#[derive(FromArgs, Debug)]
/// `densify` CLI
pub struct Arguments {
    #[argh(subcommand)]
    pub cmd: SubCommandEnum,

    /// verbose
    #[argh(switch, short = 'v')]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Arguments {
        Arguments::from_args(&["densify"], args).unwrap()
    }

    #[test]
    fn convert_arguments() {
        let args = parse(&[
            "-v",
            "convert",
            "--literal",
            "{[0, 0]: 5}/[2, 3]",
            "--shape",
            "4,?",
            "--default-value",
            "7",
            "--dtype",
            "i32",
        ]);
        assert!(args.verbose);
        let SubCommandEnum::Convert(convert) = args.cmd else {
            panic!("expected the convert subcommand");
        };
        assert_eq!(
            convert.get_source(),
            Ok(Source::Literal("{[0, 0]: 5}/[2, 3]".to_string()))
        );
        assert_eq!(convert.get_scalar_kind(), Ok(ScalarKind::I32));
        assert_eq!(convert.get_shape().unwrap().to_string(), "[4, ?]");
        assert_eq!(convert.get_default_value::<i32>(), Ok(Some(7)));
        assert_eq!(convert.get_options(), Ok(ConvertOptions::default()));
        assert!(!convert.json);
    }

    #[test]
    fn convert_arguments_reject() {
        let args = parse(&["convert", "--shape", "2", "--dtype", "u8"]);
        let SubCommandEnum::Convert(convert) = args.cmd else {
            panic!("expected the convert subcommand");
        };
        assert_eq!(convert.get_source(), Err(ArgumentParseError));
        assert_eq!(convert.get_scalar_kind(), Err(ArgumentParseError));
        assert_eq!(convert.get_default_value::<f32>(), Ok(None));
    }

    #[test]
    fn bad_default_value() {
        let args = parse(&[
            "convert",
            "--file",
            "x.json",
            "--shape",
            "2",
            "--default-value",
            "1.5",
        ]);
        let SubCommandEnum::Convert(convert) = args.cmd else {
            panic!("expected the convert subcommand");
        };
        assert_eq!(convert.get_source(), Ok(Source::File(PathBuf::from("x.json"))));
        assert_eq!(convert.get_default_value::<i64>(), Err(ArgumentParseError));
        assert_eq!(convert.get_default_value::<f64>(), Ok(Some(1.5)));
    }
}
