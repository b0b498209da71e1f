use arrayvec::ArrayVec;
use base::error::SparseError;
use base::scalar::ScalarLike;
use base::tensor::SparseTensor;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseTensorError {
    #[error("The input string is empty.")]
    EmptyString {},
    #[error("Bad character at position {position}")]
    BadCharacter { position: usize },
    #[error("Too long number at position {position}")]
    TooLongNumber { position: usize },
    #[error("Too short number at position {position}")]
    TooShortNumber { position: usize },
    #[error("Bad parsing at position {position}")]
    BadParsing { position: usize },
    #[error("Invalid sparse tensor: {0}")]
    Invalid(#[from] SparseError),
}

/// States ending in `Gap` follow a space that closed a number; only a
/// delimiter or more spaces may come next.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ParseState {
    Start,
    LeftBrace,
    /// Bare index of a rank-1 entry, as in `{3: 1.5}`.
    Index,
    IndexGap,
    Coordinate,
    CoordinateGap,
    CoordinateEnd,
    Value,
    ValueGap,
    Comma,
    Splitter,
    Slash,
    /// Bare length of a rank-1 shape, as in `/8`.
    Length,
    LengthGap,
    Shape,
    ShapeGap,
    ShapeEnd,
}

type Token = ArrayVec<u8, 48>;

fn push(token: &mut Token, c: u8, position: usize) -> Result<(), ParseTensorError> {
    token
        .try_push(c)
        .map_err(|_| ParseTensorError::TooLongNumber { position })
}

fn take<T>(
    token: &mut Token,
    position: usize,
    f: impl Fn(&str) -> Option<T>,
) -> Result<T, ParseTensorError> {
    if token.is_empty() {
        return Err(ParseTensorError::TooShortNumber { position });
    }
    let parsed = std::str::from_utf8(token.as_slice())
        .ok()
        .and_then(|s| f(s));
    token.clear();
    parsed.ok_or(ParseTensorError::BadParsing { position })
}

fn parse_u64(s: &str) -> Option<u64> {
    s.parse().ok()
}

/// Parses `{[i0, i1]: v, ...}/[d0, d1]` into indices, values and dense shape.
///
/// Rank-1 tensors may also be written `{i: v, ...}/d`. Values are parsed by `f`.
/// Only the syntax is checked here; repeated, out-of-bound or ill-ranked
/// indices are kept and left to [`SparseTensor::new_checked`].
pub fn parse_sparse_tensor<T, F>(
    input: &[u8],
    f: F,
) -> Result<(Vec<Vec<u64>>, Vec<T>, Vec<u64>), ParseTensorError>
where
    F: Fn(&str) -> Option<T>,
{
    use ParseState::*;
    if input.is_empty() {
        return Err(ParseTensorError::EmptyString {});
    }
    let mut token = Token::new();
    let mut indices = Vec::<Vec<u64>>::new();
    let mut values = Vec::<T>::new();
    let mut coordinate = Vec::<u64>::new();
    let mut dims = Vec::<u64>::new();
    let mut state = Start;
    for (position, &c) in input.iter().enumerate() {
        match (state, c) {
            (Start, b'{') => state = LeftBrace,
            (LeftBrace | Comma, b'[') => state = Coordinate,
            (LeftBrace | Comma, b'0'..=b'9') => {
                push(&mut token, c, position)?;
                state = Index;
            }
            (LeftBrace | Comma, b'}') => state = Splitter,
            (Index | Coordinate | Length | Shape, b'0'..=b'9') => push(&mut token, c, position)?,
            (Index | IndexGap, b':') => {
                indices.push(vec![take(&mut token, position, parse_u64)?]);
                state = Value;
            }
            (Coordinate | CoordinateGap, b',') => {
                coordinate.push(take(&mut token, position, parse_u64)?);
                state = Coordinate;
            }
            (Coordinate | CoordinateGap, b']') => {
                coordinate.push(take(&mut token, position, parse_u64)?);
                indices.push(std::mem::take(&mut coordinate));
                state = CoordinateEnd;
            }
            (CoordinateEnd, b':') => state = Value,
            (Value, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'+' | b'-') => {
                push(&mut token, c, position)?
            }
            (Value | ValueGap, b',') => {
                values.push(take(&mut token, position, &f)?);
                state = Comma;
            }
            (Value | ValueGap, b'}') => {
                values.push(take(&mut token, position, &f)?);
                state = Splitter;
            }
            (Splitter, b'/') => state = Slash,
            (Slash, b'[') => state = Shape,
            (Slash, b'0'..=b'9') => {
                push(&mut token, c, position)?;
                state = Length;
            }
            (Shape | ShapeGap, b',') => {
                dims.push(take(&mut token, position, parse_u64)?);
                state = Shape;
            }
            (Shape | ShapeGap, b']') => {
                dims.push(take(&mut token, position, parse_u64)?);
                state = ShapeEnd;
            }
            (Index, b' ') => state = IndexGap,
            (Length, b' ') => state = LengthGap,
            (Coordinate, b' ') if !token.is_empty() => state = CoordinateGap,
            (Value, b' ') if !token.is_empty() => state = ValueGap,
            (Shape, b' ') if !token.is_empty() => state = ShapeGap,
            (
                Start | LeftBrace | IndexGap | Coordinate | CoordinateGap | CoordinateEnd | Value
                | ValueGap | Comma | Splitter | Slash | LengthGap | Shape | ShapeGap | ShapeEnd,
                b' ',
            ) => {}
            _ => return Err(ParseTensorError::BadCharacter { position }),
        }
    }
    match state {
        Length | LengthGap => dims.push(take(&mut token, input.len(), parse_u64)?),
        ShapeEnd => {}
        _ => {
            return Err(ParseTensorError::BadParsing {
                position: input.len(),
            })
        }
    }
    Ok((indices, values, dims))
}

/// Parses a sparse tensor literal with values of type `S`.
pub fn parse_sparse_tensor_literal<S: ScalarLike>(
    input: &str,
) -> Result<SparseTensor<S>, ParseTensorError> {
    let (indices, values, dims) = parse_sparse_tensor(input.as_bytes(), |s| s.parse::<S>().ok())?;
    Ok(SparseTensor::new_checked(indices, values, dims)?)
}
