use crate::serde::TypeTag;
use crate::TextEncoding;
use derive_more::Display;
use std::io;
use thiserror::Error;

/// Every failure of a serialize or deserialize call.
///
/// No partial output survives an error.
#[derive(Debug, Error)]
pub enum BinMapError {
    #[error(transparent)]
    InputKind(#[from] InputKindError),
    #[error(transparent)]
    ValueShape(#[from] ValueShapeError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// The input to serialize is not something this format can represent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputKindError {
    #[error("root must be a Mapping or a Sequence, got {0}")]
    NonContainerRoot(&'static str),
    #[error("negative number {0} is not representable")]
    NegativeNumber(String),
    #[error("non-integral number {0} is not representable")]
    NonIntegralNumber(String),
    #[error("character {ch:?} is not representable in {encoding}")]
    Unencodable { ch: char, encoding: TextEncoding },
    #[error("nesting exceeds the maximum depth of {0}")]
    TooDeep(usize),
    #[error("sequence of {len} elements exceeds the maximum length of {max}")]
    SequenceTooLong { len: usize, max: usize },
    #[error("sequences hold more than {0} elements in total")]
    TooManySequenceElements(usize),
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPart {
    Key,
    Value,
}

/// A field payload does not fit its length prefix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueShapeError {
    #[error("{part} of {len} bytes exceeds the {max} byte limit of its length prefix")]
    TooLong {
        part: FieldPart,
        len: usize,
        max: u32,
    },
    #[error("nested document lengths were derived from a different value")]
    LayoutMismatch,
}

/// The buffer given to deserialize is not a valid instance of the format.
///
/// Offsets are absolute positions in that buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unexpected end of input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("unknown type tag {0}")]
    UnknownTypeTag(u8),
    #[error("root type must be Mapping or Sequence, got {0:?}")]
    InvalidRoot(TypeTag),
    #[error("{tag:?} payload at offset {offset} has invalid length {len}")]
    InvalidPayloadLen {
        tag: TypeTag,
        offset: usize,
        len: usize,
    },
    #[error("invalid boolean byte {byte} at offset {offset}")]
    InvalidBoolean { offset: usize, byte: u8 },
    #[error("invalid {encoding} text at offset {offset}")]
    InvalidText {
        encoding: TextEncoding,
        offset: usize,
    },
    #[error("invalid sequence index {0:?}")]
    InvalidIndex(String),
    #[error("sequence index {index} does not follow the previous index")]
    UnorderedIndex { index: usize },
    #[error("sequence index {index} exceeds the maximum length of {max}")]
    IndexOutOfBounds { index: usize, max: usize },
    #[error("sequences hold more than {0} elements in total")]
    TooManySequenceElements(usize),
    #[error("nesting exceeds the maximum depth of {0}")]
    TooDeep(usize),
}
