use crate::serde::{FieldReader, TypeTagInt};
use crate::{FieldPart, FormatError, ValueShapeError};
use derive_more::Deref;
use std::mem;

/// `field_type`, `key_len` and `value_len`; everything in a field but its payloads.
pub const FIELD_HEADER_LEN: usize =
    mem::size_of::<TypeTagInt>() + mem::size_of::<KeyLen>() + mem::size_of::<ValueLen>();

#[derive(Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyLen(u32);
impl KeyLen {
    pub fn from_len(len: usize) -> Result<Self, ValueShapeError> {
        prefixable(FieldPart::Key, len).map(Self)
    }
    pub(crate) fn deser(r: &mut FieldReader<'_>) -> Result<Self, FormatError> {
        r.read_u32_le().map(Self)
    }
}

#[derive(Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ValueLen(u32);
impl ValueLen {
    pub fn from_len(len: usize) -> Result<Self, ValueShapeError> {
        prefixable(FieldPart::Value, len).map(Self)
    }
    pub(crate) fn deser(r: &mut FieldReader<'_>) -> Result<Self, FormatError> {
        r.read_u32_le().map(Self)
    }
}

fn prefixable(part: FieldPart, len: usize) -> Result<u32, ValueShapeError> {
    u32::try_from(len).map_err(|_| ValueShapeError::TooLong {
        part,
        len,
        max: u32::MAX,
    })
}
