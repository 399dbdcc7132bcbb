use crate::serde::{KeyLen, TypeTag, TypeTagInt, ValueLen, FIELD_HEADER_LEN};
use crate::{BinMapError, FormatError};
use derive_more::Deref;
use std::io::Write;
use tracing::trace;

#[derive(Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct WriteLen(pub(crate) usize);

#[derive(PartialEq, Eq, Debug)]
pub enum ReadResult<T> {
    EOF,
    Some(usize, T),
}

/// One TLV unit, borrowing its payloads.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct FieldRef<'a> {
    pub tag: TypeTag,
    pub key: &'a [u8],
    pub value: &'a [u8],
    /// Absolute offset of `value` within the buffer it was read from.
    pub value_offset: usize,
}

impl<'a> FieldRef<'a> {
    pub fn new(tag: TypeTag, key: &'a [u8], value: &'a [u8]) -> Self {
        Self {
            tag,
            key,
            value,
            value_offset: 0,
        }
    }

    pub fn framed_len(&self) -> usize {
        FIELD_HEADER_LEN + self.key.len() + self.value.len()
    }

    pub fn ser(&self, w: &mut impl Write) -> Result<WriteLen, BinMapError> {
        let value_len = ValueLen::from_len(self.value.len())?;
        let mut w_len = ser_field_header(w, self.tag, self.key, value_len)?;
        w.write_all(self.value)?;
        w_len.0 += self.value.len();
        Ok(w_len)
    }
}

/// Writes everything up to and including `value_len`. The caller writes the value.
pub(crate) fn ser_field_header(
    w: &mut impl Write,
    tag: TypeTag,
    key: &[u8],
    value_len: ValueLen,
) -> Result<WriteLen, BinMapError> {
    let key_len = KeyLen::from_len(key.len())?;

    /* field_type */
    w.write_all(&TypeTagInt::from(tag).to_le_bytes())?;

    /* key_len and key */
    w.write_all(&key_len.to_le_bytes())?;
    w.write_all(key)?;

    /* value_len */
    w.write_all(&value_len.to_le_bytes())?;

    Ok(WriteLen(FIELD_HEADER_LEN + key.len()))
}

/// Reads the fields of one Document, which spans the whole of `buf`.
///
/// Every header and payload is bounds-checked; a field running past the end of
/// `buf` is a [`FormatError::UnexpectedEof`]. Iteration stops after the first error.
pub struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::at(buf, 0)
    }

    /// `base` is the absolute offset of `buf[0]`, reported in errors.
    pub fn at(buf: &'a [u8], base: usize) -> Self {
        Self { buf, pos: 0, base }
    }

    pub fn offset(&self) -> usize {
        self.base + self.pos
    }
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_field(&mut self) -> Result<ReadResult<FieldRef<'a>>, FormatError> {
        if self.remaining() == 0 {
            return Ok(ReadResult::EOF);
        }
        let start = self.pos;

        /* field_type */
        let tag = TypeTag::try_from(TypeTagInt::from(self.read_u8()?))?;

        /* key_len and key */
        let key_len = KeyLen::deser(self)?;
        let key = self.take(*key_len as usize)?;

        /* value_len and value */
        let value_len = ValueLen::deser(self)?;
        let value_offset = self.offset();
        let value = self.take(*value_len as usize)?;

        trace!(?tag, key_len = *key_len, value_len = *value_len, value_offset, "read field");

        let field = FieldRef {
            tag,
            key,
            value,
            value_offset,
        };
        Ok(ReadResult::Some(self.pos - start, field))
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, FormatError> {
        let buf = self.take(1)?;
        Ok(buf[0])
    }
    pub(crate) fn read_u32_le(&mut self) -> Result<u32, FormatError> {
        let buf = self.take(4)?;
        Ok(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(FormatError::UnexpectedEof {
                offset: self.offset(),
                needed: len,
                remaining,
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}

impl<'a> Iterator for FieldReader<'a> {
    type Item = Result<FieldRef<'a>, FormatError>;
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_field() {
            Ok(ReadResult::EOF) => None,
            Ok(ReadResult::Some(_r_len, field)) => Some(Ok(field)),
            Err(e) => {
                self.pos = self.buf.len();
                Some(Err(e))
            }
        }
    }
}
