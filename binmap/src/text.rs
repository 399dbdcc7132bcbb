use crate::InputKindError;
use derive_more::Display;
use std::borrow::Cow;
use std::str::FromStr;
use thiserror::Error;

/// The text codec applied to keys and to [`crate::Value::Text`] payloads.
#[derive(Display, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    #[default]
    #[display(fmt = "utf-8")]
    Utf8,
    #[display(fmt = "utf-16le")]
    Utf16Le,
    #[display(fmt = "utf-16be")]
    Utf16Be,
    #[display(fmt = "iso-8859-1")]
    Latin1,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown text encoding label {0:?}")]
pub struct UnknownEncoding(pub String);

impl FromStr for TextEncoding {
    type Err = UnknownEncoding;

    /// Labels are matched case-insensitively, ignoring surrounding whitespace.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let enc = match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "unicode-1-1-utf-8" => Self::Utf8,
            "utf-16" | "utf-16le" => Self::Utf16Le,
            "utf-16be" => Self::Utf16Be,
            "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "l1" => Self::Latin1,
            _ => return Err(UnknownEncoding(label.to_owned())),
        };
        Ok(enc)
    }
}

impl TextEncoding {
    pub fn encode<'s>(self, s: &'s str) -> Result<Cow<'s, [u8]>, InputKindError> {
        let buf = match self {
            Self::Utf8 => return Ok(Cow::Borrowed(s.as_bytes())),
            Self::Utf16Le => s.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Self::Utf16Be => s.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Self::Latin1 => s
                .chars()
                .map(|ch| self.latin1_byte(ch))
                .collect::<Result<Vec<u8>, _>>()?,
        };
        Ok(Cow::Owned(buf))
    }

    /// The length of [`Self::encode`]'s output, without allocating it.
    pub fn encoded_len(self, s: &str) -> Result<usize, InputKindError> {
        match self {
            Self::Utf8 => Ok(s.len()),
            Self::Utf16Le | Self::Utf16Be => Ok(s.encode_utf16().count() * 2),
            Self::Latin1 => {
                for ch in s.chars() {
                    self.latin1_byte(ch)?;
                }
                Ok(s.chars().count())
            }
        }
    }

    /// Returns `None` if `buf` is not valid text in this encoding.
    pub fn decode(self, buf: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => String::from_utf8(buf.to_vec()).ok(),
            Self::Utf16Le => Self::decode_utf16(buf, u16::from_le_bytes),
            Self::Utf16Be => Self::decode_utf16(buf, u16::from_be_bytes),
            Self::Latin1 => Some(buf.iter().copied().map(char::from).collect()),
        }
    }

    fn decode_utf16(buf: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
        if buf.len() % 2 != 0 {
            return None;
        }
        let units = buf.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
        char::decode_utf16(units).collect::<Result<String, _>>().ok()
    }

    fn latin1_byte(self, ch: char) -> Result<u8, InputKindError> {
        u8::try_from(ch).map_err(|_| InputKindError::Unencodable { ch, encoding: self })
    }
}
