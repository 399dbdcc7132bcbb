use crate::InputKindError;
use indexmap::IndexMap;

mod json;

/// Entries keep their insertion order, which is also their order on the wire.
///
/// Note that `IndexMap`'s equality ignores order.
pub type Mapping = IndexMap<String, Value>;

/// Every kind of value the format can carry.
///
/// `Absent` is the omitted marker: a mapping entry or sequence element holding it
/// produces no field at all. In a decoded sequence it fills the indices
/// that had no field.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Value {
    Absent,
    Null,
    Text(String),
    Number(u64),
    Boolean(bool),
    Binary(Vec<u8>),
    Mapping(Mapping),
    Sequence(Vec<Value>),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Absent => "Absent",
            Self::Null => "Null",
            Self::Text(_) => "Text",
            Self::Number(_) => "Number",
            Self::Boolean(_) => "Boolean",
            Self::Binary(_) => "Binary",
            Self::Mapping(_) => "Mapping",
            Self::Sequence(_) => "Sequence",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}
impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}
impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(u64::from(n))
    }
}
impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as u64)
    }
}
impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}
/// Copies exactly the viewed bytes, never the rest of the backing buffer.
impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Binary(b.to_vec())
    }
}
impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Self::Mapping(m)
    }
}
impl From<Vec<Value>> for Value {
    fn from(s: Vec<Value>) -> Self {
        Self::Sequence(s)
    }
}
impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::Sequence(iter.into_iter().collect())
    }
}
impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl TryFrom<i64> for Value {
    type Error = InputKindError;
    fn try_from(n: i64) -> Result<Self, Self::Error> {
        u64::try_from(n)
            .map(Self::Number)
            .map_err(|_| InputKindError::NegativeNumber(n.to_string()))
    }
}
impl TryFrom<f64> for Value {
    type Error = InputKindError;
    /// Accepts only whole, non-negative floats that fit in `u64`.
    fn try_from(f: f64) -> Result<Self, Self::Error> {
        if !f.is_finite() || f.fract() != 0.0 {
            return Err(InputKindError::NonIntegralNumber(f.to_string()));
        }
        if f.is_sign_negative() && f != 0.0 {
            return Err(InputKindError::NegativeNumber(f.to_string()));
        }
        /* 2^64 is the first float above u64::MAX. */
        if f >= 18_446_744_073_709_551_616.0 {
            return Err(InputKindError::NonIntegralNumber(f.to_string()));
        }
        Ok(Self::Number(f as u64))
    }
}
