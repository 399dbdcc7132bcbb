use crate::{FormatError, Value};
use derive_more::{Deref, From};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

#[derive(From, Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct TypeTagInt(u8);
impl From<TypeTag> for TypeTagInt {
    fn from(tag: TypeTag) -> Self {
        Self(tag as u8)
    }
}

/// The one-byte discriminant of a field.
///
/// These integers are the wire format; they must never be renumbered.
/// `Absent` has no tag because it never reaches the wire.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum TypeTag {
    Null = 0,
    Text = 1,
    Number = 2,
    Boolean = 3,
    Binary = 4,
    Mapping = 5,
    Sequence = 6,
}
impl TryFrom<TypeTagInt> for TypeTag {
    type Error = FormatError;
    fn try_from(int: TypeTagInt) -> Result<Self, FormatError> {
        TypeTag::from_u8(int.0).ok_or(FormatError::UnknownTypeTag(int.0))
    }
}
impl TypeTag {
    /// `None` iff the value is [`Value::Absent`].
    pub fn of(val: &Value) -> Option<Self> {
        let tag = match val {
            Value::Absent => return None,
            Value::Null => TypeTag::Null,
            Value::Text(_) => TypeTag::Text,
            Value::Number(_) => TypeTag::Number,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Binary(_) => TypeTag::Binary,
            Value::Mapping(_) => TypeTag::Mapping,
            Value::Sequence(_) => TypeTag::Sequence,
        };
        Some(tag)
    }

    pub fn is_container(self) -> bool {
        matches!(self, TypeTag::Mapping | TypeTag::Sequence)
    }
}
