//! A self-describing binary map format.
//!
//! A [`Value`] tree whose root is a [`Value::Mapping`] or a [`Value::Sequence`]
//! serializes into one flat byte buffer and back, without any external schema.
//! See [`serde`] for the wire layout.
//!
//! ```
//! use binmap::{Mapping, Value};
//!
//! let mut root = Mapping::new();
//! root.insert("a".into(), Value::from(1u64));
//! root.insert("b".into(), Value::from("Hello World"));
//! let root = Value::from(root);
//!
//! let buf = binmap::serialize(&root).unwrap();
//! assert_eq!(binmap::deserialize(&buf).unwrap(), root);
//! ```

mod codec;
mod error;
mod options;
pub mod serde;
mod text;
mod value;

pub use codec::*;
pub use error::*;
pub use options::*;
pub use text::*;
pub use value::*;

/// Serializes `value` with the default [`Options`].
pub fn serialize(value: &Value) -> Result<Vec<u8>, BinMapError> {
    BinMap::default().serialize(value)
}

pub fn serialize_with_options(value: &Value, opts: &Options) -> Result<Vec<u8>, BinMapError> {
    BinMap::new(*opts).serialize(value)
}

/// Deserializes a buffer produced by [`serialize`] with the default [`Options`].
pub fn deserialize(buf: impl AsRef<[u8]>) -> Result<Value, BinMapError> {
    BinMap::default().deserialize(buf)
}

pub fn deserialize_with_options(
    buf: impl AsRef<[u8]>,
    opts: &Options,
) -> Result<Value, BinMapError> {
    BinMap::new(*opts).deserialize(buf)
}
