//! # Serialization format
//!
//! A serialized buffer is a root type followed by one `Document`.
//!
//! The root type is a [`TypeTag`] encoded in `u8`, and must be `Mapping` or `Sequence`.
//! The root carries no length; its `Document` runs to the end of the buffer.
//!
//! A `Document` is a run of `Field`s, one per non-`Absent` entry, in the container's order.
//! It has no members count and no terminator; it ends where its enclosing bytes end.
//!
//! Every `Field` has the same header, regardless of its type.
//! All lengths are `u32` little-endian.
//!
//! Keys are text in the configured encoding.
//! A `Sequence` keys its fields by their element index in base-10 text (`"0"`, `"1"`, ...).
//!
//! ```text
//! struct Root {
//!     root_type:      u8,
//!     document:       Document,
//! }
//!
//! struct Document {
//!     field_0:        Field,
//!     field_1:        Field,
//!     ...
//! }
//!
//! struct Field {
//!     field_type:     u8,
//!     key_len:        u32,
//!     key:            [u8; key_len],
//!     value_len:      u32,
//!     value:          [u8; value_len],
//! }
//! ```
//!
//! The `value` of each `field_type`:
//!
//! ```text
//! Null        []
//! Text        [u8; value_len]         // text in the configured encoding
//! Number      [u8; 8]                 // u64 little-endian
//! Boolean     [u8; 1]                 // 0 or 1
//! Binary      [u8; value_len]
//! Mapping     Document
//! Sequence    Document
//! ```

mod deser;
mod field;
mod lengths;
mod ser;
mod type_tag;

pub(crate) use deser::*;
pub use field::*;
pub use lengths::*;
pub use ser::*;
pub use type_tag::*;
