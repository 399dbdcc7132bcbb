use crate::serde::{Decoder, Encoder, WriteLen};
use crate::{BinMapError, Options, Value};
use std::io::Write;
use tracing::debug;

/// A codec bound to one immutable set of [`Options`].
///
/// Calls share no state, so one `BinMap` may serve any number of threads.
#[derive(Debug, Default, Clone)]
pub struct BinMap {
    opts: Options,
}

impl BinMap {
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn serialize(&self, root: &Value) -> Result<Vec<u8>, BinMapError> {
        let encoder = Encoder::new(&self.opts);
        let layout = encoder.layout(root)?;

        let mut buf = Vec::with_capacity(layout.root_len());
        encoder.ser_root(root, &layout, &mut buf)?;
        debug!(root = root.kind_name(), len = buf.len(), "serialized");
        Ok(buf)
    }

    /// Like [`Self::serialize`], writing into `w`.
    ///
    /// The whole tree is validated before the first byte is written,
    /// so only an I/O error can leave `w` partially written.
    pub fn serialize_into(&self, root: &Value, w: &mut impl Write) -> Result<WriteLen, BinMapError> {
        let encoder = Encoder::new(&self.opts);
        let layout = encoder.layout(root)?;

        let w_len = encoder.ser_root(root, &layout, w)?;
        debug!(root = root.kind_name(), len = *w_len, "serialized");
        Ok(w_len)
    }

    /// The number of bytes [`Self::serialize`] would produce.
    pub fn encoded_len(&self, root: &Value) -> Result<usize, BinMapError> {
        Ok(Encoder::new(&self.opts).layout(root)?.root_len())
    }

    pub fn deserialize(&self, buf: impl AsRef<[u8]>) -> Result<Value, BinMapError> {
        let buf = buf.as_ref();
        let root = Decoder::new(&self.opts).deser_root(buf)?;
        debug!(root = root.kind_name(), len = buf.len(), "deserialized");
        Ok(root)
    }
}
