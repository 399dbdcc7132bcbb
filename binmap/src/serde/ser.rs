use crate::serde::{
    ser_field_header, FieldRef, KeyLen, TypeTag, TypeTagInt, ValueLen, WriteLen, FIELD_HEADER_LEN,
};
use crate::{BinMapError, InputKindError, Mapping, Options, Value, ValueShapeError};
use itertools::Either;
use std::borrow::Cow;
use std::io::Write;
use std::mem;
use std::slice;
use tracing::trace;

/// The entries of one container level, in wire order.
#[derive(Clone, Copy)]
enum Container<'v> {
    Mapping(&'v Mapping),
    Sequence(&'v [Value]),
}
impl<'v> Container<'v> {
    fn of(val: &'v Value) -> Option<Self> {
        match val {
            Value::Mapping(m) => Some(Self::Mapping(m)),
            Value::Sequence(s) => Some(Self::Sequence(s)),
            _ => None,
        }
    }

    fn entries(self) -> impl Iterator<Item = (Cow<'v, str>, &'v Value)> {
        match self {
            Self::Mapping(m) => Either::Left(m.iter().map(|(k, v)| (Cow::Borrowed(k.as_str()), v))),
            Self::Sequence(s) => Either::Right(
                s.iter()
                    .enumerate()
                    .map(|(i, v)| (Cow::Owned(i.to_string()), v)),
            ),
        }
    }
}

/// What one measuring pass over a root learns before anything is written.
#[derive(Debug, Default)]
pub(crate) struct Layout {
    root_len: usize,
    /// Lengths of the nested Documents, in the order their fields are written.
    doc_lens: Vec<usize>,
    seq_elems: usize,
}
impl Layout {
    pub fn root_len(&self) -> usize {
        self.root_len
    }
}

pub(crate) struct Encoder<'o> {
    opts: &'o Options,
}

impl<'o> Encoder<'o> {
    pub fn new(opts: &'o Options) -> Self {
        Self { opts }
    }

    /// Validates the whole tree and derives every length [`Self::ser_root`] needs.
    ///
    /// A caller that gets a layout first never observes a partially written root.
    pub fn layout(&self, root: &Value) -> Result<Layout, BinMapError> {
        let cont = Self::root_container(root)?;
        let mut layout = Layout::default();
        let doc_len = self.measure_document(cont, 1, &mut layout)?;
        layout.root_len = mem::size_of::<TypeTagInt>() + doc_len;
        Ok(layout)
    }

    /// `layout` must come from [`Self::layout`] on the same `root`.
    pub fn ser_root(
        &self,
        root: &Value,
        layout: &Layout,
        w: &mut impl Write,
    ) -> Result<WriteLen, BinMapError> {
        let cont = Self::root_container(root)?;
        let mut doc_lens = layout.doc_lens.iter();
        let mut w_len = WriteLen(0);

        /* root_type */
        let root_type = TypeTagInt::from(Self::container_tag(cont));
        w.write_all(&root_type.to_le_bytes())?;
        w_len.0 += mem::size_of::<TypeTagInt>();

        /* document */
        w_len.0 += self.ser_document(cont, &mut doc_lens, w)?.0;

        if doc_lens.next().is_some() {
            return Err(ValueShapeError::LayoutMismatch.into());
        }
        Ok(w_len)
    }

    fn root_container(root: &Value) -> Result<Container<'_>, InputKindError> {
        Container::of(root).ok_or(InputKindError::NonContainerRoot(root.kind_name()))
    }
    fn container_tag(cont: Container) -> TypeTag {
        match cont {
            Container::Mapping(_) => TypeTag::Mapping,
            Container::Sequence(_) => TypeTag::Sequence,
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), InputKindError> {
        if depth > self.opts.max_depth() {
            return Err(InputKindError::TooDeep(self.opts.max_depth()));
        }
        Ok(())
    }

    /// Keeps every encodable sequence decodable by a codec with the same options.
    fn check_sequence(&self, len: usize, layout: &mut Layout) -> Result<(), InputKindError> {
        let max = self.opts.max_sequence_len();
        if len > max {
            return Err(InputKindError::SequenceTooLong { len, max });
        }
        layout.seq_elems += len;
        if layout.seq_elems > self.opts.max_sequence_elements() {
            return Err(InputKindError::TooManySequenceElements(
                self.opts.max_sequence_elements(),
            ));
        }
        Ok(())
    }

    /* measure */

    fn measure_document(
        &self,
        cont: Container,
        depth: usize,
        layout: &mut Layout,
    ) -> Result<usize, BinMapError> {
        self.check_depth(depth)?;
        if let Container::Sequence(s) = cont {
            self.check_sequence(s.len(), layout)?;
        }

        let enc = self.opts.text_encoding();
        let mut doc_len = 0;
        for (key, val) in cont.entries() {
            let body_len = match val {
                Value::Absent => continue,
                Value::Null => 0,
                Value::Text(s) => enc.encoded_len(s)?,
                Value::Number(n) => mem::size_of_val(n),
                Value::Boolean(_) => mem::size_of::<u8>(),
                Value::Binary(b) => b.len(),
                Value::Mapping(m) => self.measure_nested(Container::Mapping(m), depth, layout)?,
                Value::Sequence(s) => self.measure_nested(Container::Sequence(s), depth, layout)?,
            };
            let key_len = enc.encoded_len(&key)?;
            KeyLen::from_len(key_len)?;
            ValueLen::from_len(body_len)?;
            doc_len += FIELD_HEADER_LEN + key_len + body_len;
        }
        Ok(doc_len)
    }

    /// The slot is taken before descending, so `doc_lens` ends up in write order.
    fn measure_nested(
        &self,
        cont: Container,
        depth: usize,
        layout: &mut Layout,
    ) -> Result<usize, BinMapError> {
        let slot = layout.doc_lens.len();
        layout.doc_lens.push(0);
        let doc_len = self.measure_document(cont, depth + 1, layout)?;
        layout.doc_lens[slot] = doc_len;
        Ok(doc_len)
    }

    /* write */

    fn ser_document(
        &self,
        cont: Container,
        doc_lens: &mut slice::Iter<'_, usize>,
        w: &mut impl Write,
    ) -> Result<WriteLen, BinMapError> {
        let mut w_len = WriteLen(0);
        for (key, val) in cont.entries() {
            w_len.0 += self.ser_field(&key, val, doc_lens, w)?.0;
        }
        Ok(w_len)
    }

    fn ser_field(
        &self,
        key: &str,
        val: &Value,
        doc_lens: &mut slice::Iter<'_, usize>,
        w: &mut impl Write,
    ) -> Result<WriteLen, BinMapError> {
        let tag = match TypeTag::of(val) {
            None => {
                trace!(key, "dropping absent entry");
                return Ok(WriteLen(0));
            }
            Some(tag) => tag,
        };

        let enc = self.opts.text_encoding();
        let key = enc.encode(key)?;
        trace!(?tag, key_len = key.len(), "write field");

        match val {
            Value::Absent => Ok(WriteLen(0)),
            Value::Null => FieldRef::new(tag, &key, &[]).ser(w),
            Value::Text(s) => FieldRef::new(tag, &key, &enc.encode(s)?).ser(w),
            Value::Number(n) => FieldRef::new(tag, &key, &n.to_le_bytes()).ser(w),
            Value::Boolean(b) => FieldRef::new(tag, &key, &[u8::from(*b)]).ser(w),
            Value::Binary(b) => FieldRef::new(tag, &key, b).ser(w),
            Value::Mapping(m) => self.ser_nested(Container::Mapping(m), &key, doc_lens, w),
            Value::Sequence(s) => self.ser_nested(Container::Sequence(s), &key, doc_lens, w),
        }
    }

    /// A nested field's `value_len` must precede its Document,
    /// so it is taken from the layout rather than from the bytes written.
    fn ser_nested(
        &self,
        cont: Container,
        key: &[u8],
        doc_lens: &mut slice::Iter<'_, usize>,
        w: &mut impl Write,
    ) -> Result<WriteLen, BinMapError> {
        let doc_len = *doc_lens.next().ok_or(ValueShapeError::LayoutMismatch)?;
        let value_len = ValueLen::from_len(doc_len)?;

        let mut w_len = ser_field_header(w, Self::container_tag(cont), key, value_len)?;
        let body_len = self.ser_document(cont, doc_lens, w)?;
        if *body_len != doc_len {
            return Err(ValueShapeError::LayoutMismatch.into());
        }
        w_len.0 += *body_len;
        Ok(w_len)
    }
}
