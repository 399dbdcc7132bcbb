use crate::serde::{FieldReader, FieldRef, TypeTag, TypeTagInt};
use crate::{FormatError, Mapping, Options, Value};
use std::mem;

/// Decodes one buffer. Not reused across calls.
pub(crate) struct Decoder<'o> {
    opts: &'o Options,
    /// Elements allocated so far across every sequence, gaps included.
    seq_elems: usize,
}

impl<'o> Decoder<'o> {
    pub fn new(opts: &'o Options) -> Self {
        Self { opts, seq_elems: 0 }
    }

    pub fn deser_root(&mut self, buf: &[u8]) -> Result<Value, FormatError> {
        /* root_type */
        let (root_type, doc) = buf.split_first().ok_or(FormatError::UnexpectedEof {
            offset: 0,
            needed: mem::size_of::<TypeTagInt>(),
            remaining: 0,
        })?;
        let root_type = TypeTag::try_from(TypeTagInt::from(*root_type))?;
        if !root_type.is_container() {
            return Err(FormatError::InvalidRoot(root_type));
        }

        /* document */
        let r = FieldReader::at(doc, mem::size_of::<TypeTagInt>());
        self.deser_document(root_type, r, 1)
    }

    fn deser_document(
        &mut self,
        tag: TypeTag,
        r: FieldReader<'_>,
        depth: usize,
    ) -> Result<Value, FormatError> {
        if depth > self.opts.max_depth() {
            return Err(FormatError::TooDeep(self.opts.max_depth()));
        }
        match tag {
            TypeTag::Mapping => self.deser_mapping(r, depth).map(Value::Mapping),
            TypeTag::Sequence => self.deser_sequence(r, depth).map(Value::Sequence),
            _ => Err(FormatError::InvalidRoot(tag)),
        }
    }

    /// A repeated key overwrites the earlier value, which keeps its position.
    fn deser_mapping(&mut self, r: FieldReader<'_>, depth: usize) -> Result<Mapping, FormatError> {
        let mut mapping = Mapping::new();
        for field in r {
            let field = field?;
            let key = self.deser_key(&field)?;
            let val = self.deser_value(&field, depth)?;
            mapping.insert(key, val);
        }
        Ok(mapping)
    }

    /// Indices must be canonical base-10, strictly increasing, and below the
    /// configured maximum. Skipped indices become [`Value::Absent`], and count
    /// against the element budget of the whole call.
    fn deser_sequence(&mut self, r: FieldReader<'_>, depth: usize) -> Result<Vec<Value>, FormatError> {
        let mut sequence = Vec::new();
        for field in r {
            let field = field?;
            let key = self.deser_key(&field)?;
            let index = parse_index(&key)?;
            if index >= self.opts.max_sequence_len() {
                return Err(FormatError::IndexOutOfBounds {
                    index,
                    max: self.opts.max_sequence_len(),
                });
            }
            if index < sequence.len() {
                return Err(FormatError::UnorderedIndex { index });
            }
            self.seq_elems += index + 1 - sequence.len();
            if self.seq_elems > self.opts.max_sequence_elements() {
                return Err(FormatError::TooManySequenceElements(
                    self.opts.max_sequence_elements(),
                ));
            }
            let val = self.deser_value(&field, depth)?;
            sequence.resize(index, Value::Absent);
            sequence.push(val);
        }
        Ok(sequence)
    }

    fn deser_key(&self, field: &FieldRef<'_>) -> Result<String, FormatError> {
        let enc = self.opts.text_encoding();
        enc.decode(field.key).ok_or(FormatError::InvalidText {
            encoding: enc,
            offset: key_offset(field),
        })
    }

    fn deser_value(&mut self, field: &FieldRef<'_>, depth: usize) -> Result<Value, FormatError> {
        let invalid_len = || FormatError::InvalidPayloadLen {
            tag: field.tag,
            offset: field.value_offset,
            len: field.value.len(),
        };

        let val = match field.tag {
            TypeTag::Null => {
                if !field.value.is_empty() {
                    return Err(invalid_len());
                }
                Value::Null
            }
            TypeTag::Text => {
                let enc = self.opts.text_encoding();
                let s = enc.decode(field.value).ok_or(FormatError::InvalidText {
                    encoding: enc,
                    offset: field.value_offset,
                })?;
                Value::Text(s)
            }
            TypeTag::Number => {
                let buf = <[u8; mem::size_of::<u64>()]>::try_from(field.value)
                    .map_err(|_| invalid_len())?;
                Value::Number(u64::from_le_bytes(buf))
            }
            TypeTag::Boolean => {
                if self.opts.lenient_booleans() {
                    Value::Boolean(field.value.first() == Some(&1))
                } else {
                    match field.value {
                        [0] => Value::Boolean(false),
                        [1] => Value::Boolean(true),
                        [byte] => {
                            return Err(FormatError::InvalidBoolean {
                                offset: field.value_offset,
                                byte: *byte,
                            })
                        }
                        _ => return Err(invalid_len()),
                    }
                }
            }
            TypeTag::Binary => Value::Binary(field.value.to_vec()),
            TypeTag::Mapping | TypeTag::Sequence => {
                let r = FieldReader::at(field.value, field.value_offset);
                self.deser_document(field.tag, r, depth + 1)?
            }
        };
        Ok(val)
    }
}

fn key_offset(field: &FieldRef<'_>) -> usize {
    field.value_offset - mem::size_of::<u32>() - field.key.len()
}

fn parse_index(key: &str) -> Result<usize, FormatError> {
    let invalid = || FormatError::InvalidIndex(key.to_owned());
    let is_canonical = match key.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        digits => digits.iter().all(u8::is_ascii_digit),
    };
    if !is_canonical {
        return Err(invalid());
    }
    key.parse().map_err(|_| invalid())
}
