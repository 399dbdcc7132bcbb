use crate::{TextEncoding, UnknownEncoding};

pub const DEFAULT_MAX_DEPTH: usize = 128;
pub const DEFAULT_MAX_SEQUENCE_LEN: usize = 1 << 20;
pub const DEFAULT_MAX_SEQUENCE_ELEMENTS: usize = 1 << 20;

/// Settings shared by the encoder and the decoder.
///
/// Depth counts container levels, the root being level 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    text_encoding: TextEncoding,
    max_depth: usize,
    max_sequence_len: usize,
    max_sequence_elements: usize,
    lenient_booleans: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            text_encoding: TextEncoding::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_sequence_len: DEFAULT_MAX_SEQUENCE_LEN,
            max_sequence_elements: DEFAULT_MAX_SEQUENCE_ELEMENTS,
            lenient_booleans: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_encoding(mut self, text_encoding: TextEncoding) -> Self {
        self.text_encoding = text_encoding;
        self
    }
    pub fn with_text_encoding_label(self, label: &str) -> Result<Self, UnknownEncoding> {
        let text_encoding = label.parse()?;
        Ok(self.with_text_encoding(text_encoding))
    }
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
    /// Encoded sequences may hold at most this many elements,
    /// and decoded sequence indices must stay below it.
    pub fn with_max_sequence_len(mut self, max_sequence_len: usize) -> Self {
        self.max_sequence_len = max_sequence_len;
        self
    }
    /// Caps the elements of all sequences in one call together.
    ///
    /// On decode this counts the `Absent` elements that fill index gaps,
    /// so a short buffer cannot expand into a huge tree.
    pub fn with_max_sequence_elements(mut self, max_sequence_elements: usize) -> Self {
        self.max_sequence_elements = max_sequence_elements;
        self
    }
    /// When set, a Boolean payload decodes as `true` iff its first byte is `1`,
    /// and anything else decodes as `false` instead of failing.
    pub fn with_lenient_booleans(mut self, lenient_booleans: bool) -> Self {
        self.lenient_booleans = lenient_booleans;
        self
    }

    pub fn text_encoding(&self) -> TextEncoding {
        self.text_encoding
    }
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
    pub fn max_sequence_len(&self) -> usize {
        self.max_sequence_len
    }
    pub fn max_sequence_elements(&self) -> usize {
        self.max_sequence_elements
    }
    pub fn lenient_booleans(&self) -> bool {
        self.lenient_booleans
    }
}
