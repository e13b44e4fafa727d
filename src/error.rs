use thiserror::Error;

/// Specific kinds of decoding errors that can occur when reading fields back
/// out of a buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error(
        "input shorter than the length marker: have {available} bytes, marker needs {marker_width}"
    )]
    TruncatedMarker {
        available: usize,
        marker_width: usize,
    },

    #[error("declared buffer length is malformed: declares {declared} bytes, {available} available")]
    MalformedLength { declared: usize, available: usize },

    #[error("field extends beyond remaining data: need {needed} bytes, have {available}")]
    Underflow { needed: usize, available: usize },

    #[error("field element size mismatch: expected {expected}, field declares {actual}")]
    WrongElementSize { expected: usize, actual: usize },

    #[error("field element count mismatch: expected {expected}, field declares {actual}")]
    WrongElementCount { expected: usize, actual: usize },

    #[error("text field payload does not end with a terminator byte")]
    MissingTerminator,

    #[error("invalid UTF-8 in text field")]
    InvalidUtf8,
}

/// Error type returned when decoding framed binary data fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("decode error: {kind}")]
pub struct DecodeError {
    /// The specific kind of decode error that occurred.
    kind: DecodeErrorKind,
}

impl DecodeError {
    /// Creates a new DecodeError with the given kind.
    pub const fn new(kind: DecodeErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of decode error that occurred.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Specific kinds of encoding errors that can occur when appending fields to
/// a buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeErrorKind {
    #[error("element size {size} does not fit the size header (max {max})")]
    ElementTooWide { size: usize, max: usize },

    #[error("element count {count} does not fit the count header (max {max})")]
    TooManyElements { count: usize, max: usize },

    #[error("payload length {actual} does not match element size times count ({expected})")]
    PayloadSizeMismatch { expected: usize, actual: usize },

    #[error("total buffer length {length} does not fit the length marker (max {max})")]
    BufferTooLarge { length: usize, max: usize },
}

/// Error type returned when encoding a field fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("encode error: {kind}")]
pub struct EncodeError {
    /// The specific kind of encode error that occurred.
    kind: EncodeErrorKind,
}

impl EncodeError {
    /// Creates a new EncodeError with the given kind.
    pub fn new(kind: EncodeErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of encode error that occurred.
    pub fn kind(&self) -> &EncodeErrorKind {
        &self.kind
    }
}

/// Result type for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;
