use crate::array::DecodedArray;
use crate::buffer::Buffer;
use crate::scalar::Scalar;
use crate::{DecodeError, DecodeErrorKind, DecodeResult, EncodeResult};

/// One encode/decode strategy per value category.
///
/// Each implementation writes exactly one framed field via
/// [`Buffer::push_field`] and reads it back via [`Buffer::take_field`]. The
/// wire format is positional: it carries no type tags, so pops must mirror
/// pushes one-for-one, in the same order and with the same category. A
/// mismatched pop either fails on the element-size check or silently
/// misinterprets the payload; pairing calls correctly is the caller's
/// protocol obligation.
pub trait Field: Sized {
    /// Appends this value to the buffer as one field.
    fn push_into(&self, buf: &mut Buffer) -> EncodeResult<()>;

    /// Removes the next field from the buffer and reconstructs the value.
    fn pop_from(buf: &mut Buffer) -> DecodeResult<Self>;
}

/// Terminator byte appended to every text field.
const TEXT_TERMINATOR: u8 = 0;

fn push_scalar<T: Scalar>(buf: &mut Buffer, value: &T) -> EncodeResult<()> {
    let mut payload = Vec::with_capacity(T::WIDTH);
    value.write_raw(&mut payload);
    buf.push_field(T::WIDTH, 1, &payload)
}

fn pop_scalar<T: Scalar>(buf: &mut Buffer) -> DecodeResult<T> {
    let (elem_size, count, payload) = buf.take_field()?;
    if elem_size != T::WIDTH {
        return Err(DecodeError::new(DecodeErrorKind::WrongElementSize {
            expected: T::WIDTH,
            actual: elem_size,
        }));
    }
    if count != 1 {
        return Err(DecodeError::new(DecodeErrorKind::WrongElementCount {
            expected: 1,
            actual: count,
        }));
    }
    Ok(T::read_raw(&payload))
}

fn push_elements<T: Scalar>(buf: &mut Buffer, values: &[T]) -> EncodeResult<()> {
    let mut payload = Vec::with_capacity(T::WIDTH * values.len());
    for value in values {
        value.write_raw(&mut payload);
    }
    buf.push_field(T::WIDTH, values.len(), &payload)
}

fn pop_elements<T: Scalar>(buf: &mut Buffer) -> DecodeResult<Box<[T]>> {
    let (elem_size, count, payload) = buf.take_field()?;
    if elem_size != T::WIDTH {
        return Err(DecodeError::new(DecodeErrorKind::WrongElementSize {
            expected: T::WIDTH,
            actual: elem_size,
        }));
    }
    let mut items = Vec::with_capacity(count);
    for chunk in payload.chunks_exact(T::WIDTH) {
        items.push(T::read_raw(chunk));
    }
    Ok(items.into_boxed_slice())
}

macro_rules! impl_scalar_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn push_into(&self, buf: &mut Buffer) -> EncodeResult<()> {
                    push_scalar(buf, self)
                }

                fn pop_from(buf: &mut Buffer) -> DecodeResult<Self> {
                    pop_scalar(buf)
                }
            }
        )*
    };
}

impl_scalar_field!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64, bool);

/// Text: element size 1, element count = byte length + 1, payload = the
/// text bytes followed by one terminator byte.
///
/// Text containing an embedded terminator byte is not representable; only
/// the single trailing terminator is interpreted and trimmed on decode.
impl Field for String {
    fn push_into(&self, buf: &mut Buffer) -> EncodeResult<()> {
        let bytes = self.as_bytes();
        let mut payload = Vec::with_capacity(bytes.len() + 1);
        payload.extend_from_slice(bytes);
        payload.push(TEXT_TERMINATOR);
        buf.push_field(1, payload.len(), &payload)
    }

    fn pop_from(buf: &mut Buffer) -> DecodeResult<Self> {
        let (elem_size, _count, payload) = buf.take_field()?;
        if elem_size != 1 {
            return Err(DecodeError::new(DecodeErrorKind::WrongElementSize {
                expected: 1,
                actual: elem_size,
            }));
        }
        let Some((&TEXT_TERMINATOR, text)) = payload.split_last() else {
            return Err(DecodeError::new(DecodeErrorKind::MissingTerminator));
        };
        let text = std::str::from_utf8(text)
            .map_err(|_| DecodeError::new(DecodeErrorKind::InvalidUtf8))?;
        Ok(text.to_string())
    }
}

/// Homogeneous dynamic sequence: element size = the element's width,
/// element count = the sequence length, payload = concatenated raw elements.
impl<T: Scalar> Field for Vec<T> {
    fn push_into(&self, buf: &mut Buffer) -> EncodeResult<()> {
        push_elements(buf, self)
    }

    fn pop_from(buf: &mut Buffer) -> DecodeResult<Self> {
        Ok(pop_elements(buf)?.into_vec())
    }
}

/// Nested buffer: element size 1, element count = the embedded buffer's
/// total length (marker included), payload = its bytes verbatim.
///
/// The embedded buffer must carry its marker; this is always the case for a
/// buffer produced by [`Serializable::serialize`](crate::Serializable::serialize).
/// Popping re-validates the embedded marker and returns an independent,
/// itself-decodable buffer.
impl Field for Buffer {
    fn push_into(&self, buf: &mut Buffer) -> EncodeResult<()> {
        buf.push_field(1, self.len(), self.payload())
    }

    fn pop_from(buf: &mut Buffer) -> DecodeResult<Self> {
        let (elem_size, _count, payload) = buf.take_field()?;
        if elem_size != 1 {
            return Err(DecodeError::new(DecodeErrorKind::WrongElementSize {
                expected: 1,
                actual: elem_size,
            }));
        }
        Buffer::from_bytes(&payload)
    }
}

impl Buffer {
    /// Appends `value` as one framed field.
    pub fn push<T: Field>(&mut self, value: &T) -> EncodeResult<()> {
        value.push_into(self)
    }

    /// Removes the next field and reconstructs a `T` from it. Must mirror
    /// the matching [`Buffer::push`] in order and type.
    pub fn pop<T: Field>(&mut self) -> DecodeResult<T> {
        T::pop_from(self)
    }

    /// Appends a raw array of scalars as one field.
    pub fn push_array<T: Scalar>(&mut self, values: &[T]) -> EncodeResult<()> {
        push_elements(self, values)
    }

    /// Removes the next field as an owned array of scalars.
    pub fn pop_array<T: Scalar>(&mut self) -> DecodeResult<DecodedArray<T>> {
        Ok(DecodedArray::new(pop_elements(self)?))
    }
}
