use bytes::{Bytes, BytesMut};

use crate::{DecodeError, DecodeErrorKind, DecodeResult, EncodeError, EncodeErrorKind, EncodeResult};

/// Width in bytes of the leading length marker.
pub const MARKER_WIDTH: usize = 4;

/// Width in bytes of a field's element-size header.
pub const SIZE_WIDTH: usize = 2;

/// Width in bytes of a field's element-count header.
pub const COUNT_WIDTH: usize = 2;

const fn header_max(width: usize) -> usize {
    if width >= size_of::<usize>() {
        usize::MAX
    } else {
        (1 << (width * 8)) - 1
    }
}

fn encode_le(mut value: usize, out: &mut [u8]) {
    for byte in out.iter_mut() {
        *byte = value as u8;
        value >>= 8;
    }
}

fn decode_le(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .rev()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize)
}

/// An owned, self-delimited byte sequence holding a series of framed fields.
///
/// The first [`MARKER_WIDTH`] bytes are the marker: the buffer's own total
/// byte length, little-endian, marker included. The marker is kept equal to
/// the current length whenever no field operation is in progress, so a
/// finished buffer can be located inside a longer byte stream purely from
/// its own leading bytes.
///
/// Buffers have value semantics: cloning deep-copies the bytes and two
/// buffers never share mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    data: BytesMut,
    marker_removed: bool,
}

impl Buffer {
    /// Creates an empty buffer holding only its marker.
    pub fn new() -> Self {
        let mut data = BytesMut::with_capacity(MARKER_WIDTH);
        data.resize(MARKER_WIDTH, 0);
        let mut buf = Buffer {
            data,
            marker_removed: false,
        };
        buf.update_marker();
        buf
    }

    /// Reconstructs a buffer from raw bytes previously produced by
    /// [`Buffer::payload`].
    ///
    /// The first [`MARKER_WIDTH`] bytes are read as the little-endian total
    /// length `L`, and exactly the first `L` bytes (marker included) are
    /// copied into the new buffer. Trailing bytes beyond `L` are ignored,
    /// which allows splitting one framed buffer off the front of a stream of
    /// several concatenated ones.
    ///
    /// Fails with [`DecodeErrorKind::TruncatedMarker`] if fewer than
    /// [`MARKER_WIDTH`] bytes are supplied, and with
    /// [`DecodeErrorKind::MalformedLength`] if the declared length is
    /// smaller than the marker itself or exceeds the bytes available.
    pub fn from_bytes(raw: &[u8]) -> DecodeResult<Self> {
        if raw.len() < MARKER_WIDTH {
            return Err(DecodeError::new(DecodeErrorKind::TruncatedMarker {
                available: raw.len(),
                marker_width: MARKER_WIDTH,
            }));
        }

        let declared = decode_le(&raw[..MARKER_WIDTH]);
        if declared < MARKER_WIDTH || declared > raw.len() {
            return Err(DecodeError::new(DecodeErrorKind::MalformedLength {
                declared,
                available: raw.len(),
            }));
        }

        Ok(Buffer {
            data: BytesMut::from(&raw[..declared]),
            marker_removed: false,
        })
    }

    /// Appends one framed field: element-size header, element-count header,
    /// then the payload bytes. The marker is restored if it had been removed
    /// and recomputed to the new total length.
    ///
    /// `payload.len()` must equal `elem_size * count`.
    pub fn push_field(&mut self, elem_size: usize, count: usize, payload: &[u8]) -> EncodeResult<()> {
        if elem_size > header_max(SIZE_WIDTH) {
            return Err(EncodeError::new(EncodeErrorKind::ElementTooWide {
                size: elem_size,
                max: header_max(SIZE_WIDTH),
            }));
        }
        if count > header_max(COUNT_WIDTH) {
            return Err(EncodeError::new(EncodeErrorKind::TooManyElements {
                count,
                max: header_max(COUNT_WIDTH),
            }));
        }
        if payload.len() != elem_size * count {
            return Err(EncodeError::new(EncodeErrorKind::PayloadSizeMismatch {
                expected: elem_size * count,
                actual: payload.len(),
            }));
        }

        self.add_marker();

        let total = self.data.len() + SIZE_WIDTH + COUNT_WIDTH + payload.len();
        if total > header_max(MARKER_WIDTH) {
            return Err(EncodeError::new(EncodeErrorKind::BufferTooLarge {
                length: total,
                max: header_max(MARKER_WIDTH),
            }));
        }

        let mut header = [0u8; SIZE_WIDTH + COUNT_WIDTH];
        encode_le(elem_size, &mut header[..SIZE_WIDTH]);
        encode_le(count, &mut header[SIZE_WIDTH..]);
        self.data.extend_from_slice(&header);
        self.data.extend_from_slice(payload);

        self.update_marker();
        Ok(())
    }

    /// Destructively removes the next field from the front of the buffer,
    /// returning its declared element size, element count, and payload.
    ///
    /// The marker is stripped on the first take, matching the encode side
    /// where it is written last. Fails with [`DecodeErrorKind::Underflow`]
    /// if fewer bytes remain than the headers or the declared payload
    /// require; on failure the buffer's fields are left unconsumed.
    pub fn take_field(&mut self) -> DecodeResult<(usize, usize, Bytes)> {
        self.remove_marker();

        let header_len = SIZE_WIDTH + COUNT_WIDTH;
        if self.data.len() < header_len {
            return Err(DecodeError::new(DecodeErrorKind::Underflow {
                needed: header_len,
                available: self.data.len(),
            }));
        }

        let elem_size = decode_le(&self.data[..SIZE_WIDTH]);
        let count = decode_le(&self.data[SIZE_WIDTH..header_len]);
        let payload_len = elem_size * count;

        if self.data.len() < header_len + payload_len {
            return Err(DecodeError::new(DecodeErrorKind::Underflow {
                needed: header_len + payload_len,
                available: self.data.len(),
            }));
        }

        let _ = self.data.split_to(header_len);
        let payload = self.data.split_to(payload_len).freeze();
        Ok((elem_size, count, payload))
    }

    /// Strips the leading marker bytes. No-op if already removed.
    pub fn remove_marker(&mut self) {
        if self.marker_removed {
            return;
        }
        let _ = self.data.split_to(MARKER_WIDTH);
        self.marker_removed = true;
    }

    /// Restores the leading marker, recomputed from the current length.
    /// No-op if the marker is already present.
    pub fn add_marker(&mut self) {
        if !self.marker_removed {
            return;
        }
        let tail = std::mem::take(&mut self.data);
        let mut data = BytesMut::with_capacity(MARKER_WIDTH + tail.len());
        data.resize(MARKER_WIDTH, 0);
        data.extend_from_slice(&tail);
        self.data = data;
        self.marker_removed = false;
        self.update_marker();
    }

    /// Read-only view of the buffer's current bytes, marker included unless
    /// it has been removed. This is the finished wire form to hand to a
    /// transport.
    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    /// Total byte length, marker included when present.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no bytes remain at all, which can only happen after the
    /// marker has been removed and every field taken.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Resets the buffer to its freshly-created state.
    pub fn clear(&mut self) {
        *self = Buffer::new();
    }

    fn update_marker(&mut self) {
        debug_assert!(!self.marker_removed);
        let len = self.data.len();
        encode_le(len, &mut self.data[..MARKER_WIDTH]);
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Buffer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Buffer, COUNT_WIDTH, MARKER_WIDTH, SIZE_WIDTH, decode_le, encode_le};
    use crate::{DecodeError, DecodeErrorKind, EncodeError, EncodeErrorKind};

    fn marker_of(buf: &Buffer) -> usize {
        decode_le(&buf.payload()[..MARKER_WIDTH])
    }

    #[test]
    fn test_le_helpers_roundtrip() {
        for value in [0usize, 1, 0xFF, 0x100, 0xFFFF, 0x1234_5678] {
            let mut bytes = [0u8; 4];
            encode_le(value, &mut bytes);
            assert_eq!(decode_le(&bytes), value);
        }
        assert_eq!(decode_le(&[0x0C, 0x00, 0x00, 0x00]), 12);
    }

    #[test]
    fn test_new_buffer_marker() {
        let buf = Buffer::new();
        assert_eq!(buf.len(), MARKER_WIDTH);
        assert_eq!(buf.payload(), &[0x04, 0x00, 0x00, 0x00]);
        assert_eq!(marker_of(&buf), buf.len());
    }

    #[test]
    fn test_push_field_exact_bytes() {
        let mut buf = Buffer::new();
        buf.push_field(4, 1, &[0x05, 0x00, 0x00, 0x00]).unwrap();

        // marker = 4 + 2 + 2 + 4 = 12
        assert_eq!(
            buf.payload(),
            &[
                0x0C, 0x00, 0x00, 0x00, // marker
                0x04, 0x00, // element size
                0x01, 0x00, // element count
                0x05, 0x00, 0x00, 0x00, // payload
            ]
        );
    }

    #[test]
    fn test_marker_tracks_length_across_pushes() {
        let mut buf = Buffer::new();
        for i in 0..5u8 {
            buf.push_field(1, 3, &[i, i, i]).unwrap();
            assert_eq!(marker_of(&buf), buf.len());
        }
        assert_eq!(buf.len(), MARKER_WIDTH + 5 * (SIZE_WIDTH + COUNT_WIDTH + 3));
    }

    #[test]
    fn test_take_field_roundtrip() {
        let mut buf = Buffer::new();
        buf.push_field(2, 2, &[1, 2, 3, 4]).unwrap();
        buf.push_field(1, 1, &[9]).unwrap();

        let (size, count, payload) = buf.take_field().unwrap();
        assert_eq!((size, count), (2, 2));
        assert_eq!(&payload[..], &[1, 2, 3, 4]);

        let (size, count, payload) = buf.take_field().unwrap();
        assert_eq!((size, count), (1, 1));
        assert_eq!(&payload[..], &[9]);

        assert!(buf.is_empty());
    }

    #[test]
    fn test_take_field_underflow_on_empty() {
        let mut buf = Buffer::new();
        assert_eq!(
            buf.take_field(),
            Err(DecodeError::new(DecodeErrorKind::Underflow {
                needed: SIZE_WIDTH + COUNT_WIDTH,
                available: 0,
            }))
        );
    }

    #[test]
    fn test_take_field_underflow_on_truncated_payload() {
        // Headers declare 4 payload bytes but only 2 are present.
        let raw = [
            0x0A, 0x00, 0x00, 0x00, // marker: 10
            0x04, 0x00, // element size 4
            0x01, 0x00, // element count 1
            0xAA, 0xBB,
        ];
        let mut buf = Buffer::from_bytes(&raw).unwrap();
        assert_eq!(
            buf.take_field(),
            Err(DecodeError::new(DecodeErrorKind::Underflow {
                needed: 8,
                available: 6,
            }))
        );
        // The failed take leaves the remaining bytes in place.
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn test_from_bytes_roundtrip() {
        let mut buf = Buffer::new();
        buf.push_field(1, 2, &[0xDE, 0xAD]).unwrap();

        let rebuilt = Buffer::from_bytes(buf.payload()).unwrap();
        assert_eq!(rebuilt, buf);
    }

    #[test]
    fn test_from_bytes_truncated_marker() {
        assert_eq!(
            Buffer::from_bytes(&[0x01, 0x02]),
            Err(DecodeError::new(DecodeErrorKind::TruncatedMarker {
                available: 2,
                marker_width: MARKER_WIDTH,
            }))
        );
    }

    #[test]
    fn test_from_bytes_declared_length_too_small() {
        assert_eq!(
            Buffer::from_bytes(&[0x02, 0x00, 0x00, 0x00]),
            Err(DecodeError::new(DecodeErrorKind::MalformedLength {
                declared: 2,
                available: 4,
            }))
        );
    }

    #[test]
    fn test_from_bytes_declared_length_exceeds_input() {
        assert_eq!(
            Buffer::from_bytes(&[0x20, 0x00, 0x00, 0x00, 0xAA]),
            Err(DecodeError::new(DecodeErrorKind::MalformedLength {
                declared: 32,
                available: 5,
            }))
        );
    }

    #[test]
    fn test_from_bytes_splits_prefix_of_stream() {
        let mut buf = Buffer::new();
        buf.push_field(1, 3, b"abc").unwrap();

        let mut stream = buf.payload().to_vec();
        stream.extend_from_slice(&[0xFF; 16]);

        let rebuilt = Buffer::from_bytes(&stream).unwrap();
        assert_eq!(rebuilt, buf);
    }

    #[test]
    fn test_marker_remove_add_idempotent() {
        let mut buf = Buffer::new();
        buf.push_field(1, 4, b"data").unwrap();
        let original = buf.payload().to_vec();

        buf.remove_marker();
        assert_eq!(buf.len(), original.len() - MARKER_WIDTH);
        buf.remove_marker(); // no-op
        assert_eq!(buf.len(), original.len() - MARKER_WIDTH);

        buf.add_marker();
        assert_eq!(buf.payload(), &original[..]);
        buf.add_marker(); // no-op
        assert_eq!(buf.payload(), &original[..]);
    }

    #[test]
    fn test_push_after_take_restores_marker() {
        let mut buf = Buffer::new();
        buf.push_field(1, 1, &[1]).unwrap();
        buf.push_field(1, 1, &[2]).unwrap();

        let _ = buf.take_field().unwrap();
        buf.push_field(1, 1, &[3]).unwrap();

        assert_eq!(marker_of(&buf), buf.len());
        let (_, _, payload) = buf.take_field().unwrap();
        assert_eq!(&payload[..], &[2]);
        let (_, _, payload) = buf.take_field().unwrap();
        assert_eq!(&payload[..], &[3]);
    }

    #[test]
    fn test_push_field_element_too_wide() {
        let mut buf = Buffer::new();
        assert_eq!(
            buf.push_field(0x1_0000, 0, &[]),
            Err(EncodeError::new(EncodeErrorKind::ElementTooWide {
                size: 0x1_0000,
                max: 0xFFFF,
            }))
        );
    }

    #[test]
    fn test_push_field_too_many_elements() {
        let mut buf = Buffer::new();
        assert_eq!(
            buf.push_field(0, 0x1_0000, &[]),
            Err(EncodeError::new(EncodeErrorKind::TooManyElements {
                count: 0x1_0000,
                max: 0xFFFF,
            }))
        );
    }

    #[test]
    fn test_push_field_payload_size_mismatch() {
        let mut buf = Buffer::new();
        assert_eq!(
            buf.push_field(2, 3, &[0; 5]),
            Err(EncodeError::new(EncodeErrorKind::PayloadSizeMismatch {
                expected: 6,
                actual: 5,
            }))
        );
    }

    #[test]
    fn test_clear_resets_to_fresh_state() {
        let mut buf = Buffer::new();
        buf.push_field(1, 1, &[7]).unwrap();
        buf.clear();
        assert_eq!(buf, Buffer::new());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = Buffer::new();
        a.push_field(1, 2, &[1, 2]).unwrap();

        let b = a.clone();
        let _ = a.take_field().unwrap();

        assert_eq!(b.len(), MARKER_WIDTH + SIZE_WIDTH + COUNT_WIDTH + 2);
        assert!(a.is_empty());
    }
}
