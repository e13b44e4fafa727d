use crate::buffer::Buffer;
use crate::{DecodeResult, EncodeResult};

/// Composable capability: a composite value that defines its own ordered
/// field sequence.
///
/// `encode` and `decode` must mirror each other field-for-field: the wire
/// format is positional and every pop must match the push at the same
/// position. To embed another composite value, `encode` pushes the
/// sub-value's [`serialize`](Serializable::serialize) result as a nested
/// buffer field, and `decode` pops a [`Buffer`] and hands it to the
/// sub-value.
///
/// Composition is has-a: an embedded value travels as an independent nested
/// buffer inside one field of its parent.
pub trait Serializable {
    /// Writes this value's fields into `buf`, in a fixed order.
    fn encode(&self, buf: &mut Buffer) -> EncodeResult<()>;

    /// Reads fields from `buf` in the identical order, reconstructing this
    /// value in place.
    fn decode(&mut self, buf: &mut Buffer) -> DecodeResult<()>;

    /// Allocates a fresh buffer, encodes into it, and returns it.
    fn serialize(&self) -> EncodeResult<Buffer> {
        let mut buf = Buffer::new();
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Decodes from a private copy of `buf`, mutating this value in place.
    ///
    /// The supplied buffer is never mutated: it remains intact and can be
    /// deserialized from again.
    fn deserialize(&mut self, buf: &Buffer) -> DecodeResult<()> {
        let mut copy = buf.clone();
        self.decode(&mut copy)
    }
}
