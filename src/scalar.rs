use std::mem;

/// Capability bound for plain fixed-size values whose wire form is their raw
/// in-memory byte representation.
///
/// Encoding is native-endian and performs no padding or representation
/// normalization: it is only valid between mutually-trusted endpoints on the
/// same platform. This is an intentional, documented property of the format,
/// not an oversight; see the crate-level docs.
pub trait Scalar: Copy {
    /// Byte width of the value's memory representation.
    const WIDTH: usize;

    /// Appends the value's raw bytes to `out`.
    fn write_raw(&self, out: &mut Vec<u8>);

    /// Reconstructs a value from exactly [`Self::WIDTH`] raw bytes.
    fn read_raw(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const WIDTH: usize = mem::size_of::<$ty>();

                fn write_raw(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }

                fn read_raw(bytes: &[u8]) -> Self {
                    <$ty>::from_ne_bytes(bytes.try_into().unwrap())
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl Scalar for bool {
    const WIDTH: usize = 1;

    fn write_raw(&self, out: &mut Vec<u8>) {
        out.push(*self as u8);
    }

    fn read_raw(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}
