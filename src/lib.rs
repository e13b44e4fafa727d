//! Satchel is a compact binary object-encoding library built on
//! length-prefixed field framing: composite in-memory values become a flat,
//! self-delimited byte sequence and are reconstructed later on the other
//! side of a process or network boundary.
//!
//! Every buffer starts with a little-endian length marker covering the whole
//! buffer, followed by a series of fields, each framed as
//! `[element size][element count][payload]`. The format is positional — no
//! type tags are stored — so decode calls must mirror encode calls
//! one-for-one, in the same order and with the same types.
//!
//! # Portability
//!
//! Scalar payloads are the value's raw in-memory bytes, native-endian, with
//! no representation normalization. **The wire format is only valid between
//! mutually-trusted endpoints on the same platform.** Field headers and the
//! length marker are always little-endian.
//!
//! # Examples
//!
//! ```
//! use satchel::Buffer;
//!
//! let mut buf = Buffer::new();
//! buf.push(&5i32).unwrap();
//! buf.push(&"David".to_string()).unwrap();
//!
//! // ... the transport moves buf.payload() as raw bytes ...
//! let mut received = Buffer::from_bytes(buf.payload()).unwrap();
//!
//! assert_eq!(received.pop::<i32>().unwrap(), 5);
//! assert_eq!(received.pop::<String>().unwrap(), "David");
//! ```

mod array;
mod buffer;
mod error;
mod field;
mod scalar;
mod serial;

pub use crate::array::DecodedArray;
pub use crate::buffer::{Buffer, COUNT_WIDTH, MARKER_WIDTH, SIZE_WIDTH};
pub use crate::error::{
    DecodeError, DecodeErrorKind, DecodeResult, EncodeError, EncodeErrorKind, EncodeResult,
};
pub use crate::field::Field;
pub use crate::scalar::Scalar;
pub use crate::serial::Serializable;

/// Re-export of the derive macro for implementing the Serializable trait on
/// custom types.
///
/// # Example
///
/// ```
/// use satchel::Serializable;
///
/// #[derive(Default, Serializable)]
/// struct Person {
///     name: String,
///     age: i32,
/// }
/// ```
pub use satchel_derive::Serializable;
