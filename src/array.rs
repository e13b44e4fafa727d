use std::ops::Deref;

/// An owned, fixed-length array popped out of a buffer, paired with its
/// element count.
///
/// The handle has exclusive ownership of its elements: it is moved rather
/// than copied, and the storage is released when the handle is dropped. The
/// slice returned by [`DecodedArray::as_slice`] is valid exactly as long as
/// the handle is alive.
#[derive(Debug, PartialEq)]
pub struct DecodedArray<T> {
    items: Box<[T]>,
}

impl<T> DecodedArray<T> {
    pub(crate) fn new(items: Box<[T]>) -> Self {
        DecodedArray { items }
    }

    /// Number of elements decoded from the field's count header.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the decoded field held zero elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrowed view of the decoded elements.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consumes the handle and returns the elements as a `Vec`.
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_vec()
    }
}

impl<T> Deref for DecodedArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}
