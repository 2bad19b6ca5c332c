use core::{fmt, iter::FusedIterator};
use std::vec;

/// An iterator that moves out of a [`DynamicArray`](super::DynamicArray).
///
/// This `struct` is created by the `into_iter` method on [`DynamicArray`](super::DynamicArray) (provided by the [`IntoIterator`] trait).
pub struct IntoIter<T> {
    iter: vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    // Slots past `len` are placeholders and are dropped here
    pub(super) fn new(slots: Box<[T]>, len: usize) -> Self {
        let mut slots = slots.into_vec();
        slots.truncate(len);
        Self { iter: slots.into_iter() }
    }

    /// Returns the remaining items of this iterator as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.iter.as_slice()
    }

    /// Returns the remaining items of this iterator as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.iter.as_mut_slice()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.iter.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }

    #[inline]
    fn count(self) -> usize {
        self.iter.count()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.iter.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T: Clone> Clone for IntoIter<T> {
    fn clone(&self) -> Self {
        Self { iter: self.iter.clone() }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
