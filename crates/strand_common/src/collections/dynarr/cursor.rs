use core::iter::FusedIterator;

use super::DynamicArray;
use crate::collections::{ArrayError, ReserveStrategy};

/// State of a [`Cursor`], which decides whether [`Cursor::remove_current`] is allowed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CursorState {
    /// No element has been produced yet.
    Fresh,
    /// An element was produced, and may be removed.
    Advanced,
    /// The last produced element was removed, the cursor needs to advance before it can remove again.
    PostRemove,
}

/// A single-pass forward cursor over a [`DynamicArray`], created by [`DynamicArray::cursor`].
///
/// Next to walking the array, the cursor can remove the element it most recently produced.
/// Elements after a removed element are shifted down, and the cursor follows along, so no element is skipped or produced twice.
///
/// ```
/// # use strand_common::dynarr;
/// let mut arr = dynarr![1, 2, 3, 4, 5, 6];
///
/// // Remove all even numbers
/// let mut cursor = arr.cursor();
/// while let Some(&val) = cursor.advance() {
///     if val % 2 == 0 {
///         cursor.remove_current()?;
///     }
/// }
/// assert_eq!(arr, [1, 3, 5]);
/// # Ok::<(), strand_common::collections::ArrayError>(())
/// ```
pub struct Cursor<'a, T, R: ReserveStrategy> {
    arr:   &'a mut DynamicArray<T, R>,
    idx:   usize,
    state: CursorState,
}

impl<'a, T, R: ReserveStrategy> Cursor<'a, T, R> {
    pub(super) fn new(arr: &'a mut DynamicArray<T, R>) -> Self {
        Self { arr, idx: 0, state: CursorState::Fresh }
    }

    /// Get the current state of the cursor.
    #[inline]
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Get the index of the element the next call to [`advance`](Cursor::advance) will produce.
    #[inline]
    pub fn position(&self) -> usize {
        self.idx
    }

    /// Get the number of elements that are still to be produced.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.arr.len().saturating_sub(self.idx)
    }

    /// Produce the next element, or `None` when the end of the array was reached.
    ///
    /// Reaching the end does not change the state of the cursor,
    /// so the last produced element can still be removed after an exhausted advance.
    pub fn advance(&mut self) -> Option<&T> {
        if self.idx >= self.arr.len() {
            return None;
        }

        self.idx += 1;
        self.state = CursorState::Advanced;
        Some(&self.arr.as_slice()[self.idx - 1])
    }
}

impl<T: Default, R: ReserveStrategy> Cursor<'_, T, R> {
    /// Remove the element most recently produced by [`advance`](Cursor::advance), and return it.
    ///
    /// The next call to `advance` produces the element that followed the removed element.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidIteratorState`] if no element was produced yet, or if the produced element was already removed.
    pub fn remove_current(&mut self) -> Result<T, ArrayError> {
        if self.state != CursorState::Advanced {
            return Err(ArrayError::InvalidIteratorState);
        }

        // `idx - 1` is a valid index, so it always fits in an `isize`
        let removed = self.arr.remove_at((self.idx - 1) as isize)?;
        self.idx -= 1;
        self.state = CursorState::PostRemove;
        Ok(removed)
    }
}

impl<T: Clone, R: ReserveStrategy> Iterator for Cursor<'_, T, R> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.advance().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T: Clone, R: ReserveStrategy> ExactSizeIterator for Cursor<'_, T, R> {}
impl<T: Clone, R: ReserveStrategy> FusedIterator for Cursor<'_, T, R> {}
