use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    mem,
    ops::{Deref, DerefMut, Index, IndexMut},
    slice::{self, SliceIndex},
};

use super::{imp::buffer::RawBuffer, ArrayError, ExactReserveStrategy, ReserveStrategy, impl_slice_partial_eq_generic};

mod cursor;
mod into_iter;


pub use cursor::{Cursor, CursorState};
pub use into_iter::IntoIter;

/// A contiguous resizable array type, with an explicit capacity and an optional default value.
///
/// Dynamic arrays have *O*(1) indexing and *O*(*n*) positional removal, which keeps the order of the remaining elements.
///
/// Sizes and indices passed to the checked operations ([`resize`], [`get`], [`set`], [`remove_at`], ...) are signed,
/// a negative size or an index outside of `[0, len)` is reported as an [`ArrayError`] and leaves the array unchanged.
///
/// # Examples
///
/// ```
/// use strand_common::collections::DynamicArray;
///
/// let mut arr = DynamicArray::<char>::with_default(3, 'x')?;
/// arr.resize(5)?;
/// assert_eq!(arr, ['x'; 5]);
///
/// arr.set(0, 'y')?;
/// assert_eq!(arr.remove_at(0)?, 'y');
/// assert_eq!(arr, ['x'; 4]);
/// # Ok::<(), strand_common::collections::ArrayError>(())
/// ```
///
/// The [`dynarr!`] macro is provided for convenient initialization:
///
/// ```
/// use strand_common::dynarr;
///
/// let arr = dynarr![1, 2, 3];
/// assert_eq!(arr, [1, 2, 3]);
///
/// // Also remembers `0` as the default value
/// let arr = dynarr![0; 5];
/// assert_eq!(arr, [0, 0, 0, 0, 0]);
/// ```
///
/// # Capacity and reallocation
///
/// The capacity of a dynamic array is the number of slots allocated in its backing buffer.
/// This is not to be confused with the *length* (or size) of the dynamic array, which specifies the number of elements that are logically part of the array.
///
/// Growing an array past its capacity reallocates the backing buffer, the new capacity is decided by the reserve strategy `R`.
/// With the default [`ExactReserveStrategy`], the capacity becomes exactly the requested size.
/// An amortized strategy, like [`DoubleOrMinReserveStrategy`], can be used to make repeated [`push`]es *O*(1) amortized.
///
/// `DynamicArray` never shrinks its capacity: neither [`resize`] to a smaller size, nor [`remove_at`] or [`pop`] will release memory.
///
/// # Default value
///
/// When an array grows, the newly exposed slots are filled with the default value the array was created with (see [`with_default`]),
/// or with `T::default()` if it has none.
/// A slot is never exposed with the content it had before the array was shrunk.
///
/// # Ordering
///
/// Arrays are ordered lexicographically, see [`compare`].
///
/// [`resize`]: DynamicArray::resize
/// [`get`]: DynamicArray::get
/// [`set`]: DynamicArray::set
/// [`remove_at`]: DynamicArray::remove_at
/// [`pop`]: DynamicArray::pop
/// [`push`]: DynamicArray::push
/// [`with_default`]: DynamicArray::with_default
/// [`compare`]: DynamicArray::compare
/// [`DoubleOrMinReserveStrategy`]: super::DoubleOrMinReserveStrategy
/// [`dynarr!`]: crate::dynarr
pub struct DynamicArray<T, R: ReserveStrategy = ExactReserveStrategy> {
    buf:           RawBuffer<T, R>,
    len:           usize,
    default_value: Option<T>,
}

fn check_size(size: isize) -> Result<usize, ArrayError> {
    usize::try_from(size).map_err(|_| ArrayError::InvalidSize(size))
}

impl<T, R: ReserveStrategy> DynamicArray<T, R> {
    /// Constructs a new, empty `DynamicArray<T, R>` without a default value.
    ///
    /// The dynamic array will not allocate until it grows.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { buf: RawBuffer::new(), len: 0, default_value: None }
    }

    fn from_slots(slots: Box<[T]>, default_value: Option<T>) -> Self {
        let len = slots.len();
        Self { buf: RawBuffer::from_slots(slots), len, default_value }
    }

    /// Returns the number of elements in the array.
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    /// Returns the number of elements in the array, also referred to as its 'length'.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the total number of elements the array can hold without reallocating.
    ///
    /// # Example
    ///
    /// ```
    /// # use strand_common::collections::DynamicArray;
    /// let mut arr = DynamicArray::<u32>::with_size(10)?;
    /// arr.resize(2)?;
    /// assert_eq!(arr.capacity(), 10);
    /// # Ok::<(), strand_common::collections::ArrayError>(())
    /// ```
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the value used to fill newly exposed slots, if the array has one.
    #[inline]
    pub fn default_value(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    /// Extracts a slice containing the entire array.
    ///
    /// Equivalent to `&arr[..]`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.buf.slots()[..self.len]
    }

    /// Extracts a mutable slice of the entire array.
    ///
    /// Equivalent to `&mut arr[..]`.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.buf.slots_mut()[..len]
    }

    /// Returns an iterator over the elements of the array.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns an iterator that allows modifying each element of the array.
    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    fn check_index(&self, index: isize) -> Result<usize, ArrayError> {
        match usize::try_from(index) {
            Ok(idx) if idx < self.len => Ok(idx),
            _ => Err(ArrayError::IndexOutOfRange { index, len: self.len }),
        }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] unless `0 <= index < len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strand_common::{dynarr, collections::ArrayError};
    /// let arr = dynarr![10, 40, 30];
    /// assert_eq!(arr.get(1), Ok(&40));
    /// assert_eq!(arr.get(3), Err(ArrayError::IndexOutOfRange { index: 3, len: 3 }));
    /// assert_eq!(arr.get(-1), Err(ArrayError::IndexOutOfRange { index: -1, len: 3 }));
    /// ```
    pub fn get(&self, index: isize) -> Result<&T, ArrayError> {
        let idx = self.check_index(index)?;
        Ok(&self.as_slice()[idx])
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] unless `0 <= index < len`.
    pub fn get_mut(&mut self, index: isize) -> Result<&mut T, ArrayError> {
        let idx = self.check_index(index)?;
        Ok(&mut self.as_mut_slice()[idx])
    }

    /// Overwrites the element at `index` with `value`, dropping the previous element.
    ///
    /// This never changes the size or capacity of the array.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] unless `0 <= index < len`, `value` is dropped in that case.
    pub fn set(&mut self, index: isize, value: T) -> Result<(), ArrayError> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Creates a cursor that walks over the array from front to back, and which can remove the element it last produced.
    ///
    /// A cursor can only be used once, a new cursor needs to be created to walk the array again.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strand_common::dynarr;
    /// let mut arr = dynarr!['a', 'b', 'c'];
    /// let mut cursor = arr.cursor();
    /// assert_eq!(cursor.advance(), Some(&'a'));
    /// assert_eq!(cursor.advance(), Some(&'b'));
    /// assert_eq!(cursor.remove_current(), Ok('b'));
    /// assert_eq!(cursor.advance(), Some(&'c'));
    /// assert_eq!(arr, ['a', 'c']);
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, T, R> {
        Cursor::new(self)
    }
}

impl<T: Default, R: ReserveStrategy> DynamicArray<T, R> {
    /// Constructs an array with `size` elements, each set to `T::default()`.
    ///
    /// The capacity of the array is exactly `size`, the array has no default value, so growing it later fills the new slots with `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidSize`] if `size` is negative, or [`ArrayError::CapacityOverflow`] if the array would exceed `isize::MAX` _bytes_.
    pub fn with_size(size: isize) -> Result<Self, ArrayError> {
        let len = check_size(size)?;
        let buf = RawBuffer::try_with_capacity_with(len, T::default)?;
        Ok(Self { buf, len, default_value: None })
    }

    /// Removes and returns the element at position `index`, shifting all elements after it to the left.
    ///
    /// Note: Because this shifts over the remaining elements, it has a worst-case performance of *O*(*n*).
    /// The capacity of the array is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::IndexOutOfRange`] unless `0 <= index < len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strand_common::dynarr;
    /// let mut arr = dynarr![1, 2, 3];
    /// assert_eq!(arr.remove_at(1), Ok(2));
    /// assert_eq!(arr, [1, 3]);
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    pub fn remove_at(&mut self, index: isize) -> Result<T, ArrayError> {
        let idx = self.check_index(index)?;
        let len = self.len;

        let tail = &mut self.buf.slots_mut()[idx..len];
        let removed = mem::take(&mut tail[0]);
        // Shift everything down to fill in that spot, the placeholder ends up just past the new end
        tail.rotate_left(1);

        self.len = len - 1;
        Ok(removed)
    }

    /// Removes the last element from the array and returns it, or `None` if it is empty.
    ///
    /// The capacity of the array is left untouched.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            let len = self.len;
            Some(mem::take(&mut self.buf.slots_mut()[len]))
        }
    }

    /// Tries to append an element to the back of the array, growing the capacity according to the reserve strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::CapacityOverflow`] if the array can't grow, `value` is dropped in that case.
    pub fn try_push(&mut self, value: T) -> Result<(), ArrayError> {
        let len = self.len;
        self.buf.try_reserve(len, 1)?;
        self.buf.slots_mut()[len] = value;
        self.len = len + 1;
        Ok(())
    }

    /// Appends an element to the back of the array, growing the capacity according to the reserve strategy.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    #[track_caller]
    pub fn push(&mut self, value: T) {
        #[cold]
        #[track_caller]
        fn assert_failed(len: usize) -> ! {
            panic!("capacity overflow while pushing onto an array of len {len}");
        }

        if self.try_push(value).is_err() {
            assert_failed(self.len);
        }
    }
}

impl<T: Clone, R: ReserveStrategy> DynamicArray<T, R> {
    /// Constructs an array with `size` elements, each set to a clone of `value`.
    ///
    /// `value` is remembered as the default value of the array, and is used to fill newly exposed slots when the array grows.
    /// The capacity of the array is exactly `size`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidSize`] if `size` is negative, or [`ArrayError::CapacityOverflow`] if the array would exceed `isize::MAX` _bytes_.
    pub fn with_default(size: isize, value: T) -> Result<Self, ArrayError> {
        let len = check_size(size)?;
        let buf = RawBuffer::try_with_capacity_with(len, || value.clone())?;
        Ok(Self { buf, len, default_value: Some(value) })
    }

    /// Constructs an array of `n` clones of `elem`, with `elem` as its default value.
    ///
    /// This is the unsigned and infallible variant of [`with_default`](DynamicArray::with_default), used by [`dynarr!`](crate::dynarr).
    ///
    /// # Panics
    ///
    /// Panics if the capacity exceeds `isize::MAX` _bytes_.
    #[track_caller]
    pub fn from_elem(elem: T, n: usize) -> Self {
        #[cold]
        #[track_caller]
        fn assert_failed(n: usize) -> ! {
            panic!("capacity overflow while creating an array of {n} elements");
        }

        match RawBuffer::try_with_capacity_with(n, || elem.clone()) {
            Ok(buf) => Self { buf, len: n, default_value: Some(elem) },
            Err(_) => assert_failed(n),
        }
    }

    /// Creates a deep copy of `source`.
    ///
    /// The copy has the same elements and default value as `source`, and a capacity equal to its size.
    /// It shares no storage with `source`: modifying one will never be observable through the other.
    pub fn copy(source: &Self) -> Self {
        Self::from_slots(Box::from(source.as_slice()), source.default_value.clone())
    }
}

impl<T: Clone + Default, R: ReserveStrategy> DynamicArray<T, R> {
    /// Resizes the array in-place so that its size is equal to `new_size`.
    ///
    /// - If `new_size` is greater than the capacity, the backing buffer grows according to the reserve strategy `R`,
    ///   existing elements keep their index. With the default strategy, the capacity becomes exactly `new_size`.
    /// - If `new_size` is greater than the size, each additional slot is filled with the default value of the array, or `T::default()` if it has none.
    /// - If `new_size` is less than the size, the array is truncated and the removed elements are dropped. The capacity does not change.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidSize`] if `new_size` is negative, or [`ArrayError::CapacityOverflow`] if the array can't grow.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strand_common::collections::DynamicArray;
    /// let mut arr = DynamicArray::<char>::with_default(2, 'x')?;
    /// arr.set(0, 'a')?;
    ///
    /// arr.resize(4)?;
    /// assert_eq!(arr, ['a', 'x', 'x', 'x']);
    /// assert_eq!(arr.capacity(), 4);
    ///
    /// arr.resize(1)?;
    /// assert_eq!(arr, ['a']);
    /// assert_eq!(arr.capacity(), 4);
    /// # Ok::<(), strand_common::collections::ArrayError>(())
    /// ```
    pub fn resize(&mut self, new_size: isize) -> Result<(), ArrayError> {
        let new_len = check_size(new_size)?;
        let old_len = self.len;

        if new_len > old_len {
            self.buf.try_grow_to(new_len)?;

            let Self { buf, default_value, .. } = self;
            let gap = &mut buf.slots_mut()[old_len..new_len];
            match default_value {
                Some(value) => gap.fill_with(|| value.clone()),
                None => gap.fill_with(T::default),
            }
        } else {
            self.buf.slots_mut()[new_len..old_len].fill_with(T::default);
        }

        self.len = new_len;
        Ok(())
    }
}

impl<T: Ord, R: ReserveStrategy> DynamicArray<T, R> {
    /// Compares 2 arrays lexicographically.
    ///
    /// - 2 empty arrays are equal, an empty array is less than any non-empty array.
    /// - Otherwise the elements are compared pairwise with increasing index, the first pair that is not equal decides the ordering.
    /// - If all compared elements are equal, the shorter array is less than the longer one.
    ///
    /// How an array became empty does not matter, an array resized to `0` is equal to an array created with size `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use core::cmp::Ordering;
    /// # use strand_common::{dynarr, collections::DynamicArray};
    /// let empty = DynamicArray::<u32>::new();
    /// assert_eq!(empty.compare(&dynarr![1]), Ordering::Less);
    /// assert_eq!(dynarr![1, 2].compare(&dynarr![1, 3]), Ordering::Less);
    /// assert_eq!(dynarr![1, 2, 0].compare(&dynarr![1, 2]), Ordering::Greater);
    /// ```
    pub fn compare<R1: ReserveStrategy>(&self, other: &DynamicArray<T, R1>) -> Ordering {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {},
        }

        for (lhs, rhs) in self.iter().zip(other.iter()) {
            match lhs.cmp(rhs) {
                Ordering::Equal => {},
                ord => return ord,
            }
        }
        self.len.cmp(&other.len)
    }
}

impl<T: Clone, R: ReserveStrategy> Clone for DynamicArray<T, R> {
    /// Creates a deep copy, see [`DynamicArray::copy`].
    fn clone(&self) -> Self {
        Self::copy(self)
    }
}

impl<T, R: ReserveStrategy> Default for DynamicArray<T, R> {
    /// Creates an empty `DynamicArray<T>`.
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R: ReserveStrategy> Deref for DynamicArray<T, R> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, R: ReserveStrategy> DerefMut for DynamicArray<T, R> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>, R: ReserveStrategy> Index<I> for DynamicArray<T, R> {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>, R: ReserveStrategy> IndexMut<I> for DynamicArray<T, R> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: Hash, R: ReserveStrategy> Hash for DynamicArray<T, R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(self.as_slice(), state)
    }
}

impl<T: fmt::Debug, R: ReserveStrategy> fmt::Debug for DynamicArray<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl_slice_partial_eq_generic!([R0: ReserveStrategy, R1: ReserveStrategy] DynamicArray<T, R0>, DynamicArray<U, R1>);
impl_slice_partial_eq_generic!([R: ReserveStrategy] DynamicArray<T, R>, &[U]);
impl_slice_partial_eq_generic!([R: ReserveStrategy] DynamicArray<T, R>, &mut [U]);
impl_slice_partial_eq_generic!([R: ReserveStrategy] &[T], DynamicArray<U, R>);
impl_slice_partial_eq_generic!([R: ReserveStrategy] DynamicArray<T, R>, [U]);
impl_slice_partial_eq_generic!([R: ReserveStrategy] [T], DynamicArray<U, R>);
impl_slice_partial_eq_generic!([R: ReserveStrategy, const N: usize] DynamicArray<T, R>, [U; N]);
impl_slice_partial_eq_generic!([R: ReserveStrategy, const N: usize] [T; N], DynamicArray<U, R>);

impl<T: Eq, R: ReserveStrategy> Eq for DynamicArray<T, R> {}

impl<T, R0, R1> PartialOrd<DynamicArray<T, R1>> for DynamicArray<T, R0> where
    T: PartialOrd,
    R0: ReserveStrategy,
    R1: ReserveStrategy,
{
    #[inline]
    fn partial_cmp(&self, other: &DynamicArray<T, R1>) -> Option<Ordering> {
        PartialOrd::partial_cmp(self.as_slice(), other.as_slice())
    }
}

impl<T: Ord, R: ReserveStrategy> Ord for DynamicArray<T, R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<T, R: ReserveStrategy, const N: usize> From<[T; N]> for DynamicArray<T, R> {
    /// Creates an array from the elements of `value`, without a default value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strand_common::{dynarr, collections::DynamicArray};
    /// let arr: DynamicArray<i32> = DynamicArray::from([1, 2, 3]);
    /// assert_eq!(arr, dynarr![1, 2, 3]);
    /// ```
    fn from(value: [T; N]) -> Self {
        Self::from_slots(Box::new(value), None)
    }
}

impl<T: Clone, R: ReserveStrategy> From<&[T]> for DynamicArray<T, R> {
    /// Allocate a `DynamicArray<T>` and fill it by cloning `s`'s items.
    fn from(s: &[T]) -> Self {
        Self::from_slots(Box::from(s), None)
    }
}

impl<T, R: ReserveStrategy> FromIterator<T> for DynamicArray<T, R> {
    /// Collects an iterator into an array with a capacity equal to the number of collected elements.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_slots(iter.into_iter().collect(), None)
    }
}

impl<T, R: ReserveStrategy> IntoIterator for DynamicArray<T, R> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Creates a consuming iterator, that is, one that moves each value out of the array (from start to end).
    /// The array cannot be used after calling this.
    fn into_iter(self) -> Self::IntoIter {
        let len = self.len;
        IntoIter::new(self.buf.into_slots(), len)
    }
}

impl<'a, T, R: ReserveStrategy> IntoIterator for &'a DynamicArray<T, R> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, R: ReserveStrategy> IntoIterator for &'a mut DynamicArray<T, R> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

static_assertions::assert_impl_all!(DynamicArray<u32>: Send, Sync, Clone, Default, Ord);
static_assertions::assert_not_impl_any!(DynamicArray<std::rc::Rc<u32>>: Send, Sync);

/// Creates a [`DynamicArray`] containing the arguments.
///
/// - Create a [`DynamicArray`] containing a given list of elements:
///
/// ```
/// # use strand_common::dynarr;
/// let arr = dynarr![1, 2, 3];
/// assert_eq!(arr[0], 1);
/// assert_eq!(arr[1], 2);
/// assert_eq!(arr[2], 3);
/// ```
///
/// - Create a [`DynamicArray`] from a given element and size, the element becomes the default value of the array:
///
/// ```
/// # use strand_common::dynarr;
/// let mut arr = dynarr![1; 3];
/// assert_eq!(arr, [1, 1, 1]);
/// arr.resize(4).unwrap();
/// assert_eq!(arr, [1, 1, 1, 1]);
/// ```
///
/// The resulting array always uses the default reserve strategy.
#[macro_export]
macro_rules! dynarr {
    () => {
        <$crate::collections::DynamicArray<_>>::new()
    };
    ($elem:expr; $n:expr) => {
        <$crate::collections::DynamicArray<_>>::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        <$crate::collections::DynamicArray<_>>::from([$($x),+])
    };
}
