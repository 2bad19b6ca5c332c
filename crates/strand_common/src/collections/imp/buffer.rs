use core::{
    marker::PhantomData,
    mem,
};

use crate::collections::{ArrayError, ReserveStrategy, LOG_CAT};

cfg_if::cfg_if! {
    if #[cfg(feature = "log_reallocations")] {
        fn log_growth<T>(old_cap: usize, new_cap: usize) {
            strand_logging::log_verbose!(LOG_CAT, "Growing buffer of `{}` from {old_cap} to {new_cap} elements", core::any::type_name::<T>());
        }
    } else {
        #[inline(always)]
        fn log_growth<T>(_old_cap: usize, _new_cap: usize) {}
    }
}

/// Low level owned backing storage of a collection.
///
/// Every slot of the buffer, up to its capacity, always holds a valid `T`.
/// Slots that are not part of a collection's logical content hold a placeholder value, which is `T::default()` unless the owner wrote something else.
///
/// This type does not track which slots are in use, this is up to the owner of the `RawBuffer`.
/// It only decides how much the capacity grows, using the reserve strategy `R`, and never shrinks.
pub(crate) struct RawBuffer<T, R: ReserveStrategy> {
    slots:    Box<[T]>,
    _phantom: PhantomData<R>,
}

impl<T, R: ReserveStrategy> RawBuffer<T, R> {
    /// Creates a buffer with a capacity of `0`, this does not allocate.
    pub fn new() -> Self {
        Self { slots: Box::default(), _phantom: PhantomData }
    }

    /// Creates a buffer that takes ownership of already initialized slots.
    pub fn from_slots(slots: Box<[T]>) -> Self {
        Self { slots, _phantom: PhantomData }
    }

    /// Creates a buffer with exactly `capacity` slots, each initialized by calling `f`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::CapacityOverflow`] if the capacity exceeds `isize::MAX` _bytes_.
    pub fn try_with_capacity_with<F: FnMut() -> T>(capacity: usize, f: F) -> Result<Self, ArrayError> {
        Self::check_layout(capacity)?;
        let slots = core::iter::repeat_with(f).take(capacity).collect();
        Ok(Self::from_slots(slots))
    }

    /// Get the number of slots in the buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Get all slots in the buffer, including the slots that are not in use.
    #[inline]
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    /// Get all slots in the buffer mutably, including the slots that are not in use.
    #[inline]
    pub fn slots_mut(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Turn the buffer back into its slots.
    pub fn into_slots(self) -> Box<[T]> {
        self.slots
    }

    fn check_layout(capacity: usize) -> Result<(), ArrayError> {
        match capacity.checked_mul(mem::size_of::<T>()) {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
            _ => Err(ArrayError::CapacityOverflow),
        }
    }
}

impl<T: Default, R: ReserveStrategy> RawBuffer<T, R> {
    /// Ensures that the buffer can hold at least `len + additional` elements, growing the capacity according to the reserve strategy.
    ///
    /// Does nothing if the capacity is already sufficient.
    ///
    /// # Errors
    ///
    /// If the capacity overflows, an error is returned and the buffer is left unchanged.
    pub fn try_reserve(&mut self, len: usize, additional: usize) -> Result<(), ArrayError> {
        let required_cap = len.checked_add(additional).ok_or(ArrayError::CapacityOverflow)?;
        self.try_grow_to(required_cap)
    }

    /// Ensures that the buffer has at least `min_capacity` slots, growing the capacity according to the reserve strategy.
    ///
    /// Existing slots keep their position and value, new slots are initialized to `T::default()`.
    ///
    /// # Errors
    ///
    /// If the capacity overflows, an error is returned and the buffer is left unchanged.
    pub fn try_grow_to(&mut self, min_capacity: usize) -> Result<(), ArrayError> {
        let old_cap = self.capacity();
        if min_capacity <= old_cap {
            return Ok(());
        }

        let new_cap = match R::calculate(old_cap, min_capacity) {
            Ok(cap) if cap >= min_capacity && Self::check_layout(cap).is_ok() => cap,
            _ => {
                strand_logging::log_warning!(LOG_CAT, "Failed to grow buffer of `{}` to {min_capacity} elements: capacity overflow", core::any::type_name::<T>());
                return Err(ArrayError::CapacityOverflow);
            }
        };

        let mut slots = mem::take(&mut self.slots).into_vec();
        slots.reserve_exact(new_cap - old_cap);
        slots.resize_with(new_cap, T::default);
        self.slots = slots.into_boxed_slice();

        log_growth::<T>(old_cap, new_cap);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::{DoubleOrMinReserveStrategy, ExactReserveStrategy};

    #[test]
    fn new_does_not_allocate() {
        let buf = RawBuffer::<u32, ExactReserveStrategy>::new();
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn with_capacity() {
        let buf = RawBuffer::<u32, ExactReserveStrategy>::try_with_capacity_with(5, || 7).unwrap();
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.slots(), &[7, 7, 7, 7, 7]);

        assert!(matches!(
            RawBuffer::<u64, ExactReserveStrategy>::try_with_capacity_with(usize::MAX / 4, || 0),
            Err(ArrayError::CapacityOverflow)
        ));
    }

    #[test]
    fn grow_exact_preserves_slots() {
        let mut buf = RawBuffer::<u32, ExactReserveStrategy>::from_slots(Box::new([1, 2, 3]));
        buf.try_grow_to(5).unwrap();
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.slots(), &[1, 2, 3, 0, 0]);

        // Never shrinks
        buf.try_grow_to(2).unwrap();
        assert_eq!(buf.capacity(), 5);
    }

    #[test]
    fn reserve_amortized() {
        let mut buf = RawBuffer::<u32, DoubleOrMinReserveStrategy>::from_slots(Box::new([1, 2, 3, 4]));
        buf.try_reserve(4, 1).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert_eq!(&buf.slots()[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn reserve_overflow_leaves_buffer() {
        let mut buf = RawBuffer::<u32, ExactReserveStrategy>::from_slots(Box::new([1, 2]));
        assert_eq!(buf.try_reserve(2, usize::MAX), Err(ArrayError::CapacityOverflow));
        assert_eq!(buf.try_grow_to(usize::MAX / 2), Err(ArrayError::CapacityOverflow));
        assert_eq!(buf.slots(), &[1, 2]);
    }
}
