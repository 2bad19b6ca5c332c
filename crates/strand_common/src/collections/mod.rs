mod imp;

mod dynarr;

use core::fmt;
use strand_logging::LogCategory;

pub use dynarr::*;

pub(crate) const LOG_CAT : LogCategory = LogCategory::new("Collections");

//--------------------------------------------------------------

macro_rules! impl_slice_partial_eq_generic {
    ([$($vars:tt)*] $lhs:ty, $rhs:ty $(where $ty:ty: $bound:ident)?) => {
        impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs  where
            T : PartialEq<U>,
            $($ty: $bound)?
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
        }
    };
}
use impl_slice_partial_eq_generic;

//--------------------------------------------------------------

/// Error returned by the checked operations of a collection.
///
/// A collection is left unchanged when an operation returns an error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArrayError {
    /// A negative size was requested
    InvalidSize(isize),
    /// An index was outside of `[0, len)`
    IndexOutOfRange{ index: isize, len: usize },
    /// A cursor was asked to remove an element, while it has no element to remove
    InvalidIteratorState,
    /// The requested capacity can't be represented
    CapacityOverflow,
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayError::InvalidSize(size)              => f.write_fmt(format_args!("Invalid size: {size}, a size may not be negative")),
            ArrayError::IndexOutOfRange { index, len } => f.write_fmt(format_args!("Index out of range: index is {index}, but len is {len}")),
            ArrayError::InvalidIteratorState           => f.write_str("Invalid iterator state: no element is available to remove"),
            ArrayError::CapacityOverflow               => f.write_str("Capacity overflow"),
        }
    }
}

impl std::error::Error for ArrayError {
}

//--------------------------------------------------------------

/// A trait used to define a strategy to reserve additional memory for containers.
pub trait ReserveStrategy {
    /// Calculate the new capacity for a container.
    ///
    /// `cur_capacity` represents the current capacity of the container.
    ///
    /// `min_capacity` represents the minimum required capacity to be able to resize.
    ///
    /// Returns `Err(())` if the capacity were to overflow
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, ()>;
}

/// A reserve strategy that returns exactly the minimum required capacity.
///
/// This is the default strategy of a [`DynamicArray`], its capacity always is the largest size it was ever resized to.
pub struct ExactReserveStrategy;

impl ReserveStrategy for ExactReserveStrategy {
    fn calculate(_cur_capacity: usize, min_capacity: usize) -> Result<usize, ()> {
        if min_capacity <= isize::MAX as usize {
            Ok(min_capacity)
        } else {
            Err(())
        }
    }
}

/// A reserve strategy that will try to either return double the current capacity, or the minimum required capacity, whichever is bigger.
pub struct DoubleOrMinReserveStrategy;

impl ReserveStrategy for DoubleOrMinReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, ()> {
        let double_cap = cur_capacity.saturating_mul(2);
        let new_cap = if double_cap > min_capacity { double_cap } else { min_capacity };
        if new_cap <= isize::MAX as usize {
            Ok(new_cap)
        } else {
            Err(())
        }
    }
}

/// A reserve strategy that will return a power of 2 capacity
pub struct Pow2ReserveStrategy;

impl ReserveStrategy for Pow2ReserveStrategy {
    fn calculate(_cur_capacity: usize, min_capacity: usize) -> Result<usize, ()> {
        match min_capacity.checked_next_power_of_two() {
            Some(new_cap) if new_cap <= isize::MAX as usize => Ok(new_cap),
            _ => Err(()),
        }
    }
}

/// A reserve stategy that grows the capacity by 1.5
pub struct ThreeHalvesReserveStrategy;

impl ReserveStrategy for ThreeHalvesReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, ()> {
        // Growing from less than 2 elements by 1.5 would never make progress
        let mut cap = cur_capacity.max(2);
        while cap < min_capacity {
            cap = (cap << 1) - (cap >> 1);
            if cap >= isize::MAX as usize {
                return Err(());
            }
        }
        Ok(cap.max(min_capacity))
    }
}
