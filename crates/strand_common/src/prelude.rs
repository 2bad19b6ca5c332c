pub use crate::collections::{DynamicArray, ArrayError, ReserveStrategy, Cursor};
pub use crate::dynarr;
