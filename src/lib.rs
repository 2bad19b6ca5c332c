//! Dynamically resizable arrays with an explicit capacity, optional default values and a removing cursor.
//!
//! This crate re-exports the strand sub-crates:
//! - [`base`]: helper macros and enum traits
//! - [`logging`]: the global logger
//! - [`common`]: the collections, including [`DynamicArray`](common::collections::DynamicArray)

pub use strand_base as base;
pub use strand_logging as logging;
pub use strand_common as common;

pub use strand_common::dynarr;

pub mod prelude {
    pub use strand_common::prelude::*;
    pub use strand_logging::{LogCategory, LogLevel, Logger, set_logger, get_logger};
}
