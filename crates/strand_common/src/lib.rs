//! Common containers and utilities shared by the strand crates.

pub mod collections;

pub mod prelude;
