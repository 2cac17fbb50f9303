//! Shared setup code for the mimir binaries.

pub mod common;
