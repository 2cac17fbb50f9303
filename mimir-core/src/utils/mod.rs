//! Small shared utilities.

pub mod hash;

pub use hash::{fnv1a64, OrderKey};
