//! Performance utilities: CPU affinity hinting and resident-set sampling.

pub mod cpu;
pub mod rss;

pub use cpu::pin_to_core;
pub use rss::rss_mb;
