//! Bounded lock-free single-producer/single-consumer ring.
//!
//! `head` is written only by the producer, `tail` only by the consumer; the
//! two counters are monotonic and live on separate cache lines so the
//! threads never contend on one line. Slot hand-off is ordered by the
//! release store on the owning counter paired with the acquire load on the
//! other side. A full ring drops the incoming element; the caller counts
//! the drop.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

/// Default ring capacity.
pub const DEFAULT_CAPACITY: usize = 16_384;
/// Capacity used when the requested one is not a power of two.
const FALLBACK_CAPACITY: usize = 1024;

/// Fixed-capacity SPSC ring over trivially copyable elements.
///
/// `T: Copy` keeps destructors from ever running on overwritten slots.
pub struct SpscRing<T: Copy> {
    buf: Box<[UnsafeCell<MaybeUninit<T>>]>,
    mask: u64,
    capacity: u64,
    head: CachePadded<AtomicU64>,
    tail: CachePadded<AtomicU64>,
    max_depth: AtomicU64,
}

// SAFETY: exactly one producer touches `head` and writes slots, exactly one
// consumer touches `tail` and reads slots; the release/acquire pairing on
// the counters publishes slot contents before they become visible to the
// other side.
unsafe impl<T: Copy + Send> Send for SpscRing<T> {}
unsafe impl<T: Copy + Send> Sync for SpscRing<T> {}

impl<T: Copy> SpscRing<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` must be a nonzero power of two; anything else silently
    /// falls back to 1024.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity.is_power_of_two() {
            capacity
        } else {
            FALLBACK_CAPACITY
        };
        let buf: Box<[UnsafeCell<MaybeUninit<T>>]> = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();
        Self {
            buf,
            mask: capacity as u64 - 1,
            capacity: capacity as u64,
            head: CachePadded::new(AtomicU64::new(0)),
            tail: CachePadded::new(AtomicU64::new(0)),
            max_depth: AtomicU64::new(0),
        }
    }

    /// Producer side. Returns false when the ring is full; the element is
    /// dropped, not queued.
    pub fn push(&self, v: T) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = head + 1;
        let tail = self.tail.load(Ordering::Acquire);
        if next - tail > self.capacity {
            return false;
        }
        // SAFETY: single producer; the slot at `head & mask` is outside the
        // consumer's visible window until the release store below.
        unsafe {
            (*self.buf[(head & self.mask) as usize].get()).write(v);
        }
        self.head.store(next, Ordering::Release);

        // Racy load/compare/store on purpose: a lost race under-reports the
        // gauge, never corrupts it.
        let depth = next - tail;
        if depth > self.max_depth.load(Ordering::Relaxed) {
            self.max_depth.store(depth, Ordering::Relaxed);
        }
        true
    }

    /// Consumer side.
    pub fn pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if tail == head {
            return None;
        }
        // SAFETY: head > tail, so the slot at `tail & mask` was fully
        // written before the producer's release store made it visible.
        let v = unsafe { (*self.buf[(tail & self.mask) as usize].get()).assume_init_read() };
        self.tail.store(tail + 1, Ordering::Release);
        Some(v)
    }

    /// Instantaneous occupancy; exact only when both threads are quiescent.
    pub fn depth(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head - tail) as usize
    }

    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// High-water occupancy mark observed at push time.
    pub fn max_depth(&self) -> u64 {
        self.max_depth.load(Ordering::Relaxed)
    }
}

impl<T: Copy> Default for SpscRing<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_power_of_two_capacity_falls_back() {
        let ring: SpscRing<u32> = SpscRing::with_capacity(1000);
        assert_eq!(ring.capacity(), 1024);
        let ring: SpscRing<u32> = SpscRing::with_capacity(0);
        assert_eq!(ring.capacity(), 1024);
    }

    #[test]
    fn full_ring_drops_the_new_element() {
        let ring: SpscRing<u32> = SpscRing::with_capacity(4);
        for i in 0..4 {
            assert!(ring.push(i));
        }
        assert!(!ring.push(99));
        assert_eq!(ring.depth(), 4);
        // The rejected element never entered the ring.
        assert_eq!(ring.pop(), Some(0));
    }

    #[test]
    fn depth_tracks_occupancy() {
        let ring: SpscRing<u32> = SpscRing::with_capacity(8);
        assert_eq!(ring.depth(), 0);
        ring.push(1);
        ring.push(2);
        assert_eq!(ring.depth(), 2);
        ring.pop();
        assert_eq!(ring.depth(), 1);
        assert_eq!(ring.max_depth(), 2);
    }

    #[test]
    fn wraps_around_the_mask() {
        let ring: SpscRing<u64> = SpscRing::with_capacity(4);
        for i in 0..64u64 {
            assert!(ring.push(i));
            assert_eq!(ring.pop(), Some(i));
        }
        assert_eq!(ring.depth(), 0);
    }
}
