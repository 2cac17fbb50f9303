//! Event transport between the producer and the consumer.
//!
//! Two interchangeable queues with deliberately different semantics: the
//! bounded lock-free ring drops on full and counts the drop, the unbounded
//! locked FIFO never drops but may grow without bound. The variant carries
//! the queue itself since the two differ in bounded/unbounded behavior, not
//! just implementation.

mod locked;
mod ring;

pub use locked::LockedQueue;
pub use ring::{SpscRing, DEFAULT_CAPACITY};

use crate::feed::MdEvent;

pub enum Transport {
    Ring(SpscRing<MdEvent>),
    Locked(LockedQueue<MdEvent>),
}

impl Transport {
    /// Bounded lock-free transport at the default capacity.
    pub fn ring() -> Self {
        Transport::Ring(SpscRing::new())
    }

    /// Unbounded locked transport.
    pub fn locked() -> Self {
        Transport::Locked(LockedQueue::new())
    }

    /// False means the event was dropped (bounded ring only).
    #[inline]
    pub fn push(&self, ev: MdEvent) -> bool {
        match self {
            Transport::Ring(ring) => ring.push(ev),
            Transport::Locked(queue) => {
                queue.push(ev);
                true
            }
        }
    }

    #[inline]
    pub fn pop(&self) -> Option<MdEvent> {
        match self {
            Transport::Ring(ring) => ring.pop(),
            Transport::Locked(queue) => queue.pop(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Transport::Ring(ring) => ring.depth(),
            Transport::Locked(queue) => queue.depth(),
        }
    }
}
