use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Completion flag for one submission.
///
/// Armed on the producer thread right before submit; signalled from the GPU
/// completion callback, which may run on another thread.
#[derive(Debug, Clone, Default)]
pub struct Fence {
    in_flight: Arc<AtomicBool>,
}

impl Fence {
    #[inline]
    pub fn is_signalled(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    #[inline]
    pub fn arm(&self) {
        self.in_flight.store(true, Ordering::Release);
    }

    #[inline]
    pub fn signal(&self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Round-robin set of fences, one per frame in flight.
///
/// `claim` hands out the next slot only once the GPU has retired the
/// submission that last used it, which bounds how far the producer can run
/// ahead of the GPU.
#[derive(Debug)]
pub struct FenceRing {
    fences: Vec<Fence>,
    next: usize,
}

impl FenceRing {
    /// Creates a ring with `frames_in_flight` slots (at least one).
    pub fn new(frames_in_flight: usize) -> Self {
        let len = frames_in_flight.max(1);
        Self {
            fences: (0..len).map(|_| Fence::default()).collect(),
            next: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fences.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fences.is_empty()
    }

    /// Returns the next slot if its previous submission has completed.
    ///
    /// The cursor only advances on success, so slots are reused in order.
    pub fn claim(&mut self) -> Option<usize> {
        let slot = self.next;
        if !self.fences[slot].is_signalled() {
            return None;
        }
        self.next = (slot + 1) % self.fences.len();
        Some(slot)
    }

    /// Marks `slot` as in flight and returns the fence to signal on completion.
    pub fn arm(&self, slot: usize) -> Fence {
        let fence = &self.fences[slot];
        fence.arm();
        fence.clone()
    }

    #[inline]
    pub fn all_signalled(&self) -> bool {
        self.fences.iter().all(Fence::is_signalled)
    }

    #[inline]
    pub fn in_flight(&self) -> usize {
        self.fences.iter().filter(|f| !f.is_signalled()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ring_hands_out_slots_in_order() {
        let mut ring = FenceRing::new(3);
        assert_eq!(ring.claim(), Some(0));
        assert_eq!(ring.claim(), Some(1));
        assert_eq!(ring.claim(), Some(2));
        assert_eq!(ring.claim(), Some(0));
    }

    #[test]
    fn armed_slot_blocks_until_signalled() {
        let mut ring = FenceRing::new(2);

        let s0 = ring.claim().unwrap();
        let f0 = ring.arm(s0);
        let s1 = ring.claim().unwrap();
        let f1 = ring.arm(s1);
        assert_eq!(ring.in_flight(), 2);

        // Slot 0 is still in flight.
        assert_eq!(ring.claim(), None);
        assert_eq!(ring.claim(), None);

        f0.signal();
        assert_eq!(ring.claim(), Some(0));
        assert_eq!(ring.claim(), None);

        f1.signal();
        assert_eq!(ring.claim(), Some(1));
        assert!(ring.all_signalled());
    }

    #[test]
    fn zero_frames_in_flight_is_clamped() {
        let mut ring = FenceRing::new(0);
        assert_eq!(ring.len(), 1);
        let slot = ring.claim().unwrap();
        let fence = ring.arm(slot);
        assert_eq!(ring.claim(), None);
        fence.signal();
        assert_eq!(ring.claim(), Some(0));
    }

    #[test]
    fn signal_from_another_thread() {
        let mut ring = FenceRing::new(1);
        let slot = ring.claim().unwrap();
        let fence = ring.arm(slot);

        std::thread::spawn(move || fence.signal())
            .join()
            .unwrap();

        assert!(ring.all_signalled());
        assert_eq!(ring.claim(), Some(0));
    }
}
