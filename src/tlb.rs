use crate::lru::LruQueue;
use crate::PAGE_NONE;

/// The `Tlb` struct virtualizes the translation look-aside buffer: a small
/// associative cache over recent page-to-frame mappings. Slots are a pair of
/// parallel arrays, with `slot_page` seeded to the `PAGE_NONE` sentinel so
/// an untouched slot can never produce a false hit, plus a recency queue
/// over the slot indices themselves. Slot identity is stable; only the
/// recency order over slots changes.
pub struct Tlb {
    slot_page: Vec<usize>,
    slot_frame: Vec<usize>,
    victimizer: LruQueue,
}

impl Tlb {
    /// Build an empty buffer of `table_size` slots, slot 0 first in line for
    /// reuse.
    pub fn build(table_size: usize) -> Self {
        let mut victimizer = LruQueue::new();
        (0..table_size).for_each(|slot| victimizer.insert_new(slot));
        Self {
            slot_page: vec![PAGE_NONE; table_size],
            slot_frame: vec![0; table_size],
            victimizer,
        }
    }

    /// Search the slots for `page`, returning the slot index and cached
    /// frame on a hit. A `None` is a TLB miss.
    // todo: switch the scan to a hashed lookup if slot counts ever grow
    pub fn find(&self, page: usize) -> Option<(usize, usize)> {
        self.slot_page
            .iter()
            .position(|&cached| cached == page)
            .map(|slot| (slot, self.slot_frame[slot]))
    }

    /// Cache a page-to-frame mapping in the least recently used slot,
    /// returning the slot index. The slot is only peeked, never popped: the
    /// caller's `reference` repositions it.
    pub fn install(&mut self, page: usize, frame: usize) -> usize {
        let slot = self
            .victimizer
            .peek_tail()
            .expect("victimizer seeded at build");
        self.slot_page[slot] = page;
        self.slot_frame[slot] = frame;
        slot
    }

    /// Reset the slot's position in the victimization queue.
    pub fn reference(&mut self, slot: usize) {
        self.victimizer.promote(slot);
    }

    pub fn len(&self) -> usize {
        self.slot_page.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_page.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn cached_pages(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slot_page
            .iter()
            .zip(self.slot_frame.iter())
            .filter(|(&page, _)| page != PAGE_NONE)
            .map(|(&page, &frame)| (page, frame))
    }

    #[cfg(test)]
    pub(crate) fn victim_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = self.victimizer.iter().collect();
        order.reverse();
        order
    }
}
