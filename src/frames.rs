use crate::lru::LruQueue;
use crate::PAGE_NONE;

/// Outcome of a frame claim: the frame to load into and, once the pool is
/// full, the page displaced from it. The caller owns the victim's page-table
/// bookkeeping.
#[derive(Debug, PartialEq, Eq)]
pub struct Allocation {
    pub frame: usize,
    pub victim: Option<usize>,
}

/// The `FrameTable` struct simulates the bounded pool of physical frames.
/// Frame contents live in one contiguous buffer so a computed physical
/// address indexes it directly; `resident` is the inverse of the page table,
/// naming the page each frame currently holds. Frames are handed out
/// sequentially until the pool fills, after which the least recently
/// referenced frame is recycled.
pub struct FrameTable {
    frame_size: usize,
    buffer: Vec<u8>,
    resident: Vec<usize>,
    used: usize,
    victimizer: LruQueue,
}

impl FrameTable {
    /// Construct a pool of `table_size` frames of `frame_size` bytes each.
    /// The victimizer is seeded with every frame up front, frame 0 at the
    /// tail, so recency updates behave uniformly from the first touch even
    /// though eviction cannot occur before the pool fills.
    pub fn build(table_size: usize, frame_size: usize) -> Self {
        let mut victimizer = LruQueue::new();
        (0..table_size).for_each(|index| victimizer.insert_new(index));
        Self {
            frame_size,
            buffer: vec![0; table_size * frame_size],
            resident: vec![PAGE_NONE; table_size],
            used: 0,
            victimizer,
        }
    }

    /// Claim a frame for `page`. While unused frames remain they are issued
    /// in index order with no victim; afterwards the victim is the tail of
    /// the recency queue. The tail is only peeked, never popped: the
    /// caller's `reference` after the load repositions it.
    pub fn allocate(&mut self, page: usize) -> Allocation {
        let (frame, victim) = if self.used < self.capacity() {
            let frame = self.used;
            self.used += 1;
            (frame, None)
        } else {
            let frame = self
                .victimizer
                .peek_tail()
                .expect("victimizer seeded at build");
            (frame, Some(self.resident[frame]))
        };
        self.resident[frame] = page;
        Allocation { frame, victim }
    }

    /// Byte value at a physical address, interpreted as signed.
    pub fn read(&self, physical_address: usize) -> i8 {
        self.buffer[physical_address] as i8
    }

    /// The writable page-sized slice backing `frame`.
    pub fn frame_mut(&mut self, frame: usize) -> &mut [u8] {
        let start = frame * self.frame_size;
        &mut self.buffer[start..start + self.frame_size]
    }

    /// Reset the frame's position in the victimization queue. Called on
    /// every successful translation so the most recent user of a frame is
    /// never the eviction victim.
    pub fn reference(&mut self, frame: usize) {
        self.victimizer.promote(frame);
    }

    pub fn resident_page(&self, frame: usize) -> usize {
        self.resident[frame]
    }

    pub fn capacity(&self) -> usize {
        self.resident.len()
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn used(&self) -> usize {
        self.used
    }

    #[cfg(test)]
    pub(crate) fn victim_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = self.victimizer.iter().collect();
        order.reverse();
        order
    }
}
