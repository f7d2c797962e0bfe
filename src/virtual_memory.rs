use crate::address::{Reference, VirtualAddress};
use crate::frames::FrameTable;
use crate::storage::{self, Storage};
use crate::table::{PageEntry, PageTable};
use crate::tlb::Tlb;
use crate::tracker::Tracker;
use std::fmt;

/// Type Alias: A rebranding of the `Result` enum from the standard library
/// focused on errors that can interrupt a translation.
type Result<T> = std::result::Result<T, Error>;

// Translation can only fail in the backing store; the wrapper exists so the
// run loop can tell translation failures from its own concerns.
#[derive(Debug)]
pub enum Error {
    Store(storage::Error),
}

impl From<storage::Error> for Error {
    fn from(value: storage::Error) -> Self {
        Error::Store(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(error) => write!(f, "{}", error),
        }
    }
}

/// The outcome of one translated reference: the virtual address presented,
/// the physical address it resolved to, and the byte stored there. One
/// record is emitted per accepted reference, in arrival order.
#[derive(Debug, PartialEq, Eq)]
pub struct AccessResult {
    pub virtual_address: VirtualAddress,
    pub physical_address: u16,
    pub value: i8,
}

impl fmt::Display for AccessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Virtual address: {} Physical address: {} Value: {}",
            u16::from(self.virtual_address),
            self.physical_address,
            self.value
        )
    }
}

/// The `VirtualMemory` struct drives the whole translation path: TLB in
/// front, page table behind it, a bounded frame pool fed by the backing
/// store underneath, and the statistics tracker alongside. One instance is
/// built before the first reference and mutated in place until the stream
/// ends.
pub struct VirtualMemory {
    tlb: Tlb,
    pages: PageTable,
    frames: FrameTable,
    storage: Storage,
    pub tracker: Tracker,
}

impl VirtualMemory {
    /// Create a new `VirtualMemory` instance.
    ///
    /// # Arguments
    ///
    /// * `tlb_size` - TLB slot count; must not exceed `frame_count`, or a
    ///   frame eviction could leave a live TLB entry stale.
    /// * `page_count` - number of page-table entries.
    /// * `frame_count` - number of frames in the pool.
    /// * `frame_size` - frame and page size in bytes.
    /// * `file_storage` - path of the backing store file.
    ///
    /// # Errors
    ///
    /// Fails when the backing store cannot be opened.
    pub fn build(
        tlb_size: usize,
        page_count: usize,
        frame_count: usize,
        frame_size: usize,
        file_storage: &str,
    ) -> Result<Self> {
        debug_assert!(tlb_size <= frame_count);
        Ok(Self {
            tlb: Tlb::build(tlb_size),
            pages: PageTable::build(page_count),
            frames: FrameTable::build(frame_count, frame_size),
            storage: Storage::build(file_storage)?,
            tracker: Tracker::new(),
        })
    }

    /// Translate one reference and read the byte it names.
    ///
    /// The TLB is consulted first; on a miss the page table decides whether
    /// the page is resident, and a non-resident page is faulted in from the
    /// backing store, evicting the least recently referenced frame once the
    /// pool is full. A write access marks the page dirty without modifying
    /// the byte: the simulator models access patterns, not memory contents.
    /// Whatever the path, the frame and TLB slot that served the access are
    /// promoted so the most recent user is never the next victim.
    ///
    /// # Errors
    ///
    /// A seek or read failure against the backing store aborts the
    /// translation; the caller should abandon the stream.
    pub fn access(&mut self, reference: Reference) -> Result<AccessResult> {
        let page_number = reference.address.number_page as usize;
        let offset = reference.address.number_offset as usize;

        let (slot, frame_index) = match self.tlb.find(page_number) {
            Some((slot, frame_index)) => {
                self.tracker.tlb_hits += 1;
                (slot, frame_index)
            }
            None => {
                if !self.pages[page_number].valid {
                    self.tracker.page_faults += 1;
                    self.retrieve_frame(page_number)?;
                }
                let frame_index = self.pages[page_number].frame;
                (self.tlb.install(page_number, frame_index), frame_index)
            }
        };

        let physical_address = frame_index * self.frames.frame_size() + offset;
        let value = self.frames.read(physical_address);
        if reference.is_write {
            self.pages[page_number].dirty = true;
        }

        self.tlb.reference(slot);
        self.frames.reference(frame_index);
        self.tracker.translated += 1;

        Ok(AccessResult {
            virtual_address: reference.address,
            physical_address: physical_address as u16,
            value,
        })
    }

    /// Fault `page_number` in: claim a frame, settle the displaced page's
    /// bookkeeping, and load the page's bytes from the backing store. A
    /// victim that was written to counts one write-back, although nothing
    /// is stored; its bytes are discarded.
    fn retrieve_frame(&mut self, page_number: usize) -> Result<()> {
        let allocation = self.frames.allocate(page_number);
        if let Some(victim) = allocation.victim {
            let entry = &mut self.pages[victim];
            if entry.valid && entry.dirty {
                self.tracker.write_backs += 1;
            }
            entry.valid = false;
            entry.dirty = false;
        }

        self.storage
            .read_page(page_number, self.frames.frame_mut(allocation.frame))?;
        self.pages[page_number] = PageEntry {
            frame: allocation.frame,
            valid: true,
            dirty: false,
        };
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn components(&self) -> (&Tlb, &PageTable, &FrameTable) {
        (&self.tlb, &self.pages, &self.frames)
    }
}
