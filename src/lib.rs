pub mod address;
pub mod config;
pub mod frames;
pub mod lru;
pub mod storage;
pub mod table;
pub mod tlb;
pub mod tracker;
pub mod validator;
pub mod virtual_memory;

use address::AddressReader;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use validator::ValidationReader;
use virtual_memory::VirtualMemory;

pub const SIZE_TLB: usize = 16;
pub const SIZE_PAGE_TABLE: usize = 256;
pub const SIZE_FRAME_TABLE: usize = 128;
pub const SIZE_FRAME: usize = 256;
pub const MASK_PAGE: u16 = 0xFF00;
pub const MASK_OFFSET: u16 = 0x00FF;

/// Marks a frame or TLB slot that has never held a page. Wider than any
/// page number, so it can never collide with a real one.
pub const PAGE_NONE: usize = usize::MAX;

// a frame-pool victim is the stalest of SIZE_FRAME_TABLE resident pages and
// so can never still sit among the SIZE_TLB freshest TLB entries; shrinking
// the pool below the TLB would break that and require TLB purges on eviction
const _: () = assert!(SIZE_FRAME_TABLE >= SIZE_TLB);

#[derive(Debug)]
pub enum Error {
    Address(address::Error),
    Memory(virtual_memory::Error),
    Validation(validator::Error),
}

impl From<address::Error> for Error {
    fn from(value: address::Error) -> Self {
        Error::Address(value)
    }
}

impl From<virtual_memory::Error> for Error {
    fn from(value: virtual_memory::Error) -> Self {
        Error::Memory(value)
    }
}

impl From<validator::Error> for Error {
    fn from(value: validator::Error) -> Self {
        Error::Validation(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Address(error) => write!(f, "{}", error),
            Error::Memory(error) => write!(f, "{}", error),
            Error::Validation(error) => write!(f, "{}", error),
        }
    }
}

/// Drive the simulation to end-of-stream: translate each reference in
/// arrival order, emit its record on stdout, and finish with the summary
/// statistics. Malformed reference lines are skipped with a diagnostic;
/// anything else is fatal and aborts the stream with partial state
/// discarded.
///
/// A spinner on stderr tracks throughput; records and the summary stay on
/// stdout untouched. When a validation transcript is configured, every
/// record is compared against it and mismatches are reported as they occur.
pub fn run_simulation(config: Config) -> Result<(), Error> {
    let reader = AddressReader::build(&config.file_address)?;
    let mut validation = match &config.file_validation {
        Some(filename) => Some(ValidationReader::build(filename)?),
        None => None,
    };
    let mut memory = VirtualMemory::build(
        SIZE_TLB,
        SIZE_PAGE_TABLE,
        SIZE_FRAME_TABLE,
        SIZE_FRAME,
        &config.file_storage,
    )?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner} {pos} references translated")
            .expect("static template"),
    );

    let mut matched: usize = 0;
    let mut compared: usize = 0;
    for line in reader {
        let reference = match line {
            Ok(reference) => reference,
            Err(error @ address::Error::BadLine { .. }) => {
                progress.println(format!("skipping reference: {}", error));
                continue;
            }
            Err(error) => return Err(error.into()),
        };

        let result = memory.access(reference)?;
        println!("{}", result);

        let mut exhausted = false;
        if let Some(transcript) = validation.as_mut() {
            match transcript.next() {
                Some(Ok(expected)) => {
                    compared += 1;
                    if expected == result {
                        matched += 1;
                    } else {
                        progress.println(format!("expected: {:?}", expected));
                        progress.println(format!("received: {:?}", result));
                    }
                }
                Some(Err(error)) => return Err(error.into()),
                None => {
                    progress.println("validation transcript ended before the reference stream");
                    exhausted = true;
                }
            }
        }
        if exhausted {
            validation = None;
        }

        progress.inc(1);
    }
    progress.finish_and_clear();

    println!("{}", memory.tracker);
    if compared > 0 {
        eprintln!("validated {} of {} translations", matched, compared);
    }
    Ok(())
}
