use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};

type Result<T> = std::result::Result<T, Error>;

/// Failure kinds for the backing store, kept separate so the run loop can
/// report which stage of a page load went wrong.
#[derive(Debug)]
pub enum Error {
    Open(io::Error),
    Seek(io::Error),
    Read(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Open(error) => write!(f, "could not open the backing store: {}", error),
            Error::Seek(error) => write!(f, "could not seek in the backing store: {}", error),
            Error::Read(error) => write!(f, "could not read from the backing store: {}", error),
        }
    }
}

/// Read-only random-access view of the backing store file. The simulator
/// never writes back; dirty pages are discarded on eviction.
pub struct Storage(BufReader<File>);

impl Storage {
    pub fn build(filename: &str) -> Result<Self> {
        let file = File::open(filename).map_err(Error::Open)?;
        Ok(Self(BufReader::new(file)))
    }

    /// Seek to `page_number * buffer.len()` and fill the page-sized buffer
    /// exactly. A short read is a read failure.
    pub fn read_page(&mut self, page_number: usize, buffer: &mut [u8]) -> Result<()> {
        let seek_position = SeekFrom::Start((page_number * buffer.len()) as u64);
        self.0.seek(seek_position).map_err(Error::Seek)?;
        self.0.read_exact(buffer).map_err(Error::Read)?;
        Ok(())
    }
}
