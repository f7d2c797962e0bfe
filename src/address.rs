use crate::{MASK_OFFSET, MASK_PAGE};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    BadLine { line_number: u64, content: String },
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadLine {
                line_number,
                content,
            } => write!(
                f,
                "line {}: could not convert '{}' to a memory reference",
                line_number, content
            ),
            Error::Io(error) => write!(f, "reference stream: {}", error),
        }
    }
}

/// A 16-bit virtual address split into its page number and page offset. The
/// decomposition is total: every 16-bit value is a legal reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub number_page: u8,
    pub number_offset: u8,
}

impl From<u16> for VirtualAddress {
    fn from(value: u16) -> Self {
        Self {
            number_page: ((value & MASK_PAGE) >> 8) as u8,
            number_offset: (value & MASK_OFFSET) as u8,
        }
    }
}

impl From<VirtualAddress> for u16 {
    fn from(address: VirtualAddress) -> Self {
        ((address.number_page as u16) << 8) | address.number_offset as u16
    }
}

/// A single decoded line of the reference stream: the address requested and
/// whether the access writes to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub address: VirtualAddress,
    pub is_write: bool,
}

impl Reference {
    /// Decode one line of the reference stream. The leading token must be
    /// decimal digits forming an unsigned 16-bit value; an optional trailing
    /// single-letter tag marks the access kind, where `W` means write and
    /// any other letter reads. Returns `None` for anything else.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_ascii_whitespace();
        let digits = tokens.next()?;
        let is_write = match (tokens.next(), tokens.next()) {
            (None, _) => false,
            (Some(tag), None) if tag.len() == 1 && tag.bytes().all(|b| b.is_ascii_alphabetic()) => {
                tag == "W"
            }
            _ => return None,
        };

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value = digits.parse::<u16>().ok()?;
        Some(Self {
            address: VirtualAddress::from(value),
            is_write,
        })
    }
}

/// Line-oriented reader over the reference-stream file. Malformed lines are
/// reported with their line number so the caller can skip them and continue.
pub struct AddressReader {
    reader: BufReader<File>,
    pub line_number: u64,
}

impl AddressReader {
    pub fn build(filename: &str) -> Result<Self> {
        let file = File::open(filename)?;
        Ok(Self {
            reader: BufReader::new(file),
            line_number: 0,
        })
    }
}

impl Iterator for AddressReader {
    type Item = Result<Reference>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buffer = String::new();
        match self.reader.read_line(&mut buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                match Reference::parse(&buffer) {
                    Some(reference) => Some(Ok(reference)),
                    None => Some(Err(Error::BadLine {
                        line_number: self.line_number,
                        content: buffer.trim_end().to_string(),
                    })),
                }
            }
            Err(error) => Some(Err(Error::Io(error))),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[cfg(test)]
    mod address_tests {

        use super::*;

        #[test]
        fn from() {
            let address = VirtualAddress::from(0x1234);
            assert_eq!(address.number_page, 0x12);
            assert_eq!(address.number_offset, 0x34);
        }

        #[test]
        fn into() {
            let original: u16 = 16916;
            let address = VirtualAddress::from(original);
            assert_eq!(u16::from(address), original);
        }

        #[test]
        fn decomposition_is_total() {
            for value in [0u16, 1, 255, 256, 32767, 65535] {
                let address = VirtualAddress::from(value);
                assert_eq!(
                    value,
                    (address.number_page as u16) * 256 + address.number_offset as u16
                );
            }
        }
    }

    #[cfg(test)]
    mod reference_tests {

        use super::*;

        #[test]
        fn parse_plain_read() {
            let reference = Reference::parse("16916").unwrap();
            assert_eq!(reference.address, VirtualAddress::from(16916));
            assert!(!reference.is_write);
        }

        #[test]
        fn parse_write_tag() {
            let reference = Reference::parse("256 W\n").unwrap();
            assert_eq!(reference.address, VirtualAddress::from(256));
            assert!(reference.is_write);
        }

        #[test]
        fn parse_other_letters_read() {
            assert!(!Reference::parse("256 R").unwrap().is_write);
            assert!(!Reference::parse("256 w").unwrap().is_write);
        }

        #[test]
        fn parse_tolerates_surrounding_whitespace() {
            let reference = Reference::parse("  42 W  \r\n").unwrap();
            assert_eq!(reference.address, VirtualAddress::from(42));
            assert!(reference.is_write);
        }

        #[test]
        fn parse_rejects_garbage() {
            assert_eq!(Reference::parse(""), None);
            assert_eq!(Reference::parse("\n"), None);
            assert_eq!(Reference::parse("abc"), None);
            assert_eq!(Reference::parse("12a4"), None);
            assert_eq!(Reference::parse("-12"), None);
            assert_eq!(Reference::parse("65536"), None);
            assert_eq!(Reference::parse("12 WW"), None);
            assert_eq!(Reference::parse("12 W extra"), None);
            assert_eq!(Reference::parse("12 9"), None);
        }
    }

    #[cfg(test)]
    mod address_reader_tests {

        use super::*;
        use std::path::PathBuf;

        fn stage_stream(tag: &str, content: &str) -> PathBuf {
            let path = std::env::temp_dir().join(format!(
                "paging_sim_addresses_{}_{}",
                std::process::id(),
                tag
            ));
            std::fs::write(&path, content).expect("reference stream fixture");
            path
        }

        #[test]
        fn build_missing_file() {
            assert!(matches!(
                AddressReader::build("no-such-reference-stream.txt"),
                Err(Error::Io(_))
            ));
        }

        #[test]
        fn iterator_reports_bad_lines_and_continues() {
            let path = stage_stream("mixed", "0\n256 W\nnonsense\n257 R\n");
            let mut reader = AddressReader::build(path.to_str().unwrap()).unwrap();

            assert_eq!(
                reader.next().unwrap().unwrap(),
                Reference {
                    address: VirtualAddress::from(0),
                    is_write: false
                }
            );
            assert_eq!(
                reader.next().unwrap().unwrap(),
                Reference {
                    address: VirtualAddress::from(256),
                    is_write: true
                }
            );
            match reader.next().unwrap() {
                Err(Error::BadLine {
                    line_number,
                    content,
                }) => {
                    assert_eq!(line_number, 3);
                    assert_eq!(content, "nonsense");
                }
                other => panic!("expected a bad line, got {:?}", other),
            }
            assert_eq!(
                reader.next().unwrap().unwrap(),
                Reference {
                    address: VirtualAddress::from(257),
                    is_write: false
                }
            );
            assert!(reader.next().is_none());
            assert_eq!(reader.line_number, 4);

            let _ = std::fs::remove_file(&path);
        }
    }
}
