use crate::virtual_memory::AccessResult;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    BadRecord { line_number: u64, content: String },
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
            Error::BadRecord {
                line_number,
                content,
            } => write!(
                f,
                "validation line {}: '{}' is not a translation record",
                line_number, content
            ),
            Error::Io(error) => write!(f, "validation stream: {}", error),
        }
    }
}

/// One line of a reference transcript, in the same shape the simulator
/// emits. Comparing a run against a known-good transcript catches
/// regressions in the translation path without reasoning about cache state.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidationEntry {
    pub virtual_address: u16,
    pub physical_address: u16,
    pub value: i8,
}

impl ValidationEntry {
    pub fn parse(line: &str) -> Option<Self> {
        let tokens: Vec<&str> = line.split_ascii_whitespace().collect();
        match tokens.as_slice() {
            ["Virtual", "address:", virtual_address, "Physical", "address:", physical_address, "Value:", value] => {
                Some(Self {
                    virtual_address: virtual_address.parse().ok()?,
                    physical_address: physical_address.parse().ok()?,
                    value: value.parse().ok()?,
                })
            }
            _ => None,
        }
    }
}

impl PartialEq<AccessResult> for ValidationEntry {
    fn eq(&self, other: &AccessResult) -> bool {
        self.virtual_address == u16::from(other.virtual_address)
            && self.physical_address == other.physical_address
            && self.value == other.value
    }
}

/// Line-oriented reader over a reference transcript.
pub struct ValidationReader {
    reader: BufReader<File>,
    pub line_number: u64,
}

impl ValidationReader {
    pub fn build(filename: &str) -> Result<Self> {
        let file = File::open(filename)?;
        Ok(Self {
            reader: BufReader::new(file),
            line_number: 0,
        })
    }
}

impl Iterator for ValidationReader {
    type Item = Result<ValidationEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buffer = String::new();
        match self.reader.read_line(&mut buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                match ValidationEntry::parse(&buffer) {
                    Some(entry) => Some(Ok(entry)),
                    None => Some(Err(Error::BadRecord {
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
    use crate::address::VirtualAddress;

    #[cfg(test)]
    mod validation_entry_tests {

        use super::*;

        #[test]
        fn parse() {
            let entry =
                ValidationEntry::parse("Virtual address: 16916 Physical address: 20 Value: 0\n")
                    .unwrap();
            assert_eq!(
                entry,
                ValidationEntry {
                    virtual_address: 16916,
                    physical_address: 20,
                    value: 0,
                }
            );
        }

        #[test]
        fn parse_negative_value() {
            let entry =
                ValidationEntry::parse("Virtual address: 12107 Physical address: 2635 Value: -46")
                    .unwrap();
            assert_eq!(entry.value, -46);
        }

        #[test]
        fn parse_rejects_other_shapes() {
            assert_eq!(ValidationEntry::parse(""), None);
            assert_eq!(ValidationEntry::parse("16916 20 0"), None);
            assert_eq!(
                ValidationEntry::parse("Virtual address: x Physical address: 20 Value: 0"),
                None
            );
            assert_eq!(
                ValidationEntry::parse("Virtual address: 1 Physical address: 2 Value: 3 extra"),
                None
            );
        }

        #[test]
        fn compares_against_access_results() {
            let entry = ValidationEntry {
                virtual_address: 300,
                physical_address: 44,
                value: 44,
            };
            let result = AccessResult {
                virtual_address: VirtualAddress::from(300),
                physical_address: 44,
                value: 44,
            };
            assert!(entry == result);

            let off_by_one = AccessResult {
                physical_address: 45,
                ..result
            };
            assert!(entry != off_by_one);
        }
    }

    #[cfg(test)]
    mod validation_reader_tests {

        use super::*;
        use std::path::PathBuf;

        fn stage_transcript(tag: &str, content: &str) -> PathBuf {
            let path = std::env::temp_dir().join(format!(
                "paging_sim_transcript_{}_{}",
                std::process::id(),
                tag
            ));
            std::fs::write(&path, content).expect("transcript fixture");
            path
        }

        #[test]
        fn iterator() {
            let path = stage_transcript(
                "basic",
                "Virtual address: 1 Physical address: 1 Value: 1\n\
                 garbage\n\
                 Virtual address: 2 Physical address: 2 Value: 2\n",
            );
            let mut reader = ValidationReader::build(path.to_str().unwrap()).unwrap();

            assert_eq!(
                reader.next().unwrap().unwrap(),
                ValidationEntry {
                    virtual_address: 1,
                    physical_address: 1,
                    value: 1,
                }
            );
            assert!(matches!(
                reader.next().unwrap(),
                Err(Error::BadRecord { line_number: 2, .. })
            ));
            assert!(reader.next().unwrap().is_ok());
            assert!(reader.next().is_none());

            let _ = std::fs::remove_file(&path);
        }
    }
}
