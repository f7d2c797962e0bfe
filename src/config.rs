use clap::Parser;
use std::env;
use std::path::Path;
use std::process;

/// Runtime configuration: the input file locations. Flags override
/// environment variables, which override the stock file names. Simulator
/// geometry is fixed at compile time (see the crate-level constants).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = env_or_default_str("SIM_FILE_STORAGE", "BACKING_STORE.bin"))]
    pub file_storage: String,

    #[arg(long, default_value_t = env_or_default_str("SIM_FILE_ADDRESS", "addresses.txt"))]
    pub file_address: String,

    /// Reference transcript to compare the run against, if any.
    #[arg(long)]
    pub file_validation: Option<String>,
}

impl Config {
    pub fn display(&self) {
        eprintln!("simulation configuration: {:?}", self);
    }

    /// Refuse to start without the input files; the simulator proper is
    /// never constructed when they are missing.
    pub fn validate(&self) {
        let mut required = vec![&self.file_address, &self.file_storage];
        if let Some(file_validation) = &self.file_validation {
            required.push(file_validation);
        }
        for filename in required {
            if !Path::new(filename).is_file() {
                eprintln!("error: could not open file: '{}'", filename);
                process::exit(1);
            }
        }
    }
}

fn env_or_default_str(varname: &str, default: &str) -> String {
    match env::var(varname) {
        Ok(val) => val,
        _ => String::from(default),
    }
}
