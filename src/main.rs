use clap::Parser;
use paging_sim::config::Config;
use paging_sim::run_simulation;
use std::process;

fn main() {
    let config = Config::parse();
    config.display();
    config.validate();
    if let Err(error) = run_simulation(config) {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}
