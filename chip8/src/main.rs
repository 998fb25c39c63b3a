use std::process::ExitCode;

use clap::Parser;
use log::error;

use crate::config::Config;

mod config;
mod keymap;
mod run;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    match run::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("chip8: {}", e);
            ExitCode::FAILURE
        }
    }
}
