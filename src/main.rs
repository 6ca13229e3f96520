mod loader;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use thiserror::Error;
use uvm_core::{Engine, Fault, Outcome};

use loader::LoadError;

/// A Universal Machine interpreter.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a program image: a flat file of big-endian 32-bit words.
    image: PathBuf,
}

/// Everything that can go wrong above the VM itself.
#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("fault at ip {ip:#06x}: {fault}")]
    Fault { ip: u32, fault: Fault },
}

fn init_logging() {
    let truthy = std::env::var("UVM_DEBUG")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false);

    env_logger::Builder::new()
        .filter(None, if truthy { LevelFilter::Debug } else { LevelFilter::Warn })
        .init();
}

fn run(args: Args) -> Result<(), AppError> {
    let program = loader::load(&args.image)?;
    let mut vm = Engine::new(program, io::stdin().lock(), io::stdout().lock());

    match vm.run() {
        Outcome::Halted => Ok(()),
        Outcome::Faulted { ip, fault } => Err(AppError::Fault { ip, fault }),
    }
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("uvm: {err}");
            ExitCode::FAILURE
        }
    }
}
