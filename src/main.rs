use clap::Parser;
use balancewheel::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
