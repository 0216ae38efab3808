use clap::Parser;
use crosstrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
