use clap::Parser;
use ma_backtest::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
