// CLI module
// Command-line arguments and the interactive console

mod args;
mod console;

pub use args::CliArgs;
pub use console::Console;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits the
/// process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
