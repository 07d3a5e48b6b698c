//! `twitch-client`: exercise the Twitch API client from the command line.
//!
//! ```text
//! twitch-client --client-id <ID> channel twitch
//! twitch-client -v followers 42 --limit 5
//! ```
//!
//! Results go to stdout as pretty JSON; logs go to stderr.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    cli.run()
}
