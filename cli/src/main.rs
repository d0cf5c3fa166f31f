mod commands;
mod terminal;

use commands::{CommandLine, Commands, sweep};

use crate::terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();

    match commands.command {
        Commands::Sweep {
            range,
            workers,
            timeout_ms,
            output,
            quiet,
        } => sweep::sweep(range, workers, timeout_ms, output, quiet).await,
    }
}
