use clap::{Parser, Subcommand};

mod commands;
mod logging;

use commands::find::FindArgs;
use commands::show::ShowArgs;
use commands::tree::TreeArgs;

#[derive(Parser)]
#[command(name = "rifftree")]
#[command(about = "RIFF container structure viewer with byte search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the chunk tree of a RIFF/RIFX file
    Tree(TreeArgs),
    /// Search the file bytes for a text/hex/int/float pattern
    Find(FindArgs),
    /// Resolve a chunk to its byte range and hex-dump its payload
    Show(ShowArgs),
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Tree(args) => commands::tree::handle(args),
        Commands::Find(args) => commands::find::handle(args),
        Commands::Show(args) => commands::show::handle(args),
    }
}
