use anyhow::Result;
use clap::Args;
use riff::process::open_file;
use std::path::PathBuf;

#[derive(Args)]
pub struct TreeArgs {
    /// Input RIFF/RIFX file
    pub input: PathBuf,
    /// Emit the tree as JSON instead of columns
    #[arg(long)]
    pub json: bool,
}

pub fn handle(args: TreeArgs) -> Result<()> {
    let (_source, tree) = open_file(&args.input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    println!("{:<40} {:>12} {:>12}", "Chunk", "Offset", "Size");
    for row in tree.rows() {
        let label = format!("{}{}", "  ".repeat(row.depth), row.label);
        let marker = if row.truncated { " (truncated)" } else { "" };
        println!(
            "{:<40} {:>12} {:>12}{}",
            label, row.offset, row.size, marker
        );
    }
    Ok(())
}
