use anyhow::{Context, Result};
use clap::Args;
use riff::process::open_file;
use std::path::PathBuf;
use utils::{ByteSource, bytes_to_hex_space};

#[derive(Args)]
pub struct ShowArgs {
    /// Input RIFF/RIFX file
    pub input: PathBuf,
    /// Chunk position in depth-first order (0 is the outermost chunk)
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,
    /// Payload bytes to dump
    #[arg(short, long, default_value_t = 64)]
    pub bytes: usize,
}

pub fn handle(args: ShowArgs) -> Result<()> {
    let (source, tree) = open_file(&args.input)?;
    let node = tree
        .iter_depth_first()
        .nth(args.index)
        .with_context(|| format!("no chunk at depth-first index {}", args.index))?;

    let (offset, length) = tree.resolve(node);
    println!("{}  range {:#010x}..{:#010x}", node.label(), offset, offset + length);
    println!(
        "declared {} bytes, {} available{}",
        node.declared_size,
        node.effective_size,
        if node.truncated { " (truncated)" } else { "" }
    );

    let dump_len = args.bytes.min(node.effective_size as usize);
    let payload = source.read(node.data_offset, dump_len)?;
    for (i, line) in payload.chunks(16).enumerate() {
        println!(
            "{:#010x}  {}",
            node.data_offset as usize + i * 16,
            bytes_to_hex_space(line)
        );
    }
    Ok(())
}
