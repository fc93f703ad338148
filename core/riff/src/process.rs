use crate::error::{Result, RiffError};
use crate::reader::parse;
use crate::types::ChunkTree;
use std::path::Path;
use tracing::info;
use utils::{ByteSource, MappedSource};

/// Map a file read-only and parse it into a chunk tree.
///
/// The returned source outlives the tree so callers can keep reading payload
/// bytes (hex view, search) without copying them.
pub fn open_file(path: &Path) -> Result<(MappedSource, ChunkTree)> {
    let source = MappedSource::open(path)?;
    match parse(&source) {
        Ok(tree) => {
            info!(
                path = %path.display(),
                len = source.len(),
                chunks = tree.iter_depth_first().count(),
                "parsed RIFF file"
            );
            Ok((source, tree))
        }
        Err(RiffError::InvalidFormat(_)) => Err(RiffError::NotRiff(path.display().to_string())),
        Err(e) => Err(e),
    }
}
