use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Four-character chunk tag, kept as raw bytes for exactness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

pub const RIFF_TAG: FourCc = FourCc(*b"RIFF");
pub const RIFX_TAG: FourCc = FourCc(*b"RIFX");
pub const LIST_TAG: FourCc = FourCc(*b"LIST");

impl FourCc {
    /// Container tags whose payload is a form tag followed by sub-chunks.
    pub fn is_container(&self) -> bool {
        *self == RIFF_TAG || *self == RIFX_TAG || *self == LIST_TAG
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            // Non-printable tag bytes show as '.' like a hex dump gutter
            let c = if (0x20..0x7f).contains(&b) { b as char } else { '.' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl Serialize for FourCc {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Byte-order of the size fields, selected by the top-level tag only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Endian {
    Little,
    Big,
}

/// One parsed chunk occurrence. Offsets are absolute into the source.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkNode {
    pub id: FourCc,
    /// Size field as read from the header; may exceed the available bytes.
    pub declared_size: u32,
    /// Absolute offset of the chunk header.
    pub offset: u64,
    /// Absolute offset where the payload begins (header + 8).
    pub data_offset: u64,
    /// Payload length clamped to the bytes actually available.
    pub effective_size: u64,
    /// Form tag, present on container chunks with at least 4 payload bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<FourCc>,
    pub is_container: bool,
    /// Set when `declared_size` runs past the end of the available bytes.
    pub truncated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChunkNode>,
}

impl ChunkNode {
    /// Display label: `RIFF(WAVE)` / `LIST(INFO)` for containers, bare tag
    /// for leaf chunks.
    pub fn label(&self) -> String {
        match self.form {
            Some(form) => format!("{}({})", self.id, form),
            None => self.id.to_string(),
        }
    }
}

/// One row of the three-column tree view model.
#[derive(Debug, Clone, Serialize)]
pub struct TreeRow {
    pub depth: usize,
    pub label: String,
    pub offset: u64,
    pub size: u64,
    pub truncated: bool,
}

/// Parsed chunk hierarchy. Immutable after construction; rebuilt from
/// scratch whenever a new file is opened.
#[derive(Debug, Serialize)]
pub struct ChunkTree {
    pub root: ChunkNode,
    pub source_len: u64,
}

impl ChunkTree {
    /// Absolute framed byte range of a node: header + payload + pad byte,
    /// clamped to the source length. Suitable for hex-view highlighting.
    pub fn resolve(&self, node: &ChunkNode) -> (u64, u64) {
        let mut end = node.data_offset + node.effective_size;
        // The pad byte only exists when the declared payload is intact
        if !node.truncated && node.declared_size % 2 == 1 && end < self.source_len {
            end += 1;
        }
        // A header cut by end-of-source leaves data_offset past the end;
        // the framed range never extends beyond the bytes that exist.
        let end = end.min(self.source_len).max(node.offset);
        (node.offset, end - node.offset)
    }

    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: vec![&self.root],
        }
    }

    pub fn iter_breadth_first(&self) -> BreadthFirst<'_> {
        BreadthFirst {
            queue: VecDeque::from([&self.root]),
        }
    }

    /// Flattened three-column view model rows in depth-first order.
    pub fn rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            rows.push(TreeRow {
                depth,
                label: node.label(),
                offset: node.offset,
                size: node.effective_size,
                truncated: node.truncated,
            });
            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        rows
    }
}

pub struct DepthFirst<'a> {
    stack: Vec<&'a ChunkNode>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a ChunkNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

pub struct BreadthFirst<'a> {
    queue: VecDeque<&'a ChunkNode>,
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = &'a ChunkNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children.iter());
        Some(node)
    }
}
