use crate::error::{Result, RiffError};
use crate::types::*;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use tracing::debug;
use utils::ByteSource;

const HEADER_LEN: u64 = 8;

fn read_tag<S: ByteSource + ?Sized>(source: &S, offset: u64) -> Result<FourCc> {
    let bytes = source.read(offset, 4)?;
    Ok(FourCc([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_size<S: ByteSource + ?Sized>(source: &S, offset: u64, endian: Endian) -> Result<u32> {
    let bytes = source.read(offset, 4)?;
    Ok(match endian {
        Endian::Little => LittleEndian::read_u32(bytes),
        Endian::Big => BigEndian::read_u32(bytes),
    })
}

/// Build a node from a header read at `offset`, clamping the payload to the
/// enclosing extent `limit` (absolute).
fn make_node(id: FourCc, declared: u32, offset: u64, limit: u64) -> ChunkNode {
    let data_offset = offset + HEADER_LEN;
    let available = limit.saturating_sub(data_offset);
    let effective = (declared as u64).min(available);
    ChunkNode {
        id,
        declared_size: declared,
        offset,
        data_offset,
        effective_size: effective,
        form: None,
        is_container: false,
        truncated: effective < declared as u64 || limit < data_offset,
        children: Vec::new(),
    }
}

struct Frame {
    node: ChunkNode,
    /// Offset of the next child header.
    cursor: u64,
    /// Absolute end of this container's child area (already clamped).
    end: u64,
}

/// Turn a container node into an enumeration frame: consume the 4-byte form
/// tag out of the payload and position the cursor at the first child header.
fn open_container<S: ByteSource + ?Sized>(source: &S, mut node: ChunkNode) -> Result<Frame> {
    node.is_container = true;
    let end = node.data_offset + node.effective_size;
    let cursor = if node.effective_size >= 4 {
        node.form = Some(read_tag(source, node.data_offset)?);
        node.data_offset + 4
    } else {
        // Not even a form tag survived; nothing to enumerate
        end
    };
    Ok(Frame { node, cursor, end })
}

/// Whether a truncated container's remains are still worth enumerating.
///
/// A declared size that overruns the end of the source is ordinary file
/// truncation: earlier children are intact and are recovered. A declared
/// size that overruns only its parent's extent, while more bytes exist in
/// the file, means the framing itself lies, and the interior is not
/// explored.
fn cut_by_source_end(node: &ChunkNode, total: u64) -> bool {
    node.data_offset + node.declared_size as u64 > total
}

/// Parse a RIFF/RIFX stream into a chunk tree.
///
/// The descent uses an explicit frame stack instead of call-stack recursion,
/// so adversarially deep nesting cannot overflow the stack. Only an
/// unrecognized top-level tag is a hard failure; everything deeper degrades
/// to per-node `truncated` markers.
pub fn parse<S: ByteSource + ?Sized>(source: &S) -> Result<ChunkTree> {
    let total = source.len();

    let id = match source.read(0, 4) {
        Ok(bytes) => FourCc([bytes[0], bytes[1], bytes[2], bytes[3]]),
        Err(_) => return Err(RiffError::InvalidFormat(FourCc([0; 4]))),
    };
    if id != RIFF_TAG && id != RIFX_TAG {
        return Err(RiffError::InvalidFormat(id));
    }
    let endian = if id == RIFX_TAG {
        Endian::Big
    } else {
        Endian::Little
    };

    let declared = if total >= HEADER_LEN {
        read_size(source, 4, endian)?
    } else {
        0
    };
    let root = make_node(id, declared, 0, total);
    if root.truncated {
        debug!(
            declared = root.declared_size,
            available = root.effective_size,
            "top-level chunk clamped to source length"
        );
    }

    let mut stack = vec![open_container(source, root)?];

    loop {
        let (cursor, end) = {
            let frame = stack.last().expect("frame stack never empty");
            (frame.cursor, frame.end)
        };

        if cursor + HEADER_LEN <= end {
            let child_id = read_tag(source, cursor)?;
            let child_declared = read_size(source, cursor + 4, endian)?;
            let child = make_node(child_id, child_declared, cursor, end);

            // Advance past the child's framed extent (header + payload +
            // pad byte for odd payloads) before possibly descending.
            let mut next = child.data_offset + child_declared as u64;
            if child_declared % 2 == 1 {
                next += 1;
            }
            stack.last_mut().expect("frame stack never empty").cursor = next;

            if child.truncated {
                debug!(
                    id = %child.id,
                    offset = child.offset,
                    declared = child.declared_size,
                    available = child.effective_size,
                    "chunk declared size exceeds available bytes"
                );
            }

            let descend = child_id.is_container()
                && child.effective_size >= 4
                && (!child.truncated || cut_by_source_end(&child, total));
            if descend {
                stack.push(open_container(source, child)?);
            } else {
                let mut child = child;
                child.is_container = child_id.is_container();
                // keep the form tag for display even when the interior
                // is not explored
                if child.is_container && child.effective_size >= 4 {
                    child.form = Some(read_tag(source, child.data_offset)?);
                }
                stack
                    .last_mut()
                    .expect("frame stack never empty")
                    .node
                    .children
                    .push(child);
            }
        } else {
            // Fewer than 8 bytes left for a header: end of container,
            // trailing padding or garbage is tolerated silently.
            let frame = stack.pop().expect("frame stack never empty");
            match stack.last_mut() {
                Some(parent) => parent.node.children.push(frame.node),
                None => {
                    return Ok(ChunkTree {
                        root: frame.node,
                        source_len: total,
                    });
                }
            }
        }
    }
}
