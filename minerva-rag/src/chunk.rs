//! Document chunking for the vector index.

use minerva_core::IndexError;

/// Separator hierarchy for recursive splitting, coarse to fine.
const SEPARATORS: [&str; 3] = ["\n\n", ". ", " "];

/// One contiguous piece of a source document.
///
/// Offsets are character positions into the chunked text. Chunks are
/// immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub chunk_index: usize,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Split `text` into overlapping chunks of at most `chunk_size` characters.
///
/// Splitting is recursive: paragraphs first, then sentences, then words,
/// falling back to a raw character window for text with no separators at
/// all. Parts are accumulated until adding the next one would exceed
/// `chunk_size`; each new chunk restarts with the last `overlap` characters
/// of the previous one so sentences straddling a boundary stay retrievable.
/// A part longer than `chunk_size` on its own is split at the next finer
/// level. The final chunk may be shorter than `chunk_size`.
///
/// Blank input (after trimming) is an `IndexError::EmptyDocument`.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>, IndexError> {
    if text.trim().is_empty() {
        return Err(IndexError::EmptyDocument);
    }
    let parts = split_recursive(text, chunk_size, 0);
    Ok(assemble(&parts, chunk_size, overlap))
}

/// Split text into pieces each at most `chunk_size` characters, using the
/// separator at `level` and recursing into finer levels for oversize parts.
fn split_recursive(text: &str, chunk_size: usize, level: usize) -> Vec<String> {
    if text.chars().count() <= chunk_size {
        return vec![text.to_string()];
    }
    if level >= SEPARATORS.len() {
        // No separators left: raw character windows.
        let chars: Vec<char> = text.chars().collect();
        return chars
            .chunks(chunk_size)
            .map(|w| w.iter().collect())
            .collect();
    }

    let sep = SEPARATORS[level];
    let mut out = Vec::new();
    for part in text.split(sep) {
        if part.is_empty() {
            continue;
        }
        if part.chars().count() > chunk_size {
            out.extend(split_recursive(part, chunk_size, level + 1));
        } else {
            out.push(part.to_string());
        }
    }
    if out.is_empty() {
        out.push(text.to_string());
    }
    out
}

/// Accumulate pre-split parts into chunks with overlap carry-over.
fn assemble(parts: &[String], chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut start_offset = 0usize;
    let mut idx = 0usize;

    let mut push_chunk = |current: &mut String, start_offset: &mut usize, idx: &mut usize| {
        let text = current.trim().to_string();
        if text.is_empty() {
            return;
        }
        let len = current.chars().count();
        chunks.push(Chunk {
            text,
            chunk_index: *idx,
            start_offset: *start_offset,
            end_offset: *start_offset + len,
        });
        *idx += 1;

        // Carry the tail of this chunk into the next one.
        let carried: String = if len > overlap {
            let skip = len - overlap;
            current.chars().skip(skip).collect()
        } else {
            String::new()
        };
        *start_offset += len - carried.chars().count();
        *current = carried;
    };

    for part in parts {
        let part_len = part.chars().count();
        let current_len = current.chars().count();
        if !current.is_empty() && current_len + part_len + 1 > chunk_size {
            push_chunk(&mut current, &mut start_offset, &mut idx);
            // The carried tail may leave no room for a near-full part.
            let carried_len = current.chars().count();
            if carried_len + part_len + 1 > chunk_size {
                start_offset += carried_len;
                current.clear();
            }
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(part);
    }
    push_chunk(&mut current, &mut start_offset, &mut idx);

    chunks
}
