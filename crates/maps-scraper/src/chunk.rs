//! Packs display blocks into outbound messages.

/// Default maximum message size, in characters.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 3500;

const SEPARATOR: &str = "\n\n";

/// Join `blocks` with blank lines into messages of at most `max_len`
/// characters.
///
/// Length is only checked at block boundaries: a block is never split, so a
/// single block longer than `max_len` goes out as its own oversized message.
pub fn chunk_blocks<S: AsRef<str>>(blocks: &[S], max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for block in blocks {
        let block = block.as_ref();
        let block_len = block.chars().count();
        let sep_len = if current.is_empty() { 0 } else { SEPARATOR.len() };

        if !current.is_empty() && current_len + sep_len + block_len > max_len {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push_str(SEPARATOR);
            current_len += SEPARATOR.len();
        }
        current.push_str(block);
        current_len += block_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
