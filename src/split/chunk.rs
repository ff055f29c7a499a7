use crate::utils::display_bytes;
use std::fmt::{Display, Formatter};
use std::ops::Range;

/// Splits `[0, size)` into consecutive ranges of at most `chunk_size` bytes.
/// Yields nothing for an empty file.
pub fn byte_range_chunks(size: u64, chunk_size: u64) -> impl ExactSizeIterator<Item = Range<u64>> {
    assert_ne!(chunk_size, 0, "chunk size must be non-zero");
    let count = size.div_ceil(chunk_size) as usize;
    (0..count).map(move |idx| {
        let start = idx as u64 * chunk_size;
        start..(start + chunk_size).min(size)
    })
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Chunk {
    pub index: usize,
    pub byte_range: Range<u64>,
}

impl Chunk {
    pub fn file_name(prefix: &str, index: usize) -> String {
        format!("{prefix}{index}")
    }

    pub fn size(&self) -> u64 {
        self.byte_range.end - self.byte_range.start
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {} [{}..{}) size={:#.1}",
            self.index,
            self.byte_range.start,
            self.byte_range.end,
            display_bytes(self.size())
        )
    }
}
