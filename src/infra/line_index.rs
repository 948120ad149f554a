//! Newline index for byte offset -> line mapping.
//!
//! Used to point diagnostics at the line where a scan went wrong. The input
//! buffer is never modified; the index only records '\n' positions.
//!
//! Notes
//! - An empty buffer maps every offset to line 0.
//! - A non-empty buffer without '\n' is all line 1.

#[derive(Debug, Clone)]
pub struct NewlineIndex {
    /// Byte positions of every '\n' in the buffer.
    nl_positions: Vec<usize>,
    /// Total byte length of the buffer.
    len: usize,
}

impl NewlineIndex {
    /// Build an index recording positions of '\n'.
    pub fn build(bytes: &[u8]) -> Self {
        let nl_positions: Vec<usize> = memchr::memchr_iter(b'\n', bytes).collect();

        Self {
            nl_positions,
            len: bytes.len(),
        }
    }

    /// 1-based line number covering the given byte offset.
    /// Offsets at '\n' belong to the line the '\n' terminates.
    /// Returns 0 for empty buffers.
    pub fn line_of_byte(&self, byte: usize) -> usize {
        if self.len == 0 {
            return 0;
        }
        // Number of '\n' strictly before `byte`
        let before = self.nl_positions.partition_point(|&nl| nl < byte);
        before + 1
    }
}
