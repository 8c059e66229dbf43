//! Fixed-capacity bump allocator over one byte buffer.
//!
//! [`ByteArena`] hands out consecutive byte ranges and only ever frees them
//! all at once with [`ByteArena::clear`]. Unlike a handle arena it has no
//! per-item bookkeeping: callers keep the returned offsets themselves.

/// Bump-allocated byte storage that never grows.
#[derive(Clone, Debug)]
pub struct ByteArena {
    data: Vec<u8>,
    /// Bytes handed out since the last `clear`.
    cursor: usize,
}

impl ByteArena {
    /// Allocate a zeroed buffer of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            cursor: 0,
        }
    }

    /// Reserve `len` bytes.
    ///
    /// Returns the offset of the range and a zeroed mutable slice over it.
    /// Returns `None` for a zero-length request or one that does not fit in
    /// the remaining space.
    pub fn alloc(&mut self, len: usize) -> Option<(usize, &mut [u8])> {
        if len == 0 {
            return None;
        }
        let end = self.cursor.checked_add(len)?;
        if end > self.data.len() {
            return None;
        }
        let start = self.cursor;
        self.cursor = end;
        // Cleared memory is reused, so stale bytes may still be there.
        let slice = &mut self.data[start..end];
        slice.fill(0);
        Some((start, slice))
    }

    /// Copy `bytes` into a fresh range and return its offset.
    pub fn push(&mut self, bytes: &[u8]) -> Option<usize> {
        let (offset, slice) = self.alloc(bytes.len())?;
        slice.copy_from_slice(bytes);
        Some(offset)
    }

    /// Borrow `len` bytes at `offset`, if the range has been handed out.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        if end > self.cursor {
            return None;
        }
        Some(&self.data[offset..end])
    }

    /// Mutably borrow `len` bytes at `offset`, if the range has been handed
    /// out.
    pub fn slice_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        let end = offset.checked_add(len)?;
        if end > self.cursor {
            return None;
        }
        Some(&mut self.data[offset..end])
    }

    /// Forget every allocation. The buffer is kept for reuse.
    pub fn clear(&mut self) {
        self.cursor = 0;
    }

    /// Bytes handed out since the last `clear`.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Size of the backing buffer.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}
