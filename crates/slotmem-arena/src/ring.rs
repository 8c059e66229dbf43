//! Fixed-capacity circular byte buffer.
//!
//! [`RingBuffer`] keeps a read marker and a write marker into one owned
//! buffer. Writes and reads that cross the end of the buffer are split into
//! two copies. One byte is always left unused so that equal markers mean
//! "empty" and never "full".

use std::error::Error;
use std::fmt;

use slotmem_core::ErrorClass;

/// Errors from [`RingBuffer`] operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingError {
    /// A zero-length read or write.
    EmptyRequest,
    /// Capacity below the minimum of 2 bytes.
    InvalidCapacity {
        /// The requested capacity.
        capacity: usize,
    },
    /// The write does not fit in the free space.
    InsufficientSpace {
        /// Bytes requested.
        requested: usize,
        /// Bytes that can currently be written.
        available: usize,
    },
    /// The read asks for more bytes than are buffered.
    InsufficientData {
        /// Bytes requested.
        requested: usize,
        /// Bytes currently buffered.
        unread: usize,
    },
}

impl RingError {
    /// Which part of the error taxonomy this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidCapacity { .. } => ErrorClass::Configuration,
            Self::InsufficientSpace { .. } | Self::InsufficientData { .. } => {
                ErrorClass::Capacity
            }
            Self::EmptyRequest => ErrorClass::Protocol,
        }
    }
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRequest => write!(f, "ring request of zero bytes"),
            Self::InvalidCapacity { capacity } => {
                write!(f, "ring capacity must be at least 2, got {capacity}")
            }
            Self::InsufficientSpace {
                requested,
                available,
            } => write!(
                f,
                "ring write of {requested} bytes does not fit ({available} free)"
            ),
            Self::InsufficientData { requested, unread } => write!(
                f,
                "ring read of {requested} bytes exceeds {unread} buffered"
            ),
        }
    }
}

impl Error for RingError {}

/// Circular byte buffer with independent read and write markers.
#[derive(Clone, Debug)]
pub struct RingBuffer {
    data: Vec<u8>,
    read: usize,
    write: usize,
}

impl RingBuffer {
    /// Allocate a ring of `capacity` bytes. At most `capacity - 1` bytes
    /// can be buffered at once.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        if capacity < 2 {
            return Err(RingError::InvalidCapacity { capacity });
        }
        Ok(Self {
            data: vec![0; capacity],
            read: 0,
            write: 0,
        })
    }

    /// Size of the backing buffer.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Free space as seen by the write check, including the reserved byte.
    pub fn available(&self) -> usize {
        if self.write >= self.read {
            self.capacity() - (self.write - self.read)
        } else {
            self.read - self.write
        }
    }

    /// Bytes written but not yet read.
    pub fn unread(&self) -> usize {
        if self.write >= self.read {
            self.write - self.read
        } else {
            self.capacity() - self.read + self.write
        }
    }

    /// Whether no bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    /// Append `bytes`. Requires `0 < bytes.len() < available()`.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), RingError> {
        if bytes.is_empty() {
            return Err(RingError::EmptyRequest);
        }
        let available = self.available();
        if bytes.len() >= available {
            return Err(RingError::InsufficientSpace {
                requested: bytes.len(),
                available,
            });
        }
        let first = bytes.len().min(self.capacity() - self.write);
        let (head, tail) = bytes.split_at(first);
        self.data[self.write..self.write + first].copy_from_slice(head);
        self.data[..tail.len()].copy_from_slice(tail);
        self.write = (self.write + bytes.len()) % self.capacity();
        Ok(())
    }

    /// Copy the next `out.len()` buffered bytes into `out` without
    /// consuming them.
    pub fn peek(&self, out: &mut [u8]) -> Result<(), RingError> {
        if out.is_empty() {
            return Err(RingError::EmptyRequest);
        }
        let unread = self.unread();
        if out.len() > unread {
            return Err(RingError::InsufficientData {
                requested: out.len(),
                unread,
            });
        }
        let first = out.len().min(self.capacity() - self.read);
        let (head, tail) = out.split_at_mut(first);
        head.copy_from_slice(&self.data[self.read..self.read + first]);
        tail.copy_from_slice(&self.data[..tail.len()]);
        Ok(())
    }

    /// Copy the next `out.len()` buffered bytes into `out` and consume
    /// them.
    pub fn read(&mut self, out: &mut [u8]) -> Result<(), RingError> {
        self.peek(out)?;
        self.read = (self.read + out.len()) % self.capacity();
        Ok(())
    }

    /// Consume `len` buffered bytes without copying them.
    pub fn discard(&mut self, len: usize) -> Result<(), RingError> {
        if len == 0 {
            return Err(RingError::EmptyRequest);
        }
        let unread = self.unread();
        if len > unread {
            return Err(RingError::InsufficientData {
                requested: len,
                unread,
            });
        }
        self.read = (self.read + len) % self.capacity();
        Ok(())
    }

    /// Drop everything buffered and rewind both markers.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
    }
}
