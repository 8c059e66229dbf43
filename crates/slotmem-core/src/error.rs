//! Error taxonomy shared by every slotmem allocator.
//!
//! Each concrete error type (`ArenaError`, `RingError`, ...) lives beside
//! the allocator that produces it and reports which [`ErrorClass`] it
//! belongs to, so callers can decide between "fix the configuration",
//! "free something and retry", and "this is a bug" without matching on
//! every variant.

use std::fmt;

/// Coarse classification of allocator failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The descriptor or construction parameters are unusable. Fatal at
    /// construction; no partially built allocator is returned.
    Configuration,
    /// A fixed capacity is used up. Recoverable by releasing something.
    Capacity,
    /// The caller broke the usage protocol (wrong order, wrong type,
    /// stale or forged handle, oversized data).
    Protocol,
    /// The backing storage could not be obtained.
    Allocation,
    /// Internal bookkeeping is inconsistent. Indicates corruption.
    Internal,
}

impl ErrorClass {
    /// Whether a caller can reasonably retry after releasing resources.
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::Capacity)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Capacity => write!(f, "capacity"),
            Self::Protocol => write!(f, "protocol"),
            Self::Allocation => write!(f, "allocation"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
