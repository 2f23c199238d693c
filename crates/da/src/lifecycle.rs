//! Lifecycle phases shared by every backend.

use crate::DaError;
use core::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// The phase a client is in. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Phase {
    Uninitialized = 0,
    Initialized = 1,
    Running = 2,
    Stopped = 3,
}

impl Phase {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Uninitialized,
            1 => Self::Initialized,
            2 => Self::Running,
            _ => Self::Stopped,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initialized => write!(f, "initialized"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Lock-free tracker of a client's [Phase].
#[derive(Debug, Default)]
pub struct Lifecycle(AtomicU8);

impl Lifecycle {
    /// Creates a tracker in [Phase::Uninitialized].
    pub const fn new() -> Self {
        Self(AtomicU8::new(Phase::Uninitialized as u8))
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves from `from` to `to`, failing if the client is not in `from`.
    pub fn transition(&self, from: Phase, to: Phase) -> Result<(), DaError> {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|found| DaError::Lifecycle {
                expected: from,
                found: Phase::from_u8(found),
            })
    }

    /// Fails unless the client is in `expected`.
    pub fn ensure(&self, expected: Phase) -> Result<(), DaError> {
        let found = self.phase();
        if found == expected {
            Ok(())
        } else {
            Err(DaError::Lifecycle { expected, found })
        }
    }
}
