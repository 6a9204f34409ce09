//! Allocation and configuration error types.

use std::alloc::Layout;
use std::error::Error;
use std::fmt;

/// Errors that can occur while acquiring storage.
///
/// Both variants leave the requesting container in its pre-operation
/// state: storage is never released before its replacement exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The memory source could not satisfy the request.
    OutOfMemory {
        /// The layout that was requested.
        layout: Layout,
    },
    /// The element count does not fit in a valid layout
    /// (its byte size overflows `isize::MAX`).
    CapacityOverflow,
}

impl AllocError {
    /// Escalate the error to the fatal allocation path.
    ///
    /// Out-of-memory is forwarded to [`std::alloc::handle_alloc_error`];
    /// capacity overflow panics, matching the standard collections.
    #[cold]
    #[track_caller]
    pub fn handle(self) -> ! {
        match self {
            Self::OutOfMemory { layout } => {
                tracing::warn!(
                    size = layout.size(),
                    align = layout.align(),
                    "storage allocation failed"
                );
                std::alloc::handle_alloc_error(layout)
            }
            Self::CapacityOverflow => panic!("capacity overflow"),
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { layout } => {
                write!(
                    f,
                    "out of memory: requested {} bytes (align {})",
                    layout.size(),
                    layout.align()
                )
            }
            Self::CapacityOverflow => write!(f, "capacity overflow"),
        }
    }
}

impl Error for AllocError {}

/// Errors detected by [`ArrayConfig::validate()`](crate::ArrayConfig::validate).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A [`GrowthPolicy::Factor`](crate::GrowthPolicy::Factor) that is NaN,
    /// infinite, or not greater than 1.
    InvalidGrowthFactor {
        /// The rejected factor.
        factor: f32,
    },
    /// The initial capacity exceeds `isize::MAX` elements.
    CapacityOverflow {
        /// The requested capacity.
        requested: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrowthFactor { factor } => {
                write!(f, "growth factor {factor} must be finite and greater than 1")
            }
            Self::CapacityOverflow { requested } => {
                write!(f, "initial capacity {requested} exceeds isize::MAX")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_memory_reports_layout() {
        let layout = Layout::array::<u64>(4).unwrap();
        let err = AllocError::OutOfMemory { layout };
        assert_eq!(err.to_string(), "out of memory: requested 32 bytes (align 8)");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidGrowthFactor { factor: 0.5 };
        assert_eq!(
            err.to_string(),
            "growth factor 0.5 must be finite and greater than 1"
        );
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn capacity_overflow_handle_panics() {
        AllocError::CapacityOverflow.handle();
    }
}
