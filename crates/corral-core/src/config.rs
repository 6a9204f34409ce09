//! Growth policies and growable-array configuration.

use crate::error::ConfigError;

/// Rule mapping an array's current capacity to its next capacity.
///
/// Whatever the rule proposes, [`next_capacity`](Self::next_capacity)
/// guarantees forward progress: the result is always at least
/// `current + 1`, so growth from capacity 0 yields 1 under every policy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GrowthPolicy {
    /// `capacity + 1`. Minimal memory, linear reallocation cost.
    Increment,
    /// `capacity + capacity / 2`.
    PlusHalf,
    /// `capacity * 2`.
    #[default]
    Double,
    /// `capacity * factor`, truncated. The factor must be finite and > 1.
    Factor(f32),
}

impl GrowthPolicy {
    /// Capacity to grow to from `current`.
    ///
    /// Returns `None` if the result would overflow `usize`.
    pub fn next_capacity(self, current: usize) -> Option<usize> {
        let proposed = match self {
            Self::Increment => current.checked_add(1)?,
            Self::PlusHalf => current.checked_add(current / 2)?,
            Self::Double => current.checked_mul(2)?,
            Self::Factor(factor) => {
                let scaled = current as f64 * f64::from(factor);
                if !scaled.is_finite() || scaled >= usize::MAX as f64 {
                    return None;
                }
                // Negative factors collapse to 0; the floor below still applies.
                scaled.max(0.0) as usize
            }
        };
        let floor = current.checked_add(1)?;
        Some(proposed.max(floor))
    }

    fn validate(self) -> Result<(), ConfigError> {
        match self {
            Self::Factor(factor) if !factor.is_finite() || factor <= 1.0 => {
                Err(ConfigError::InvalidGrowthFactor { factor })
            }
            _ => Ok(()),
        }
    }
}

/// Construction parameters for a growable array.
///
/// Validated by [`validate()`](Self::validate) before any storage is
/// acquired. The growth policy stays adjustable on the array afterwards;
/// a change only affects the next growth event.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayConfig {
    /// Policy used whenever an append finds the array full.
    ///
    /// Default: [`GrowthPolicy::Double`].
    pub growth: GrowthPolicy,

    /// Capacity reserved at construction, in elements.
    ///
    /// Default: 0 (the buffer is allocated lazily on the first append).
    pub initial_capacity: usize,
}

impl ArrayConfig {
    /// Default growth policy.
    pub const DEFAULT_GROWTH: GrowthPolicy = GrowthPolicy::Double;

    /// Default initial capacity.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 0;

    /// Create a config with the given growth policy and no initial capacity.
    pub fn new(growth: GrowthPolicy) -> Self {
        Self {
            growth,
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
        }
    }

    /// Set the initial capacity.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.growth.validate()?;
        if self.initial_capacity > isize::MAX as usize {
            return Err(ConfigError::CapacityOverflow {
                requested: self.initial_capacity,
            });
        }
        Ok(())
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GROWTH)
    }
}
