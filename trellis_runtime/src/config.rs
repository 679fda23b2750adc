//! Transition table configuration.
//!
//! Limits and growth parameters for transition arrays. The defaults match the
//! sizes engines commonly settle on; hosts with tight memory budgets can use
//! [`TransitionConfig::compact`].

use thiserror::Error;

/// Configuration for shape transition tables.
///
/// # Example
///
/// ```ignore
/// use trellis_runtime::TransitionConfig;
///
/// let config = TransitionConfig {
///     max_cached_prototype_transitions: 0, // never cache prototype changes
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionConfig {
    /// Maximum number of live edges a single shape may have.
    ///
    /// Counts property and special edges; prototype transitions live in their
    /// own cache. Once reached, further insertions fail with
    /// `TransitionError::TooManyTransitions` and the caller is expected to
    /// fall back to dictionary mode.
    ///
    /// Default: 1536
    pub max_transitions: usize,

    /// Maximum number of cached prototype transitions per shape.
    ///
    /// When the cache is full, cleared entries are compacted away; if it is
    /// still full the new transition is simply not cached. 0 disables caching.
    ///
    /// Default: 256
    pub max_cached_prototype_transitions: usize,

    /// Capacity of a freshly promoted transition array.
    ///
    /// Promotion always holds two edges, so this must be at least 2. Growth
    /// doubles from here.
    ///
    /// Default: 2
    pub initial_array_capacity: usize,

    /// Maximum number of properties along one shape chain.
    ///
    /// Adding a property to a shape that already has this many fails with
    /// `TransitionError::TooManyProperties`. Must fit in a `u16` slot index.
    ///
    /// Default: 1020
    pub max_properties: usize,

    /// Re-check array sortedness after every insertion.
    ///
    /// Default: true in debug builds
    pub verify_sorted: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            max_transitions: 1536,
            max_cached_prototype_transitions: 256,
            initial_array_capacity: 2,
            max_properties: 1020,
            verify_sorted: cfg!(debug_assertions),
        }
    }
}

impl TransitionConfig {
    /// Create a configuration with small limits for memory-constrained hosts.
    pub fn compact() -> Self {
        Self {
            max_transitions: 256,
            max_cached_prototype_transitions: 16,
            ..Default::default()
        }
    }

    /// Create a configuration with tiny limits and verification always on.
    ///
    /// Makes limit and overflow paths reachable with a handful of shapes.
    pub fn testing() -> Self {
        Self {
            max_transitions: 8,
            max_cached_prototype_transitions: 4,
            initial_array_capacity: 2,
            max_properties: 16,
            verify_sorted: true,
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_transitions == 0 {
            return Err(ConfigError::MaxTransitionsZero);
        }
        if self.initial_array_capacity < 2 {
            return Err(ConfigError::InitialCapacityTooSmall(
                self.initial_array_capacity,
            ));
        }
        if self.initial_array_capacity > self.max_transitions {
            return Err(ConfigError::CapacityExceedsLimit {
                capacity: self.initial_array_capacity,
                limit: self.max_transitions,
            });
        }
        if self.max_properties == 0 || self.max_properties > MAX_PROPERTIES_LIMIT {
            return Err(ConfigError::MaxPropertiesOutOfRange(self.max_properties));
        }
        Ok(())
    }
}

/// Largest `max_properties` a slot index can address.
pub const MAX_PROPERTIES_LIMIT: usize = u16::MAX as usize;

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A shape must be allowed at least one transition.
    #[error("max_transitions must be at least 1")]
    MaxTransitionsZero,
    /// Promoted arrays hold two edges from the start.
    #[error("initial array capacity must be at least 2, got {0}")]
    InitialCapacityTooSmall(usize),
    /// The first array would already exceed the per-shape limit.
    #[error("initial array capacity {capacity} exceeds max_transitions {limit}")]
    CapacityExceedsLimit {
        /// Requested initial capacity.
        capacity: usize,
        /// Configured per-shape limit.
        limit: usize,
    },
    /// The property limit is zero or does not fit a slot index.
    #[error("max_properties must be between 1 and {MAX_PROPERTIES_LIMIT}, got {0}")]
    MaxPropertiesOutOfRange(usize),
}
