//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default capacity of each metadata cache map.
pub const DEFAULT_CACHE_SIZE: usize = 1024;

/// Default limit on nested lists, maps and objects.
pub const DEFAULT_MAX_DEPTH: usize = 256;

// -----------------------------------------------------------------------------
// Resolution

/// Which rule set applies to a field when both a type-level rule set and
/// one inherited from an enclosing object are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Rules attached to the object's type win; paths restart at that type.
    #[default]
    TypeFirst,
    /// Rules inherited along the path win; type rules are the fallback.
    PathFirst,
}

// -----------------------------------------------------------------------------
// Inclusion

/// Whether properties with a null value are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inclusion {
    #[default]
    Always,
    NonNull,
}

// -----------------------------------------------------------------------------
// ViewConfig

/// Settings of a [`ViewEngine`](crate::ViewEngine).
///
/// Missing keys take their defaults when deserialized.
///
/// # Examples
///
/// ```
/// use jv_view::{Inclusion, Resolution, ViewConfig};
///
/// let config: ViewConfig = serde_json::from_str(r#"{ "resolution": "path_first" }"#).unwrap();
///
/// assert_eq!(config.resolution, Resolution::PathFirst);
/// assert_eq!(config.inclusion, Inclusion::Always);
/// assert_eq!(config, ViewConfig::default().with_resolution(Resolution::PathFirst));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Default resolution order; a [`View`](crate::View) may override it.
    pub resolution: Resolution,
    /// Null policy for types and fields without their own.
    pub inclusion: Inclusion,
    /// Capacity of each metadata cache map.
    pub cache_size: usize,
    /// Limit on nested lists, maps and objects.
    pub max_depth: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::TypeFirst,
            inclusion: Inclusion::Always,
            cache_size: DEFAULT_CACHE_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ViewConfig {
    #[inline]
    pub fn with_resolution(self, resolution: Resolution) -> Self {
        Self { resolution, ..self }
    }

    #[inline]
    pub fn with_inclusion(self, inclusion: Inclusion) -> Self {
        Self { inclusion, ..self }
    }

    #[inline]
    pub fn with_cache_size(self, cache_size: usize) -> Self {
        Self { cache_size, ..self }
    }

    #[inline]
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }
}
