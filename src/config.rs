use crate::error::RouterError;
use crate::pool::split_swap::SplitUnit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Search settings for [`crate::router::find_best_split_steps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouterConfig {
    /// Upper bound on the number of candidate paths one order may be
    /// split across. The search is exhaustive, so its cost grows
    /// combinatorially with this value.
    pub max_split_paths: usize,
    /// Granularity of the amount ladders fed to the router.
    pub split_unit: SplitUnit,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_split_paths: 4,
            split_unit: SplitUnit::Five,
        }
    }
}

impl RouterConfig {
    #[inline]
    pub fn with_max_split_paths(mut self, max_split_paths: usize) -> Self {
        self.max_split_paths = max_split_paths;
        self
    }

    #[inline]
    pub fn with_split_unit(mut self, split_unit: SplitUnit) -> Self {
        self.split_unit = split_unit;
        self
    }

    pub fn validate(&self) -> Result<(), RouterError> {
        if self.max_split_paths == 0 {
            return Err(RouterError::InvalidConfig("max_split_paths must be at least 1"));
        }
        Ok(())
    }

    /// Number of rungs every ladder must have under this configuration.
    #[inline]
    pub fn ladder_len(&self) -> usize {
        self.split_unit.ladder_len()
    }
}
