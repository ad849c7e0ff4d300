//! Value Objects for Peer Diversity

use crate::domain::DiversityError;

/// Limits for the bundled `GroupLimitPolicy`.
///
/// # Security Notes
///
/// - `max_per_cpl`: How many group entries (one per admitted address) one IP
///   group may hold inside a single CPL bucket. Keeps one operator from
///   owning a bucket.
///
/// - `max_for_table`: How many group entries one IP group may hold across
///   the whole routing table. Keeps one operator from surrounding us across
///   buckets (eclipse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiversityConfig {
    /// Max entries per IP group per CPL bucket (default: 2)
    pub max_per_cpl: usize,
    /// Max entries per IP group in the whole table (default: 3)
    pub max_for_table: usize,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            max_per_cpl: 2,
            max_for_table: 3,
        }
    }
}

impl DiversityConfig {
    /// Create a config with explicit limits.
    pub fn new(max_per_cpl: usize, max_for_table: usize) -> Self {
        Self {
            max_per_cpl,
            max_for_table,
        }
    }

    /// Create a config suitable for testing (one slot per bucket, two per table)
    pub fn for_testing() -> Self {
        Self {
            max_per_cpl: 1,
            max_for_table: 2,
        }
    }

    /// Reject limits that would admit nobody or make the table limit moot.
    pub fn validate(&self) -> Result<(), DiversityError> {
        if self.max_per_cpl == 0 || self.max_for_table == 0 {
            return Err(DiversityError::Configuration(
                "diversity limits must be non-zero".to_string(),
            ));
        }
        if self.max_per_cpl > self.max_for_table {
            return Err(DiversityError::Configuration(format!(
                "max_per_cpl ({}) exceeds max_for_table ({})",
                self.max_per_cpl, self.max_for_table
            )));
        }
        Ok(())
    }
}
