use serde::{Deserialize, Serialize};

use crate::error::{FieldError, ValidationError};

pub const DEFAULT_CORE_TYPE: &str = "emerald_max";

/// Compute resources requested for every analysis of a job.
///
/// Serializes with the platform's field names (`coreType`, `coresPerSlot`,
/// `slots`). The per-core-type ceiling is enforced by the platform when the
/// job is created; only the shape is checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hardware {
    #[serde(alias = "core_type")]
    pub core_type: String,
    #[serde(alias = "cores_per_slot")]
    pub cores_per_slot: i64,
    pub slots: i64,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            core_type: DEFAULT_CORE_TYPE.to_string(),
            cores_per_slot: 1,
            slots: 1,
        }
    }
}

impl Hardware {
    pub fn new(core_type: impl Into<String>, cores_per_slot: i64, slots: i64) -> Self {
        Self {
            core_type: core_type.into(),
            cores_per_slot,
            slots,
        }
    }

    pub fn total_cores(&self) -> i64 {
        self.cores_per_slot.saturating_mul(self.slots)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        self.collect_errors("hardware", &mut errors);
        ValidationError::check(errors)
    }

    /// Push one [`FieldError`] per failing attribute, prefixed with `field`.
    pub fn collect_errors(&self, field: &str, errors: &mut Vec<FieldError>) {
        if self.core_type.trim().is_empty() {
            errors.push(FieldError::new(
                format!("{field}.core_type"),
                "must not be empty",
            ));
        }
        if self.cores_per_slot <= 0 {
            errors.push(FieldError::new(
                format!("{field}.cores_per_slot"),
                format!("must be positive, got {}", self.cores_per_slot),
            ));
        }
        if self.slots <= 0 {
            errors.push(FieldError::new(
                format!("{field}.slots"),
                format!("must be positive, got {}", self.slots),
            ));
        }
    }
}
