use std::time::Duration;

use serde::Deserialize;

use crate::error::FlowError;
use crate::types::Capacity;

/// Limits applied to one augmentation loop.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct FlowOptions {
    /// Fail with `BudgetExceeded` if more augmenting paths remain after this many.
    pub max_augmentations: Option<usize>,
    /// Fail with `BudgetExceeded` if augmenting paths remain once this much
    /// time has passed. Zero fails as soon as any path is found.
    pub time_limit_ms: Option<u64>,
    /// Stop as soon as this much flow has been pushed.
    pub requested_flow: Option<Capacity>,
}

impl FlowOptions {
    pub fn with_max_augmentations(mut self, max: usize) -> Self {
        self.max_augmentations = Some(max);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = Some(limit.as_millis() as u64);
        self
    }

    pub fn with_requested_flow(mut self, requested: Capacity) -> Self {
        self.requested_flow = Some(requested);
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub(crate) fn validate(&self) -> Result<(), FlowError> {
        match self.requested_flow {
            Some(requested) if requested < 0 => Err(FlowError::InvalidRequestedFlow { requested }),
            _ => Ok(()),
        }
    }
}
