use std::ops::RangeInclusive;
use std::time::Duration;

use crate::constants::*;

/// Tunables for one spin session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub spin_duration: Duration,
    pub revolutions: RangeInclusive<u32>,
    pub jitter_fraction: f64,
    /// No timeout unless the host sets one.
    pub verify_timeout: Option<Duration>,
    pub initial_rotation: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            spin_duration: Duration::from_millis(SPIN_DURATION_MS),
            revolutions: MIN_FULL_REVOLUTIONS..=MAX_FULL_REVOLUTIONS,
            jitter_fraction: JITTER_FRACTION,
            verify_timeout: None,
            initial_rotation: 0.0,
        }
    }
}

impl SessionConfig {
    pub fn with_spin_duration(mut self, duration: Duration) -> Self {
        self.spin_duration = duration;
        self
    }

    pub fn with_verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = Some(timeout);
        self
    }

    pub fn with_initial_rotation(mut self, degrees: f64) -> Self {
        self.initial_rotation = degrees;
        self
    }

    /// Jitter must stay inside half a wedge and revolutions must meet the floor.
    pub fn sanitized(mut self) -> Self {
        self.jitter_fraction = self.jitter_fraction.abs().min(0.45);
        let low = (*self.revolutions.start()).max(MIN_FULL_REVOLUTIONS);
        let high = (*self.revolutions.end()).max(low);
        self.revolutions = low..=high;
        self
    }
}
