// src/domain/tracking/window.rs
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Duration, Utc};

/// Dedup state of one (resource, visitor session) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    /// No event inside the window: the next request is counted.
    Cold,
    /// An event inside the window exists: requests are no-ops.
    Warm,
}

/// Rolling window that suppresses repeated counts from the same visitor.
///
/// A pair is `Warm` while its latest event is younger than the window and
/// reverts to `Cold` once the event's age reaches the window length. Events
/// stamped in the future (clock skew between workers) keep the pair `Warm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupWindow {
    length: Duration,
}

impl DedupWindow {
    pub const DEFAULT_MINUTES: u32 = 30;

    pub fn new(length: Duration) -> DomainResult<Self> {
        if length <= Duration::zero() {
            return Err(DomainError::Validation(
                "dedup window must be positive".into(),
            ));
        }
        Ok(Self { length })
    }

    pub fn from_minutes(minutes: u32) -> DomainResult<Self> {
        Self::new(Duration::minutes(i64::from(minutes)))
    }

    /// Oldest timestamp that still keeps a pair warm at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.length
    }

    pub fn state(&self, last_event: Option<DateTime<Utc>>, now: DateTime<Utc>) -> PairState {
        match last_event {
            Some(at) if now - at < self.length => PairState::Warm,
            _ => PairState::Cold,
        }
    }

    pub fn should_record(&self, last_event: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        self.state(last_event, now) == PairState::Cold
    }
}

impl Default for DedupWindow {
    fn default() -> Self {
        Self {
            length: Duration::minutes(i64::from(Self::DEFAULT_MINUTES)),
        }
    }
}
