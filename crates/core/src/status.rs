//! User-facing status lines.
//!
//! Every action ends in exactly one [`ActionStatus`]; errors stop here and are
//! not propagated further.

use crate::ClaimsError;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionStatus {
    Success(String),
    Failure(String),
}

impl ActionStatus {
    pub fn success(message: impl Into<String>) -> Self {
        ActionStatus::Success(message.into())
    }

    pub fn failure(err: &ClaimsError) -> Self {
        ActionStatus::Failure(err.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionStatus::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ActionStatus::Success(m) | ActionStatus::Failure(m) => m,
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Success(m) => write!(f, "✅ {m}"),
            ActionStatus::Failure(m) => write!(f, "❌ {m}"),
        }
    }
}

/// A status line that disappears on its own after a fixed delay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransientStatus {
    status: ActionStatus,
    expires_at: Instant,
}

impl TransientStatus {
    pub fn new(status: ActionStatus, now: Instant, ttl: Duration) -> Self {
        Self {
            status,
            expires_at: now + ttl,
        }
    }

    /// The status, or `None` once it has expired.
    pub fn visible_at(&self, now: Instant) -> Option<&ActionStatus> {
        (now < self.expires_at).then_some(&self.status)
    }
}
