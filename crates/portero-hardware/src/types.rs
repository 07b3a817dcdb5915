//! Common types shared across device implementations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two decision indicators.
///
/// Exactly one of them is pulsed per access attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// Green lamp, identifier accepted.
    Authorized,

    /// Red lamp, identifier rejected or malformed.
    Unauthorized,
}

impl Indicator {
    /// Indicator to pulse for a decision.
    #[must_use]
    pub fn for_decision(authorized: bool) -> Self {
        if authorized {
            Self::Authorized
        } else {
            Self::Unauthorized
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authorized => write!(f, "authorized"),
            Self::Unauthorized => write!(f, "unauthorized"),
        }
    }
}
