//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Boost campaign identifier - newtype for type safety.
///
/// Upstream sends either a number or a string; both are normalised to the
/// string form so that `7` and `"7"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoostId(String);

impl BoostId {
    /// Create a new `BoostId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the boost ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BoostId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Subscriber identity: the numeric Telegram user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriberId(i64);

impl SubscriberId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SubscriberId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boost_id_display_matches_inner() {
        assert_eq!(BoostId::new("42").to_string(), "42");
    }

    #[test]
    fn subscriber_id_roundtrip() {
        let id = SubscriberId::from(-1001);
        assert_eq!(id.get(), -1001);
        assert_eq!(id.to_string(), "-1001");
    }
}
