//! # Identity Types
//!
//! Small value types shared by every channel. Handlers never see the emitter
//! itself, only its [`SenderId`], which keeps payloads and identities `Copy`
//! and safe to hand to worker threads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identity of the component that invoked a channel.
///
/// A wrapper around UUID so sender identities cannot be confused with other
/// identifiers. Emitters usually create one at construction time and pass it
/// to every invocation.
///
/// # Examples
///
/// ```rust
/// use ryo_event::SenderId;
///
/// let window = SenderId::new();
/// let parsed: SenderId = window.to_string().parse()?;
/// assert_eq!(window, parsed);
/// # Ok::<(), uuid::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SenderId(pub Uuid);

impl SenderId {
    /// Creates a new random sender ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero identity, for tests and anonymous emitters.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for SenderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SenderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_ids_are_unique() {
        let a = SenderId::new();
        let b = SenderId::new();
        assert_ne!(a, b);
        assert!(!a.is_nil());
        assert!(SenderId::nil().is_nil());
    }

    #[test]
    fn test_sender_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<SenderId>().is_err());
    }
}
