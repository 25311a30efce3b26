use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Maximum server id length in bytes.
pub const MAX_SERVER_ID_LEN: usize = 32;

/// Validated identifier of a registered log-producing server.
///
/// Server ids are UTF-8 strings of 1 to 32 bytes, unique across the system.
/// Validation happens at construction; a `ServerId` in hand is always within
/// bounds.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerId(String);

impl ServerId {
    /// Validate and wrap a server id string.
    pub fn parse(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::ServerIdEmpty);
        }
        if id.len() > MAX_SERVER_ID_LEN {
            return Err(TypeError::ServerIdTooLong {
                max: MAX_SERVER_ID_LEN,
                actual: id.len(),
            });
        }
        Ok(Self(id))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServerId({})", self.0)
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ServerId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for ServerId {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ServerId> for String {
    fn from(id: ServerId) -> Self {
        id.0
    }
}

impl AsRef<str> for ServerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_valid_ids() {
        let id = ServerId::parse("edge-node-01").unwrap();
        assert_eq!(id.as_str(), "edge-node-01");
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(ServerId::parse("").unwrap_err(), TypeError::ServerIdEmpty);
    }

    #[test]
    fn parse_rejects_over_32_bytes() {
        let long = "x".repeat(33);
        assert_eq!(
            ServerId::parse(long).unwrap_err(),
            TypeError::ServerIdTooLong {
                max: 32,
                actual: 33
            }
        );
    }

    #[test]
    fn parse_accepts_exactly_32_bytes() {
        assert!(ServerId::parse("x".repeat(32)).is_ok());
    }

    #[test]
    fn length_cap_is_bytes_not_chars() {
        // 17 chars, 34 bytes
        let id = "é".repeat(17);
        assert!(ServerId::parse(id).is_err());
    }

    #[test]
    fn serde_rejects_invalid() {
        let result: Result<ServerId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let id = ServerId::parse("srv-7").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ServerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
