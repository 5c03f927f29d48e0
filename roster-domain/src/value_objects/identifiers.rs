// Identifier value objects

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of a canonical SteamID64 token as it appears in the console log.
pub const STEAM_ID_LEN: usize = 17;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SteamId(pub String);

impl SteamId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the token is the full 17-digit numeric form. Shorter or
    /// non-numeric tokens are still carried verbatim, never rejected.
    pub fn has_canonical_form(&self) -> bool {
        self.0.len() == STEAM_ID_LEN && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_requires_17_digits() {
        assert!(SteamId::new("12345678901234567").has_canonical_form());
        assert!(!SteamId::new("1234567890123456").has_canonical_form());
        assert!(!SteamId::new("1234567890123456x").has_canonical_form());
        assert!(!SteamId::new("").has_canonical_form());
    }
}
