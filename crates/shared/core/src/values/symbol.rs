use serde::{Deserialize, Serialize};

/// Suffix appended to symbols entered without an exchange (National Stock Exchange)
pub const DEFAULT_MARKET_SUFFIX: &str = ".NS";

/// Canonical instrument symbol, e.g. `RELIANCE.NS`
///
/// Construction always normalizes: surrounding whitespace is trimmed, the
/// text is uppercased and `.NS` is appended when no exchange suffix is
/// present. Normalizing an already canonical symbol is a no-op, so the value
/// can safely be used as a cache and map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Normalize user input into a canonical symbol
    pub fn normalize(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        if upper.contains('.') {
            Self(upper)
        } else {
            Self(format!("{}{}", upper, DEFAULT_MARKET_SUFFIX))
        }
    }

    /// Get the symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ticker without the exchange suffix (`RELIANCE` for `RELIANCE.NS`)
    pub fn base(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(base, _)| base)
    }

    /// Exchange suffix without the dot (`NS` for `RELIANCE.NS`)
    pub fn exchange_suffix(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, suffix)| suffix)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::normalize(&s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
