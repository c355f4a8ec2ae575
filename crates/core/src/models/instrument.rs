use serde::{Deserialize, Serialize};

/// How an instrument is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavKind {
    /// Constant NAV (money-market / cash-equivalent funds). Every date is
    /// priced at the configured fixed price regardless of the priced series.
    Fixed,
    /// Market-priced NAV taken from the instrument's NAV series.
    Floating,
}

impl NavKind {
    #[must_use]
    pub fn is_fixed(self) -> bool {
        matches!(self, NavKind::Fixed)
    }
}

impl std::fmt::Display for NavKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavKind::Fixed => write!(f, "Fixed"),
            NavKind::Floating => write!(f, "Floating"),
        }
    }
}

/// Typed instrument identifier: an upper-cased ticker symbol.
///
/// Used as the key of every per-instrument map, so that lookups go through
/// one normalised type instead of free-form strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct InstrumentId(String);

impl InstrumentId {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into().trim().to_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl From<String> for InstrumentId {
    fn from(symbol: String) -> Self {
        Self::new(symbol)
    }
}

impl From<InstrumentId> for String {
    fn from(id: InstrumentId) -> Self {
        id.0
    }
}

/// A fund tracked by the engine.
///
/// **Equality and hashing** are based solely on `id`, NOT on `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    /// Ticker, upper-cased (e.g., "VMFXX", "VTSAX")
    pub id: InstrumentId,

    /// Human-readable name
    pub name: String,

    /// Fixed or market-priced NAV
    pub nav_kind: NavKind,
}

impl PartialEq for Instrument {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Instrument {}

impl std::hash::Hash for Instrument {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, nav_kind: NavKind) -> Self {
        Self {
            id: InstrumentId::new(symbol),
            name: name.into(),
            nav_kind,
        }
    }

    /// Convenience constructors
    pub fn fixed(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(symbol, name, NavKind::Fixed)
    }

    pub fn floating(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(symbol, name, NavKind::Floating)
    }
}
