use serde::{Deserialize, Serialize};

/// Store-assigned row identifier. Opaque to callers; only used as a list key
/// and for deterministic tie-breaking when two rows share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RsvpId(pub i64);

/// Identifies which event a response belongs to inside the shared `rsvps`
/// collection. Fixed per deployment; every query must filter on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Total attendees including the respondent. Always within [1, 10]:
/// constructors clamp and the step operations saturate at the bounds.
/// The wire carries a plain integer; this type only exists where the
/// invariant is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GuestCount(u32);

impl GuestCount {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10;

    pub fn new(count: u32) -> Self {
        Self(count.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Saturates at [`Self::MAX`]; stepping past the bound is a no-op.
    pub fn increment(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// Saturates at [`Self::MIN`]; stepping past the bound is a no-op.
    pub fn decrement(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for GuestCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl From<GuestCount> for u32 {
    fn from(count: GuestCount) -> Self {
        count.0
    }
}
