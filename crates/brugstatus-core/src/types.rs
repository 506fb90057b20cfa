use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// BridgeStatus
// ---------------------------------------------------------------------------

/// The interpreted state of a bridge. `Undetermined` is not a real-world
/// state: it means no strategy could derive a status from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeStatus {
    Open,
    Closed,
    Undetermined,
}

impl BridgeStatus {
    pub fn is_resolved(self) -> bool {
        !matches!(self, BridgeStatus::Undetermined)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BridgeStatus::Open => "open",
            BridgeStatus::Closed => "closed",
            BridgeStatus::Undetermined => "undetermined",
        }
    }

    /// Dutch label used in the text rendering.
    pub fn label_nl(self) -> &'static str {
        match self {
            BridgeStatus::Open => "open",
            BridgeStatus::Closed => "dicht",
            BridgeStatus::Undetermined => "onbekend",
        }
    }
}

impl fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StrategyKind
// ---------------------------------------------------------------------------

/// Which category of field a status was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Text,
    DatePair,
    Flag,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Text => "text",
            StrategyKind::DatePair => "date_pair",
            StrategyKind::Flag => "flag",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
