use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// StrategyConfig
// ---------------------------------------------------------------------------

/// Keyword lists, field-name markers, and flag conventions used by the
/// classifiers. Built once and threaded as an argument; no classifier reads
/// process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Substrings that mark a text field as announcing an open bridge.
    #[serde(default = "default_open_keywords")]
    pub open_keywords: Vec<String>,
    /// Substrings that mark a text field as announcing a closed bridge.
    /// Within one field these win from open keywords.
    #[serde(default = "default_closed_keywords")]
    pub closed_keywords: Vec<String>,
    /// Field-name substrings that identify an opening timestamp.
    #[serde(default = "default_opening_markers")]
    pub opening_markers: Vec<String>,
    /// Field-name substrings that identify a closing timestamp.
    #[serde(default = "default_closing_markers")]
    pub closing_markers: Vec<String>,
    /// Field names recognized as status flags.
    #[serde(default = "default_flag_fields")]
    pub flag_fields: Vec<String>,
    /// Text tokens a flag field may use for "open".
    #[serde(default = "default_truthy_tokens")]
    pub truthy_tokens: Vec<String>,
    /// Text tokens a flag field may use for "closed".
    #[serde(default = "default_falsy_tokens")]
    pub falsy_tokens: Vec<String>,
}

fn default_open_keywords() -> Vec<String> {
    strings(&[
        "open",
        "weer open",
        "openstaand",
        "open voor verkeer",
        "open voor scheepvaart",
        "vrijgegeven",
    ])
}

fn default_closed_keywords() -> Vec<String> {
    strings(&["dicht", "gesloten", "afgesloten", "gestremd", "stremming"])
}

fn default_opening_markers() -> Vec<String> {
    strings(&["open", "start", "begin"])
}

fn default_closing_markers() -> Vec<String> {
    strings(&["dicht", "sluit", "eind", "close"])
}

fn default_flag_fields() -> Vec<String> {
    strings(&["status", "is_open", "open", "geopend"])
}

fn default_truthy_tokens() -> Vec<String> {
    strings(&["true", "ja", "open", "1"])
}

fn default_falsy_tokens() -> Vec<String> {
    strings(&["false", "nee", "dicht", "gesloten", "0"])
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            open_keywords: default_open_keywords(),
            closed_keywords: default_closed_keywords(),
            opening_markers: default_opening_markers(),
            closing_markers: default_closing_markers(),
            flag_fields: default_flag_fields(),
            truthy_tokens: default_truthy_tokens(),
            falsy_tokens: default_falsy_tokens(),
        }
    }
}

// ---------------------------------------------------------------------------
// PortalConfig
// ---------------------------------------------------------------------------

/// Parameterization of the one-shot portal fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Bridge name used as the search term.
    #[serde(default = "default_bridge")]
    pub bridge: String,
    /// Dataset id on the open data portal.
    #[serde(default = "default_dataset")]
    pub dataset: String,
    /// API endpoint of the open data portal.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Number of records to request.
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_bridge() -> String {
    "Hogebrug".to_string()
}

fn default_dataset() -> String {
    "brugopeningen".to_string()
}

fn default_base_url() -> String {
    "https://rotterdam.dataplatform.nl/api/records/1.0/search/".to_string()
}

fn default_rows() -> u32 {
    5
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            bridge: default_bridge(),
            dataset: default_dataset(),
            base_url: default_base_url(),
            rows: default_rows(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
