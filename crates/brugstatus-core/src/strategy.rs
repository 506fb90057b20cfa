use crate::config::StrategyConfig;
use crate::record::{self, Record};
use crate::types::{BridgeStatus, StrategyKind};
use chrono::{DateTime, Utc};
use serde_json::Value;

// ---------------------------------------------------------------------------
// FieldMatch
// ---------------------------------------------------------------------------

/// A classifier's verdict for one record: the derived status plus the field
/// that carried the evidence. Classifiers that find nothing return `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    /// Always `Open` or `Closed`; "no evidence" is expressed as `None`.
    pub status: BridgeStatus,
    pub field: String,
    pub raw_value: String,
    /// Dutch one-liner explaining the match, used in the text rendering.
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// A fn-pointer strategy entry for the pipeline's ordered table.
pub struct Strategy {
    pub kind: StrategyKind,
    pub attempt: fn(&Record, &StrategyConfig) -> Option<FieldMatch>,
}

/// The fixed priority order: textual announcements are more authoritative
/// than inferred date comparisons, which beat raw flags (flags are the most
/// prone to stale defaults in the source data).
pub fn default_strategies() -> Vec<Strategy> {
    vec![
        Strategy {
            kind: StrategyKind::Text,
            attempt: text_status,
        },
        Strategy {
            kind: StrategyKind::DatePair,
            attempt: date_pair_status,
        },
        Strategy {
            kind: StrategyKind::Flag,
            attempt: flag_status,
        },
    ]
}

// ---------------------------------------------------------------------------
// Text classifier
// ---------------------------------------------------------------------------

/// Scan text fields in record order for configured keywords. Within a field,
/// closed keywords win from open keywords; across fields, the first field
/// that resolves wins and later fields are not consulted.
pub fn text_status(record: &Record, config: &StrategyConfig) -> Option<FieldMatch> {
    for (name, value) in record.iter() {
        let Some(text) = record::as_text(value) else {
            continue;
        };
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        let status = if contains_any(&normalized, &config.closed_keywords) {
            BridgeStatus::Closed
        } else if contains_any(&normalized, &config.open_keywords) {
            BridgeStatus::Open
        } else {
            continue;
        };
        return Some(FieldMatch {
            status,
            field: name.clone(),
            raw_value: text.to_string(),
            summary: format!("Veld '{name}' meldt: {}", text.trim()),
        });
    }
    None
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| haystack.contains(&keyword.to_lowercase()))
}

// ---------------------------------------------------------------------------
// Date-pair classifier
// ---------------------------------------------------------------------------

/// Compare the latest opening timestamp against the latest closing timestamp,
/// identified by field-name markers. Unparsable values are skipped, never
/// fatal. Equal timestamps resolve to closed: closing dominates.
pub fn date_pair_status(record: &Record, config: &StrategyConfig) -> Option<FieldMatch> {
    let mut latest_open: Option<Candidate> = None;
    let mut latest_close: Option<Candidate> = None;

    for (name, value) in record.iter() {
        let Some(at) = record::parse_timestamp(value) else {
            continue;
        };
        let lower = name.to_lowercase();
        if name_contains_any(&lower, &config.opening_markers) {
            keep_latest(&mut latest_open, name, value, at);
        }
        if name_contains_any(&lower, &config.closing_markers) {
            keep_latest(&mut latest_close, name, value, at);
        }
    }

    if let Some(close) = &latest_close {
        let closing_dominates = latest_open
            .as_ref()
            .map_or(true, |open| close.at >= open.at);
        if closing_dominates {
            return Some(FieldMatch {
                status: BridgeStatus::Closed,
                field: close.field.clone(),
                raw_value: close.raw.clone(),
                summary: "Laatste melding bevat een sluitingstijd.".to_string(),
            });
        }
    }
    latest_open.map(|open| FieldMatch {
        status: BridgeStatus::Open,
        field: open.field,
        raw_value: open.raw,
        summary: "Laatste melding bevat geen sluitingstijd.".to_string(),
    })
}

struct Candidate {
    field: String,
    raw: String,
    at: DateTime<Utc>,
}

fn keep_latest(slot: &mut Option<Candidate>, field: &str, value: &Value, at: DateTime<Utc>) {
    if slot.as_ref().map_or(true, |current| at > current.at) {
        *slot = Some(Candidate {
            field: field.to_string(),
            raw: display_value(value),
            at,
        });
    }
}

fn name_contains_any(name: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .any(|marker| name.contains(&marker.to_lowercase()))
}

// ---------------------------------------------------------------------------
// Flag classifier
// ---------------------------------------------------------------------------

/// Interpret recognized flag fields under the configured truthy convention:
/// boolean, numeric 0/1, or configured text tokens. A flag field with an
/// unrecognized value is skipped in favour of the next candidate.
pub fn flag_status(record: &Record, config: &StrategyConfig) -> Option<FieldMatch> {
    for (name, value) in record.iter() {
        let lower = name.to_lowercase();
        if !config
            .flag_fields
            .iter()
            .any(|flag| flag.to_lowercase() == lower)
        {
            continue;
        }
        let Some(open) = flag_value(value, config) else {
            continue;
        };
        return Some(FieldMatch {
            status: if open {
                BridgeStatus::Open
            } else {
                BridgeStatus::Closed
            },
            field: name.clone(),
            raw_value: display_value(value),
            summary: format!("Statusvlag in veld '{name}'."),
        });
    }
    None
}

fn flag_value(value: &Value, config: &StrategyConfig) -> Option<bool> {
    if let Some(flag) = record::as_bool(value) {
        return Some(flag);
    }
    if let Some(number) = record::as_number(value) {
        if number == 1.0 {
            return Some(true);
        }
        if number == 0.0 {
            return Some(false);
        }
        return None;
    }
    let token = record::as_text(value)?.trim().to_lowercase();
    if config.truthy_tokens.iter().any(|t| t.to_lowercase() == token) {
        return Some(true);
    }
    if config.falsy_tokens.iter().any(|t| t.to_lowercase() == token) {
        return Some(false);
    }
    None
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => Record::new(map),
            _ => panic!("test records must be JSON objects"),
        }
    }

    fn config() -> StrategyConfig {
        StrategyConfig::default()
    }

    // --- text ---

    #[test]
    fn text_reports_open_announcement() {
        let r = record(json!({"melding": "Brug weer open voor verkeer"}));
        let m = text_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Open);
        assert_eq!(m.field, "melding");
        assert_eq!(m.summary, "Veld 'melding' meldt: Brug weer open voor verkeer");
    }

    #[test]
    fn text_reports_closed_announcement() {
        let r = record(json!({"opmerking": "Brug dicht vanwege onderhoud"}));
        let m = text_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Closed);
        assert_eq!(m.field, "opmerking");
    }

    #[test]
    fn closed_keyword_wins_within_one_field() {
        let r = record(json!({"melding": "was dicht, nu open"}));
        let m = text_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Closed);
    }

    #[test]
    fn first_resolving_field_wins_no_voting() {
        let r = record(json!({
            "eerste": "brug open",
            "tweede": "brug gesloten",
        }));
        let m = text_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Open);
        assert_eq!(m.field, "eerste");
    }

    #[test]
    fn text_skips_blank_and_non_text_fields() {
        let r = record(json!({"leeg": "   ", "teller": 7, "melding": "gestremd"}));
        let m = text_status(&r, &config()).unwrap();
        assert_eq!(m.field, "melding");
        assert_eq!(m.status, BridgeStatus::Closed);
    }

    #[test]
    fn text_without_keywords_is_undetermined() {
        let r = record(json!({"melding": "onbekende situatie"}));
        assert!(text_status(&r, &config()).is_none());
    }

    // --- date pair ---

    #[test]
    fn opening_without_closing_is_open() {
        let r = record(json!({"opening_start": "2024-04-23T09:50:00+02:00"}));
        let m = date_pair_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Open);
        assert_eq!(m.field, "opening_start");
    }

    #[test]
    fn closing_after_opening_is_closed() {
        let r = record(json!({
            "openingstijd": "2024-04-20T09:00:00",
            "sluitingstijd": "2024-04-20T09:30:00",
        }));
        let m = date_pair_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Closed);
        assert_eq!(m.field, "sluitingstijd");
    }

    #[test]
    fn opening_after_closing_is_open() {
        let r = record(json!({
            "openingstijd": "2024-04-20T10:00:00",
            "sluitingstijd": "2024-04-20T09:30:00",
        }));
        let m = date_pair_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Open);
    }

    #[test]
    fn equal_timestamps_resolve_to_closed() {
        let r = record(json!({
            "openingstijd": "2024-04-20T09:00:00",
            "sluitingstijd": "2024-04-20T09:00:00",
        }));
        let m = date_pair_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Closed);
    }

    #[test]
    fn unparsable_candidate_is_skipped_not_fatal() {
        let r = record(json!({
            "sluitingstijd": "geen idee",
            "openingstijd": "2024-04-20T09:00:00",
        }));
        let m = date_pair_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Open);
    }

    #[test]
    fn latest_of_repeated_markers_wins() {
        let r = record(json!({
            "sluit_eerste": "2024-04-20T08:00:00",
            "openingstijd": "2024-04-20T09:00:00",
            "sluit_tweede": "2024-04-20T10:00:00",
        }));
        let m = date_pair_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Closed);
        assert_eq!(m.field, "sluit_tweede");
    }

    #[test]
    fn no_marked_fields_is_undetermined() {
        let r = record(json!({"melding": "dicht", "datum": "2024-04-20T09:00:00"}));
        assert!(date_pair_status(&r, &config()).is_none());
    }

    // --- flag ---

    #[test]
    fn boolean_flag_resolves() {
        let r = record(json!({"is_open": true}));
        let m = flag_status(&r, &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Open);
        assert_eq!(m.raw_value, "true");
    }

    #[test]
    fn numeric_flag_resolves() {
        let open = flag_status(&record(json!({"status": 1})), &config()).unwrap();
        assert_eq!(open.status, BridgeStatus::Open);
        let closed = flag_status(&record(json!({"status": 0})), &config()).unwrap();
        assert_eq!(closed.status, BridgeStatus::Closed);
    }

    #[test]
    fn text_token_flag_resolves() {
        let m = flag_status(&record(json!({"status": "Dicht"})), &config()).unwrap();
        assert_eq!(m.status, BridgeStatus::Closed);
    }

    #[test]
    fn unrecognized_flag_value_falls_through_to_next_candidate() {
        let r = record(json!({"status": "misschien", "is_open": false}));
        let m = flag_status(&r, &config()).unwrap();
        assert_eq!(m.field, "is_open");
        assert_eq!(m.status, BridgeStatus::Closed);
    }

    #[test]
    fn unlisted_field_names_are_not_flags() {
        let r = record(json!({"iets_anders": true}));
        assert!(flag_status(&r, &config()).is_none());
    }
}
