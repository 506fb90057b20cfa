use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Record / RecordBatch
// ---------------------------------------------------------------------------

/// One unit of portal data: an ordered field map plus the portal's own
/// record timestamp, when it carried one.
///
/// Field names and value encodings are not stable across records; classifiers
/// therefore only touch values through the typed accessors below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
    timestamp: Option<DateTime<Utc>>,
}

/// Records for one query, most recent first.
pub type RecordBatch = Vec<Record>;

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            timestamp: None,
        }
    }

    pub fn with_timestamp(fields: Map<String, Value>, timestamp: Option<DateTime<Utc>>) -> Self {
        Self { fields, timestamp }
    }

    /// Fields in the order the portal document listed them.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The most recent parsable timestamp across the record timestamp and all
    /// field values. Used as the "last observed" moment for display.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .into_iter()
            .chain(self.fields.values().filter_map(parse_timestamp))
            .max()
    }
}

// ---------------------------------------------------------------------------
// Typed field accessors
// ---------------------------------------------------------------------------

pub fn as_text(value: &Value) -> Option<&str> {
    value.as_str()
}

pub fn as_bool(value: &Value) -> Option<bool> {
    value.as_bool()
}

pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Try to read a field value as a timestamp.
///
/// Accepts RFC 3339 (including `Z`), naive ISO date-times, the day-first
/// forms Dutch portals use, bare dates, and numeric epoch values (seconds,
/// or milliseconds when the magnitude says so). Anything else is `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp_str(raw),
        Value::Number(n) => {
            let mut seconds = n.as_f64()?;
            if seconds.abs() > 1e12 {
                seconds /= 1000.0;
            }
            DateTime::from_timestamp_millis((seconds * 1000.0) as i64)
        }
        _ => None,
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y"];

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.with_timezone(&Utc));
    }
    // Portal timestamps without an offset are taken as UTC.
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts(value: Value) -> Option<String> {
        parse_timestamp(&value).map(|dt| dt.to_rfc3339())
    }

    #[test]
    fn parses_rfc3339_with_offset_and_zulu() {
        assert_eq!(
            ts(json!("2024-04-20T11:00:00+02:00")).unwrap(),
            "2024-04-20T09:00:00+00:00"
        );
        assert_eq!(
            ts(json!("2024-04-20T09:00:00Z")).unwrap(),
            "2024-04-20T09:00:00+00:00"
        );
    }

    #[test]
    fn parses_naive_iso_as_utc() {
        assert_eq!(
            ts(json!("2024-04-20T09:30:00")).unwrap(),
            "2024-04-20T09:30:00+00:00"
        );
        assert_eq!(
            ts(json!("2024-04-20 09:30")).unwrap(),
            "2024-04-20T09:30:00+00:00"
        );
    }

    #[test]
    fn parses_dutch_day_first_and_bare_date() {
        assert_eq!(
            ts(json!("20-04-2024 09:30:00")).unwrap(),
            "2024-04-20T09:30:00+00:00"
        );
        assert_eq!(ts(json!("20-04-2024")).unwrap(), "2024-04-20T00:00:00+00:00");
    }

    #[test]
    fn parses_epoch_seconds_and_milliseconds() {
        assert_eq!(ts(json!(1713603600)).unwrap(), "2024-04-20T09:00:00+00:00");
        assert_eq!(
            ts(json!(1713603600000i64)).unwrap(),
            "2024-04-20T09:00:00+00:00"
        );
    }

    #[test]
    fn rejects_garbage_values() {
        assert!(parse_timestamp(&json!("vandaag dicht")).is_none());
        assert!(parse_timestamp(&json!("")).is_none());
        assert!(parse_timestamp(&json!(true)).is_none());
        assert!(parse_timestamp(&json!(null)).is_none());
        assert!(parse_timestamp(&json!({"nested": 1})).is_none());
    }

    #[test]
    fn observed_at_takes_most_recent_candidate() {
        let fields = match json!({
            "melding": "Brug dicht",
            "gemeld_op": "2024-04-20T08:00:00Z",
            "bijgewerkt": "2024-04-20T10:00:00Z",
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let record = Record::with_timestamp(
            fields,
            Some("2024-04-20T09:00:00Z".parse::<DateTime<Utc>>().unwrap()),
        );
        assert_eq!(
            record.observed_at().unwrap().to_rfc3339(),
            "2024-04-20T10:00:00+00:00"
        );
    }

    #[test]
    fn observed_at_none_without_any_timestamp() {
        let fields = match json!({"melding": "dicht"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert!(Record::new(fields).observed_at().is_none());
    }
}
