use crate::config::PortalConfig;
use crate::error::{BrugError, Result};
use crate::interpret::PortalQuery;
use crate::record::{self, Record, RecordBatch};
use serde_json::Value;
use std::time::Duration;

// ---------------------------------------------------------------------------
// FetchedBatch
// ---------------------------------------------------------------------------

/// A record batch plus the query parameters that produced it, ready to be
/// handed to the interpretation engine.
#[derive(Debug)]
pub struct FetchedBatch {
    pub records: RecordBatch,
    pub query: PortalQuery,
}

// ---------------------------------------------------------------------------
// PortalClient
// ---------------------------------------------------------------------------

/// One-shot client for the open data portal's record search endpoint.
pub struct PortalClient {
    http: reqwest::blocking::Client,
    config: PortalConfig,
}

impl PortalClient {
    pub fn new(config: PortalConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetch the most recent records for the configured bridge.
    ///
    /// The portal is asked to sort on its record timestamp, and the batch is
    /// re-sorted locally as well: the engine's selector depends on
    /// most-recent-first ordering, and the portal's default ordering is not
    /// under our control.
    pub fn fetch(&self) -> Result<FetchedBatch> {
        let rows = self.config.rows.to_string();
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("dataset", self.config.dataset.as_str()),
                ("q", self.config.bridge.as_str()),
                ("rows", rows.as_str()),
                ("sort", "-record_timestamp"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrugError::PortalStatus(status.as_u16()));
        }
        let source_url = response.url().to_string();
        let body = response.text()?;
        let payload: Value = serde_json::from_str(&body)?;

        let mut records = records_from_payload(&payload);
        sort_most_recent_first(&mut records);

        Ok(FetchedBatch {
            records,
            query: PortalQuery {
                bridge: self.config.bridge.clone(),
                dataset: self.config.dataset.clone(),
                rows: self.config.rows,
                source_url,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Payload unwrapping
// ---------------------------------------------------------------------------

/// The record list may live under `records`, `results`, or `data` depending
/// on the portal version; non-object entries are dropped.
fn records_from_payload(payload: &Value) -> RecordBatch {
    let Some(list) = ["records", "results", "data"]
        .iter()
        .find_map(|key| payload.get(key).and_then(Value::as_array))
    else {
        return Vec::new();
    };
    list.iter().filter_map(unwrap_record).collect()
}

/// A record's field map may be nested under `fields` or be the record
/// object itself.
fn unwrap_record(value: &Value) -> Option<Record> {
    let object = value.as_object()?;
    let timestamp = object
        .get("record_timestamp")
        .and_then(record::parse_timestamp);
    let fields = match object.get("fields") {
        Some(Value::Object(fields)) => fields.clone(),
        _ => object.clone(),
    };
    Some(Record::with_timestamp(fields, timestamp))
}

/// Order records most recent first by their detected timestamps, so the
/// engine's recency precondition holds even if the portal changes its
/// default ordering. Stable: records without any timestamp sink to the end
/// in their original relative order.
pub fn sort_most_recent_first(records: &mut RecordBatch) {
    records.sort_by(|a, b| b.observed_at().cmp(&a.observed_at()));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
