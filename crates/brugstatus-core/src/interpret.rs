use crate::config::StrategyConfig;
use crate::record::Record;
use crate::strategy::{FieldMatch, Strategy};
use crate::types::{BridgeStatus, StrategyKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// PortalQuery
// ---------------------------------------------------------------------------

/// The parameters that produced a record batch, passed through unchanged
/// into the result for display. The engine never interprets these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalQuery {
    pub bridge: String,
    pub dataset: String,
    pub rows: u32,
    pub source_url: String,
}

// ---------------------------------------------------------------------------
// MatchProvenance / StatusResult
// ---------------------------------------------------------------------------

/// The record/field/strategy trail explaining how a status was derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchProvenance {
    pub record_index: usize,
    pub field: String,
    pub strategy: StrategyKind,
    pub raw_value: String,
}

/// The single, immutable outcome of one interpretation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusResult {
    pub status: BridgeStatus,
    /// Dutch one-liner explaining the decision, for the text rendering.
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<MatchProvenance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
    pub bridge: String,
    pub dataset: String,
    pub rows: u32,
    pub source_url: String,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Ordered strategy table applied to a single record: the first strategy that
/// resolves wins, later ones are not consulted.
pub struct Pipeline {
    strategies: Vec<Strategy>,
}

impl Pipeline {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    pub fn classify(
        &self,
        record: &Record,
        config: &StrategyConfig,
    ) -> Option<(StrategyKind, FieldMatch)> {
        for strategy in &self.strategies {
            if let Some(found) = (strategy.attempt)(record, config) {
                return Some((strategy.kind, found));
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Record selection
// ---------------------------------------------------------------------------

/// Walk the batch in its given order and return the result for the first
/// record the pipeline resolves; records after that point are not inspected.
///
/// Precondition: the batch is ordered most recent first. The engine does not
/// verify this; the fetch side re-sorts before handing the batch over.
///
/// Always returns exactly one result. An empty batch, or a batch where no
/// record resolves, yields `Undetermined` with no provenance — never an
/// error.
pub fn interpret(
    batch: &[Record],
    pipeline: &Pipeline,
    config: &StrategyConfig,
    query: &PortalQuery,
) -> StatusResult {
    for (index, record) in batch.iter().enumerate() {
        if let Some((kind, found)) = pipeline.classify(record, config) {
            return StatusResult {
                status: found.status,
                summary: found.summary,
                provenance: Some(MatchProvenance {
                    record_index: index,
                    field: found.field,
                    strategy: kind,
                    raw_value: found.raw_value,
                }),
                observed_at: record.observed_at(),
                bridge: query.bridge.clone(),
                dataset: query.dataset.clone(),
                rows: query.rows,
                source_url: query.source_url.clone(),
            };
        }
    }
    StatusResult {
        status: BridgeStatus::Undetermined,
        summary: "Brongegevens konden niet geïnterpreteerd worden.".to_string(),
        provenance: None,
        observed_at: None,
        bridge: query.bridge.clone(),
        dataset: query.dataset.clone(),
        rows: query.rows,
        source_url: query.source_url.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
