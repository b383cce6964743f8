//! Fetch, detect and record in one call.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use smartmoney_core::patterns::{LiquiditySweep, TradeCandidate};
use smartmoney_core::{
    CalibrationConfig, DetectedEvent, DetectionReport, DetectorConfig, EventId, EventKind,
    KindStats, NewEvent, Outcome, ProviderKey, Series, SmartMoneyError, StoreError, detect_all,
};
use smartmoney_store::{EventStore, Resolution};

use crate::Orchestrator;

/// Outcome of one [`Scanner::scan`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    /// Provider that served the candles.
    pub provider: ProviderKey,
    /// Number of candles the detectors ran over.
    pub candles: usize,
    /// Everything the detectors found.
    pub report: DetectionReport,
    /// Ids of events newly appended by this scan. Re-detections are not repeated here.
    pub recorded: Vec<EventId>,
}

/// Couples an [`Orchestrator`] with an [`EventStore`].
///
/// The store is an explicit shared handle; several scanners may write to the
/// same one.
pub struct Scanner {
    orchestrator: Orchestrator,
    store: Arc<dyn EventStore>,
    detector: DetectorConfig,
    calibration: CalibrationConfig,
}

impl Scanner {
    /// Scanner with default detector parameters and confidence priors.
    #[must_use]
    pub fn new(orchestrator: Orchestrator, store: Arc<dyn EventStore>) -> Self {
        Self {
            orchestrator,
            store,
            detector: DetectorConfig::default(),
            calibration: CalibrationConfig::default(),
        }
    }

    /// Override detector parameters.
    #[must_use]
    pub const fn with_detector_config(mut self, cfg: DetectorConfig) -> Self {
        self.detector = cfg;
        self
    }

    /// Override the per-kind priors used when recording events.
    ///
    /// Calibration deltas and bounds are applied by the store's own configuration.
    #[must_use]
    pub fn with_calibration(mut self, cfg: CalibrationConfig) -> Self {
        self.calibration = cfg;
        self
    }

    /// The orchestrator used for fetching.
    #[must_use]
    pub const fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Shared handle to the event store.
    #[must_use]
    pub fn store(&self) -> Arc<dyn EventStore> {
        Arc::clone(&self.store)
    }

    /// Fetch candles, run every detector and record the scoreable detections.
    ///
    /// # Errors
    /// Fetch errors from [`Orchestrator::candles`] and `Store` errors from recording.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "smartmoney::scanner::scan", skip(self))
    )]
    pub async fn scan(
        &self,
        symbol: &str,
        interval: &str,
        count: usize,
    ) -> Result<ScanReport, SmartMoneyError> {
        let resp = self.orchestrator.candles(symbol, interval, count).await?;
        let report = self.detect(symbol, &resp.series);
        let recorded = self.record(&report)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            provider = %resp.provider,
            order_blocks = report.order_blocks.len(),
            sweeps = report.sweeps.len(),
            recorded = recorded.len(),
            "scan complete"
        );

        Ok(ScanReport {
            provider: resp.provider,
            candles: resp.series.len(),
            report,
            recorded,
        })
    }

    /// Run every detector over an already fetched series.
    #[must_use]
    pub fn detect(&self, symbol: &str, series: &Series) -> DetectionReport {
        detect_all(series, symbol.trim(), &self.detector)
    }

    /// Append the report's candidate and sweeps, skipping ones already stored.
    ///
    /// The candidate becomes an `order_block` event anchored at its block's
    /// candle; each sweep becomes a `liquidity_sweep` event anchored at the
    /// sweeping candle. The block direction or sweep side is the event's
    /// variant, so both sides swept by one candle are kept. Kinds without a
    /// configured prior are not recorded.
    ///
    /// # Errors
    /// `Store` when the engine fails or a payload cannot be encoded.
    pub fn record(&self, report: &DetectionReport) -> Result<Vec<EventId>, SmartMoneyError> {
        let mut events = Vec::new();
        if let Some(candidate) = &report.candidate
            && let Some(prior) = self.calibration.prior(EventKind::OrderBlock)
        {
            events.push(candidate_event(&report.symbol, candidate, prior)?);
        }
        if let Some(prior) = self.calibration.prior(EventKind::LiquiditySweep) {
            for sweep in &report.sweeps {
                events.push(sweep_event(&report.symbol, sweep, prior)?);
            }
        }

        let mut recorded = Vec::new();
        for event in events {
            if let Some(id) = self.store.append_if_absent(event)? {
                recorded.push(id);
            }
        }
        Ok(recorded)
    }

    /// Report a realized outcome and recalibrate the event's open siblings.
    ///
    /// # Errors
    /// `Store(EventNotFound)` or `Store(AlreadyResolved)`, or a backend failure.
    pub fn resolve_event(&self, id: EventId, outcome: Outcome) -> Result<Resolution, SmartMoneyError> {
        Ok(self.store.resolve(id, outcome)?)
    }

    /// Stored events for `symbol` with `ts >= since`, newest first.
    ///
    /// # Errors
    /// `Store` on backend or decoding failure.
    pub fn events(&self, symbol: &str, since: i64) -> Result<Vec<DetectedEvent>, SmartMoneyError> {
        Ok(self.store.query(symbol.trim(), since)?)
    }

    /// Per-kind tallies for `symbol`.
    ///
    /// # Errors
    /// `Store` on backend or decoding failure.
    pub fn stats(&self, symbol: &str) -> Result<BTreeMap<EventKind, KindStats>, SmartMoneyError> {
        Ok(self.store.stats(symbol.trim())?)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, SmartMoneyError> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()).into())
}

fn candidate_event(
    symbol: &str,
    candidate: &TradeCandidate,
    prior: f64,
) -> Result<NewEvent, SmartMoneyError> {
    let ob = &candidate.order_block;
    Ok(NewEvent {
        symbol: symbol.to_string(),
        kind: EventKind::OrderBlock,
        ts: ob.ts,
        variant: ob.direction.as_str().to_string(),
        payload: json!({
            "candidate": encode(candidate)?,
            "zone": { "low": ob.zone_low, "high": ob.zone_high },
        }),
        confidence: prior,
    })
}

fn sweep_event(symbol: &str, sweep: &LiquiditySweep, prior: f64) -> Result<NewEvent, SmartMoneyError> {
    Ok(NewEvent {
        symbol: symbol.to_string(),
        kind: EventKind::LiquiditySweep,
        ts: sweep.ts,
        variant: sweep.side.as_str().to_string(),
        payload: encode(sweep)?,
        confidence: prior,
    })
}
