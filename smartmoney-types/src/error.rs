use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single provider failed to deliver a series.
///
/// The split matters to callers deciding what is worth retrying: missing
/// credentials and unsupported requests are configuration problems, while
/// transport, timeout and upstream failures are usually transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum FetchReason {
    /// No API key was configured for the provider; no request was sent.
    NoCredentials,
    /// Connection, TLS or body-read failure before a response was decoded.
    Transport,
    /// The provider answered with an error status (HTTP or in-band).
    Upstream {
        /// HTTP status, or the provider's own error code for in-band errors.
        status: u16,
    },
    /// The response body could not be decoded into candles.
    MalformedPayload,
    /// The response decoded fine but contained no usable candles.
    EmptySeries,
    /// The call exceeded its deadline.
    Timeout,
    /// The provider cannot serve this request (e.g. interval not offered).
    Unsupported,
}

impl FetchReason {
    /// Whether retrying the same provider later could plausibly succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport | Self::Timeout => true,
            Self::Upstream { status } => *status == 429 || *status >= 500,
            Self::NoCredentials | Self::MalformedPayload | Self::EmptySeries | Self::Unsupported => {
                false
            }
        }
    }
}

impl std::fmt::Display for FetchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCredentials => f.write_str("no_credentials"),
            Self::Transport => f.write_str("transport"),
            Self::Upstream { status } => write!(f, "upstream_{status}"),
            Self::MalformedPayload => f.write_str("malformed_payload"),
            Self::EmptySeries => f.write_str("empty_series"),
            Self::Timeout => f.write_str("timeout"),
            Self::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// A provider-tagged fetch failure. Recoverable by failing over to the next provider.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{provider} failed ({reason}): {message}")]
pub struct FetchError {
    /// Name of the provider that failed.
    pub provider: String,
    /// Classified failure reason.
    pub reason: FetchReason,
    /// Human-readable detail from the adapter.
    pub message: String,
}

impl FetchError {
    /// Build a fetch error for `provider`.
    pub fn new(provider: impl Into<String>, reason: FetchReason, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            reason,
            message: message.into(),
        }
    }

    /// Helper: provider has no API key configured.
    pub fn no_credentials(provider: impl Into<String>) -> Self {
        Self::new(provider, FetchReason::NoCredentials, "api key not configured")
    }

    /// Helper: provider call exceeded its timeout.
    pub fn timeout(provider: impl Into<String>, after_ms: u64) -> Self {
        Self::new(
            provider,
            FetchReason::Timeout,
            format!("no response within {after_ms}ms"),
        )
    }

    /// Helper: provider returned no usable candles.
    pub fn empty(provider: impl Into<String>) -> Self {
        Self::new(provider, FetchReason::EmptySeries, "no candles returned")
    }
}

/// A single candle record rejected during normalization.
///
/// Malformed records are skipped rather than failing the whole series.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("malformed candle at input position {index}: {reason}")]
pub struct MalformedCandle {
    /// Position of the record in the provider's raw output.
    pub index: usize,
    /// What was wrong with it.
    pub reason: String,
}

/// Failures of the persistent event store.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum StoreError {
    /// The storage engine reported an error.
    #[error("store backend error: {0}")]
    Backend(String),
    /// A payload could not be encoded or decoded.
    #[error("store serialization error: {0}")]
    Serialization(String),
    /// No event exists with this id.
    #[error("event {id} not found")]
    EventNotFound {
        /// The requested event id.
        id: i64,
    },
    /// The event was already resolved; resolving twice would double-count calibration.
    #[error("event {id} already resolved")]
    AlreadyResolved {
        /// The requested event id.
        id: i64,
    },
}

/// Unified error type for the smartmoney workspace.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SmartMoneyError {
    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A single provider failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Every provider failed; one diagnostic per attempted provider, in priority order.
    #[error("all providers failed: {}", summarize(.0))]
    AllProvidersFailed(Vec<FetchError>),

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Label of the operation that timed out.
        capability: String,
    },

    /// Event store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn summarize(errors: &[FetchError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}={}", e.provider, e.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SmartMoneyError {
    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Names of the providers that contributed a diagnostic.
    #[must_use]
    pub fn providers(&self) -> Vec<&str> {
        match self {
            Self::AllProvidersFailed(list) => list.iter().map(|e| e.provider.as_str()).collect(),
            Self::Fetch(e) => vec![e.provider.as_str()],
            _ => vec![],
        }
    }

    /// The diagnostic recorded for `provider`, if any.
    #[must_use]
    pub fn failure_for(&self, provider: &str) -> Option<&FetchError> {
        match self {
            Self::AllProvidersFailed(list) => list.iter().find(|e| e.provider == provider),
            Self::Fetch(e) if e.provider == provider => Some(e),
            _ => None,
        }
    }

    /// Returns true if retrying the whole request later could succeed.
    ///
    /// Aggregates are transient when at least one provider failed transiently.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Fetch(e) => e.reason.is_transient(),
            Self::AllProvidersFailed(list) => list.iter().any(|e| e.reason.is_transient()),
            Self::RequestTimeout { .. } => true,
            Self::InvalidArg(_) | Self::Store(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_exposes_each_provider() {
        let err = SmartMoneyError::AllProvidersFailed(vec![
            FetchError::no_credentials("twelvedata"),
            FetchError::new("finnhub", FetchReason::Upstream { status: 503 }, "bad gateway"),
            FetchError::timeout("alphavantage", 15_000),
        ]);
        assert_eq!(err.providers(), vec!["twelvedata", "finnhub", "alphavantage"]);
        assert_eq!(
            err.failure_for("finnhub").map(|e| e.reason),
            Some(FetchReason::Upstream { status: 503 })
        );
        assert!(err.failure_for("yahoo").is_none());
        assert!(err.is_transient());
    }

    #[test]
    fn aggregate_round_trips_as_structured_json() {
        let err = SmartMoneyError::AllProvidersFailed(vec![FetchError::empty("finnhub")]);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json["AllProvidersFailed"][0]["reason"]["kind"],
            serde_json::json!("empty_series")
        );
        let back: SmartMoneyError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn credentials_and_payload_problems_are_not_transient() {
        assert!(!FetchReason::NoCredentials.is_transient());
        assert!(!FetchReason::MalformedPayload.is_transient());
        assert!(!FetchReason::Upstream { status: 401 }.is_transient());
        assert!(FetchReason::Upstream { status: 429 }.is_transient());
    }
}
