//! Shared candle, event, configuration and error types for the smartmoney workspace.

mod candle;
mod config;
mod connector;
mod error;
mod event;

pub use candle::{Candle, Interval};
pub use config::{
    CalibrationConfig, DetectorConfig, FetchStrategy, MomentumConfig, OrchestratorConfig,
    OrderBlockConfig, SweepConfig, ZoneExtent,
};
pub use connector::ProviderKey;
pub use error::{FetchError, FetchReason, MalformedCandle, SmartMoneyError, StoreError};
pub use event::{DetectedEvent, EventId, EventKind, KindStats, NewEvent, Outcome};
