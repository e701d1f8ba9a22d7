//! The monitoring flows built on the pure scorers: turning engine responses
//! into prompt results, folding a day of results into a snapshot, and
//! raising alerts when consecutive snapshots differ enough to matter.
//!
//! Storage is reached only through [`MonitorStore`], so the aggregator and the
//! evaluator run the same against Postgres ([`PgMonitorStore`]) and memory
//! ([`MemoryStore`]).

pub mod aggregate;
pub mod alerts;
pub mod error;
pub mod process;
pub mod store;
pub mod webhook;

pub use aggregate::{aggregate_daily_snapshot, compute_snapshot, AggregateOutcome};
pub use alerts::{detect_alerts, evaluate_alerts};
pub use error::MonitorError;
pub use process::{process_engine_response, process_engine_response_at, ResponseInput};
pub use store::{MemoryStore, MonitorStore, PgMonitorStore};
pub use webhook::{AlertNotifier, DeliveryOutcome, WebhookNotifier, WebhookPayload};
