//! # sentinel-core
//!
//! Shared domain types for the sentiment pipeline: canonical categories, message sources,
//! priorities, alert severities, the label normalizer, lenient timestamp parsing, the error
//! taxonomy and tracing initialization. No I/O besides the log file opened by [`init_tracing`].

pub mod error;
pub mod labels;
pub mod logger;
pub mod normalizer;
pub mod timestamp;
pub mod types;

pub use error::{Result, SentinelError};
pub use logger::init_tracing;
pub use normalizer::normalize;
pub use timestamp::{parse_timestamp, resolve_timestamp, to_iso};
pub use types::{AlertSeverity, MessageSource, Priority, Sentiment, SentimentCategory};
