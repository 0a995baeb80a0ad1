//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON events on stderr
//! - Optional JSON log file via tracing-appender

pub mod config;
pub mod logger;

pub use config::LogFormat;
pub use logger::LoggerImpl;
