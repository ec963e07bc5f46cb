//! # portsweep - a concurrent TCP connect port scanner
//!
//! portsweep decides which ports of a host accept a TCP connection within a
//! bounded time. A fixed-size pool of tokio workers pulls ports from a shared
//! queue, probes each exactly once, and records open ports; the result is
//! sorted by port so output is reproducible regardless of scheduling.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::scanner::{Orchestrator, ScanConfig};
//! use portsweep::types::PortRange;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScanConfig::new(PortRange::new(1, 1024).unwrap()).with_threads(200);
//!     let report = Orchestrator::new(config).run("localhost").await.unwrap();
//!
//!     for port in &report.open_ports {
//!         println!("{} {}", port.port, port.service);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - validated ports, ranges and resolved targets
//! - [`scanner`] - prober, work queue, worker pool, aggregator, progress and
//!   the orchestrator tying them together
//! - [`services`] - well-known port names
//! - [`config`] - settings file
//! - [`output`] - console table and report file
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ScanError};
pub use scanner::{Orchestrator, ProbeOutcome, Prober, ScanConfig, ScanPhase, ScanReport};
pub use types::{Port, PortRange, ScanTarget};
