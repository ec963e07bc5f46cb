//! Thread-safe collection of probe outcomes.

use crate::services;
use crate::types::Port;
use std::sync::{Mutex, PoisonError};

/// The result of probing one port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// The probed port.
    pub port: Port,
    /// Whether a connection was established.
    pub reachable: bool,
    /// Well-known service name, or "unknown".
    pub service: String,
}

impl ProbeOutcome {
    /// Build an outcome, looking up the service name for `port`.
    pub fn new(port: Port, reachable: bool) -> Self {
        Self {
            port,
            reachable,
            service: services::service_name(port.as_u16()).to_string(),
        }
    }
}

/// Collects outcomes recorded by concurrent workers.
///
/// The lock only ever covers the push itself; no probe runs while it is held.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    outcomes: Mutex<Vec<ProbeOutcome>>,
}

impl ResultAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome. Safe to call from many workers at once.
    pub fn record(&self, outcome: ProbeOutcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outcome);
    }

    /// Number of outcomes recorded so far.
    pub fn len(&self) -> usize {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All reachable outcomes, in recording order.
    ///
    /// Meant to be called once the workers have been joined.
    pub fn snapshot(&self) -> Vec<ProbeOutcome> {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|o| o.reachable)
            .cloned()
            .collect()
    }
}
