//! Core type definitions.
//!
//! Newtypes here make invalid ports and empty ranges unrepresentable, so the
//! scanner never has to re-check them.

mod port;
mod target;

pub use port::{Port, PortError, PortRange};
pub use target::ScanTarget;
