//! Configuration management for portsweep.
//!
//! Scan defaults come from an optional XDG-located settings file.

mod settings;

pub use settings::Settings;
