pub mod layout;
pub mod modern;
pub mod modern_helpers;
pub mod pipe;
pub mod styles;

use std::time::Duration;

/// Settings shared by both display modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostOptions {
    /// Seconds moved by one arrow-key seek.
    pub seek_step: f64,
    /// How often the surface is drained while nothing else happens.
    pub tick: Duration,
}
