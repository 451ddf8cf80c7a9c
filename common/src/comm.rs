/// Deals with all communication regarding the Relay Control Module (RCM).
pub mod rcm;

/// Memory-mapped GPIO access for the relay output pins.
#[cfg(feature = "gpio")]
pub mod gpio;
