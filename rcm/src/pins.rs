use common::comm::gpio::{Gpio, Pin};
use std::sync::Arc;

/// Location of one pin: which GPIO controller bank it lives on and its bit
/// index within that bank.
pub struct GpioInfo {
  pub controller: usize,
  pub pin_num: usize,
}

/// Opens all four GPIO controller banks on the chip.
pub fn open_controllers() -> Vec<Arc<Gpio>> {
  (0..=3).map(Gpio::open).collect()
}

/// Relay channels in command order: `RELAY;N;...` drives the N-th entry.
/// Check the board schematic before touching these.
pub fn relay_mappings() -> Vec<GpioInfo> {
  vec![
    GpioInfo { controller: 1, pin_num: 12 },
    GpioInfo { controller: 1, pin_num: 13 },
    GpioInfo { controller: 1, pin_num: 14 },
    GpioInfo { controller: 1, pin_num: 15 },
  ]
}

/// Supply pin for the optocouplers on the relay driver board.
pub fn enable_mapping() -> Option<GpioInfo> {
  Some(GpioInfo { controller: 1, pin_num: 16 })
}

/// Materializes the relay pin list against the opened controller banks.
pub fn relay_pins(controllers: &[Arc<Gpio>]) -> Vec<Pin> {
  relay_mappings()
    .iter()
    .map(|info| controllers[info.controller].get_pin(info.pin_num))
    .collect()
}

/// Materializes the optocoupler supply pin, if this board has one.
pub fn enable_pin(controllers: &[Arc<Gpio>]) -> Option<Pin> {
  enable_mapping()
    .map(|info| controllers[info.controller].get_pin(info.pin_num))
}
