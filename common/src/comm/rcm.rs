use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Logical state of a single relay channel.
///
/// The wire grammar spells these as the case-sensitive literals `ON` and
/// `OFF`; `Display` and `FromStr` round-trip exactly those spellings.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayState {
  /// The relay coil is energized and the switched load is connected.
  On,

  /// The relay coil is released and the switched load is disconnected.
  Off,
}

impl fmt::Display for RelayState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::On => write!(f, "ON"),
      Self::Off => write!(f, "OFF"),
    }
  }
}

impl FromStr for RelayState {
  type Err = ();

  fn from_str(string: &str) -> Result<Self, Self::Err> {
    match string {
      "ON" => Ok(RelayState::On),
      "OFF" => Ok(RelayState::Off),
      _ => Err(()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wire_literals_round_trip() {
    assert_eq!("ON".parse(), Ok(RelayState::On));
    assert_eq!("OFF".parse(), Ok(RelayState::Off));
    assert_eq!(RelayState::On.to_string(), "ON");
    assert_eq!(RelayState::Off.to_string(), "OFF");
  }

  #[test]
  fn literals_are_case_sensitive() {
    assert_eq!("on".parse::<RelayState>(), Err(()));
    assert_eq!("Off".parse::<RelayState>(), Err(()));
    assert_eq!("".parse::<RelayState>(), Err(()));
    assert_eq!("ON ".parse::<RelayState>(), Err(()));
  }
}
