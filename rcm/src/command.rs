use common::comm::{
  gpio::{
    DigitalOutput,
    PinValue::{self, High, Low},
  },
  rcm::RelayState,
};

use crate::{
  communication::Console,
  dispatch::{CommandHandler, Outcome},
};

// The relay board uses active-low drivers: pulling a control line low
// energizes the relay.
pub const RELAY_ON: PinValue = Low;
pub const RELAY_OFF: PinValue = High;

/// The relay channels on the board, in command order, plus the optocoupler
/// supply for the driver stage.
pub struct RelayBank<P: DigitalOutput> {
  relays: Vec<P>,
  enable: Option<P>,
}

impl<P: DigitalOutput> RelayBank<P> {
  pub fn new(relays: Vec<P>, enable: Option<P>) -> Self {
    RelayBank { relays, enable }
  }

  /// Number of relay channels this board exposes.
  pub fn relay_count(&self) -> usize {
    self.relays.len()
  }

  /// Claims every relay line as an output and forces the whole bank into a
  /// known all-off state, then powers the optocouplers on the driver stage.
  /// Must run before the first command is accepted.
  pub fn init(&mut self) {
    for pin in &mut self.relays {
      pin.set_output();
    }

    self.safe_relays();

    if let Some(enable) = &mut self.enable {
      enable.set_output();
      enable.digital_write(High);
    }
  }

  /// Drives every relay to the off state.
  pub fn safe_relays(&mut self) {
    for pin in &mut self.relays {
      pin.digital_write(RELAY_OFF);
    }
  }

  /// Drives relay `number` (1-based, as on the wire) to `state`. Callers
  /// are responsible for range-checking `number` first.
  pub fn actuate(&mut self, number: usize, state: RelayState) {
    if !(1..=self.relays.len()).contains(&number) {
      panic!("Invalid relay channel number");
    }

    let level = match state {
      RelayState::On => RELAY_ON,
      RelayState::Off => RELAY_OFF,
    };

    self.relays[number - 1].digital_write(level);
  }
}

/// Handles the `RELAY;<number>;<ON|OFF>` command grammar.
pub struct RelayCommandHandler<P: DigitalOutput> {
  bank: RelayBank<P>,
}

impl<P: DigitalOutput> RelayCommandHandler<P> {
  pub fn new(bank: RelayBank<P>) -> Self {
    RelayCommandHandler { bank }
  }
}

impl<P: DigitalOutput> CommandHandler for RelayCommandHandler<P> {
  fn handle(&mut self, line: &str, console: &mut dyn Console) -> Outcome {
    let mut tokens = line.split(';');

    if tokens.next() != Some("RELAY") {
      console.println("Invalid command");
      return Outcome::Rejected;
    }

    let number = parse_decimal(tokens.next().unwrap_or(""));
    if number < 1 || number > self.bank.relay_count() as i64 {
      console.println("Invalid relay number");
      return Outcome::Rejected;
    }

    let state = match tokens.next().unwrap_or("").parse::<RelayState>() {
      Ok(state) => state,
      Err(()) => {
        console.println("Invalid relay state");
        return Outcome::Rejected;
      }
    };

    self.bank.actuate(number as usize, state);
    console.println(&format!("Relay {number} is {state}"));

    Outcome::Handled
  }
}

/// Reads a leading base-10 integer out of `token` the way `strtol` does:
/// leading whitespace and an optional sign are allowed, digits are consumed
/// up to the first non-digit, and a token with no digits comes out as 0.
fn parse_decimal(token: &str) -> i64 {
  let token = token.trim_start();

  let (negative, digits) = match token.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, token.strip_prefix('+').unwrap_or(token)),
  };

  let mut value: i64 = 0;

  for c in digits.chars() {
    let Some(digit) = c.to_digit(10) else {
      break;
    };

    value = value.saturating_mul(10).saturating_add(digit as i64);
  }

  if negative {
    -value
  } else {
    value
  }
}
