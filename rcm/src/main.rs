mod command;
mod communication;
mod dispatch;
#[cfg(test)]
mod mocks;
mod pins;
mod state;

use clap::Parser;
use state::State;

/// Command-line arguments for the relay control module
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// Serial device the host is attached to
  #[arg(long, default_value = "/dev/ttyS1")]
  pub device: String,

  /// Baud rate of the serial link
  #[arg(long, default_value_t = 9600)]
  pub baud: u32,
}

fn main() {
  let args = Args::parse();
  let mut state = State::Init(args);

  loop {
    state = state.next();
  }
}
