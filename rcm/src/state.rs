use jeflog::pass;
use serialport::SerialPort;

use crate::{
  command::{RelayBank, RelayCommandHandler},
  communication::{open_port, Console, LineReader},
  dispatch::Dispatcher,
  pins,
  Args,
};

/// Firmware lifecycle, advanced one transition at a time from `main`.
pub enum State {
  Init(Args),
  MainLoop(MainLoopData),
}

pub struct MainLoopData {
  port: Box<dyn SerialPort>,
  reader: LineReader,
  dispatcher: Dispatcher,
}

impl State {
  pub fn next(self) -> Self {
    match self {
      State::Init(args) => init(args),
      State::MainLoop(data) => main_loop(data),
    }
  }
}

// Relays are safed before the serial port opens, so no command can observe
// the bank in an indeterminate state.
fn init(args: Args) -> State {
  let controllers = pins::open_controllers();

  let mut bank = RelayBank::new(
    pins::relay_pins(&controllers),
    pins::enable_pin(&controllers),
  );
  bank.init();
  pass!("Drove all {} relays to a safe state.", bank.relay_count());

  let mut dispatcher = Dispatcher::new();
  dispatcher.register(Box::new(RelayCommandHandler::new(bank)));

  let mut port = open_port(&args.device, args.baud);
  port.println("RELAY CONTROL MODULE");
  pass!("Listening for commands on {}.", args.device);

  State::MainLoop(MainLoopData {
    port,
    reader: LineReader::new(),
    dispatcher,
  })
}

fn main_loop(mut data: MainLoopData) -> State {
  data.reader.poll(&mut data.port, &mut data.dispatcher);

  State::MainLoop(data)
}
