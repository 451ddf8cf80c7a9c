use common::comm::gpio::{DigitalOutput, PinMode, PinValue};
use std::{
  collections::VecDeque,
  io::{self, ErrorKind, Read, Write},
  sync::{Arc, Mutex},
};

use crate::{
  communication::Console,
  dispatch::{CommandHandler, Outcome},
};

/// Test double for a GPIO pin which records everything written to it.
#[derive(Clone)]
pub struct MockPin {
  pub mode: Arc<Mutex<Option<PinMode>>>,
  pub writes: Arc<Mutex<Vec<PinValue>>>,
}

impl MockPin {
  pub fn new() -> Self {
    Self {
      mode: Arc::new(Mutex::new(None)),
      writes: Arc::new(Mutex::new(Vec::new())),
    }
  }

  /// Level most recently written, if any.
  pub fn level(&self) -> Option<PinValue> {
    self.writes.lock().unwrap().last().copied()
  }

  pub fn write_count(&self) -> usize {
    self.writes.lock().unwrap().len()
  }
}

impl DigitalOutput for MockPin {
  fn set_output(&mut self) {
    *self.mode.lock().unwrap() = Some(PinMode::Output);
  }

  fn digital_write(&mut self, value: PinValue) {
    self.writes.lock().unwrap().push(value);
  }
}

/// Command handler double which records the lines offered to it and reports
/// a fixed outcome.
pub struct RecordingHandler {
  lines: Arc<Mutex<Vec<String>>>,
  outcome: Outcome,
}

impl RecordingHandler {
  pub fn new(outcome: Outcome) -> Self {
    RecordingHandler {
      lines: Arc::new(Mutex::new(Vec::new())),
      outcome,
    }
  }

  /// Handle onto the line log, for asserting after the handler is boxed.
  pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
    self.lines.clone()
  }
}

impl CommandHandler for RecordingHandler {
  fn handle(&mut self, line: &str, _console: &mut dyn Console) -> Outcome {
    self.lines.lock().unwrap().push(line.to_owned());
    self.outcome
  }
}

/// In-memory stand-in for the serial device: reads drain `input`, writes
/// land in `output`, and an empty `input` times out like a quiet port.
pub struct FakePort {
  pub input: VecDeque<u8>,
  pub output: Vec<u8>,
}

impl FakePort {
  pub fn new(input: &[u8]) -> Self {
    FakePort {
      input: input.iter().copied().collect(),
      output: Vec::new(),
    }
  }
}

impl Read for FakePort {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    match self.input.pop_front() {
      Some(byte) => {
        buf[0] = byte;
        Ok(1)
      }
      None => Err(io::Error::new(ErrorKind::TimedOut, "no pending input")),
    }
  }
}

impl Write for FakePort {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.output.extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}
