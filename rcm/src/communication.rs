use jeflog::warn;
use serialport::SerialPort;
use std::{
  io::{ErrorKind, Read, Write},
  thread,
  time::Duration,
};

use crate::dispatch::Dispatcher;

/// Capacity of the input line buffer. Lines that outgrow it are dropped.
pub const INPUT_BUFFER_LENGTH: usize = 256;

/// Read timeout on the serial device, kept short so the polling loop never
/// parks for long when the host is quiet.
const SERIAL_TIMEOUT: Duration = Duration::from_millis(10);

/// Opens the serial device the host is attached to.
///
/// Retries until the device can be opened, since the USB adapter may
/// enumerate after this process starts during board bring-up.
pub fn open_port(device: &str, baud: u32) -> Box<dyn SerialPort> {
  loop {
    match serialport::new(device, baud).timeout(SERIAL_TIMEOUT).open() {
      Ok(port) => break port,
      Err(e) => {
        warn!("Could not open {device} ({e}), retrying...");
        thread::sleep(Duration::from_secs(1));
      }
    }
  }
}

/// Line-oriented writer for status text echoed back over the serial link.
pub trait Console {
  /// Writes `line` followed by the `\r\n` ending serial consoles expect.
  fn println(&mut self, line: &str);
}

impl<W: Write> Console for W {
  fn println(&mut self, line: &str) {
    if let Err(e) = write!(self, "{line}\r\n").and_then(|()| self.flush()) {
      warn!("Could not write to console ({e}), continuing...");
    }
  }
}

/// Accumulates serial input into complete command lines.
///
/// One instance lives for the whole process; the buffer is reused between
/// lines by resetting the cursor.
pub struct LineReader {
  buffer: [u8; INPUT_BUFFER_LENGTH],
  cursor: usize,
}

impl LineReader {
  pub fn new() -> Self {
    LineReader {
      buffer: [0; INPUT_BUFFER_LENGTH],
      cursor: 0,
    }
  }

  /// Consumes at most one pending input byte, returning immediately if none
  /// is available.
  ///
  /// A `\n` completes the current line, which is handed to `dispatcher`
  /// before this call returns; `\r` is discarded. A line that outgrows the
  /// buffer is dropped wholesale and accumulation starts over with the next
  /// byte.
  pub fn poll<P: Read + Write>(
    &mut self,
    port: &mut P,
    dispatcher: &mut Dispatcher,
  ) {
    let mut byte = [0u8; 1];
    match port.read(&mut byte) {
      Ok(0) => return,
      Ok(_) => {}
      Err(e) if e.kind() == ErrorKind::WouldBlock => return,
      Err(e) if e.kind() == ErrorKind::TimedOut => return,
      Err(e) => {
        warn!("Could not read from serial port ({e}), continuing...");
        return;
      }
    }

    match byte[0] {
      b'\r' => {}

      b'\n' => {
        let length = self.cursor;
        self.cursor = 0;

        let line = String::from_utf8_lossy(&self.buffer[..length]);
        dispatcher.dispatch(&line, port);
      }

      byte => {
        self.buffer[self.cursor] = byte;
        self.cursor += 1;

        if self.cursor == INPUT_BUFFER_LENGTH {
          warn!("Dropping {INPUT_BUFFER_LENGTH} bytes of input with no line ending.");
          self.cursor = 0;
        }
      }
    }
  }
}
