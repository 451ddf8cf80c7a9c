// Memory-mapped GPIO access. The AM335x has four built-in GPIO controllers,
// each responsible for 32 pins and controlled through one page of registers.
// Each 32-bit word in the page has a specific function (pin configuration,
// setting a pin state); each bit in a word controls one pin. Choose the
// function by choosing the word, choose the pin by choosing the bit.
//
// https://kilobaser.com/beaglebone-black-gpios/

use libc::{c_int, c_void, off_t, size_t};
use std::{
  ffi::CString,
  sync::{Arc, Mutex},
};

const GPIO_BASE_REGISTERS: [off_t; 4] =
  [0x44E0_7000, 0x4804_C000, 0x481A_C000, 0x481A_E000];
const GPIO_REGISTER_SIZE: size_t = 0xFFF;

const GPIO_OE_REGISTER: isize = 0x134;
const GPIO_DATAOUT_REGISTER: isize = 0x13C;

/// Electrical level of a digital line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PinValue {
  /// The line is pulled to ground.
  Low = 0,

  /// The line is driven to the supply rail.
  High = 1,
}

/// Direction of a pin as seen by the output-enable register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PinMode {
  /// The pin drives its line.
  Output,

  /// The pin reads its line.
  Input,
}

/// Capability to drive one digital line.
///
/// The relay firmware only ever needs to claim a line as an output and set
/// its level, so this is the whole surface. It is also the seam that lets
/// the command core run against recorded pins in tests instead of hardware.
pub trait DigitalOutput {
  /// Claims the line as an output.
  fn set_output(&mut self);

  /// Drives the line to `value`.
  fn digital_write(&mut self, value: PinValue);
}

/// One of the four GPIO controller banks, mapped into this process.
pub struct Gpio {
  fd: c_int,
  base: Mutex<*mut c_void>,
  oe: Mutex<*mut u32>,
  dataout: Mutex<*mut u32>,
}

unsafe impl Send for Gpio {}
unsafe impl Sync for Gpio {}

/// A single pin on an opened controller bank.
pub struct Pin {
  gpio: Arc<Gpio>,
  index: usize,
}

impl Drop for Gpio {
  fn drop(&mut self) {
    unsafe {
      libc::munmap(*self.base.lock().unwrap(), GPIO_REGISTER_SIZE);
      libc::close(self.fd);
    };
  }
}

impl Gpio {
  /// Maps the registers of controller bank `index` out of `/dev/mem`.
  ///
  /// Panics if the memory device cannot be opened or mapped, since nothing
  /// on the board can be actuated without register access.
  pub fn open(index: usize) -> Arc<Gpio> {
    let path = CString::new("/dev/mem").unwrap();
    let fd = unsafe { libc::open(path.as_ptr(), libc::O_RDWR) };

    if fd < 0 {
      panic!("Cannot open memory device");
    }

    let base = unsafe {
      libc::mmap(
        std::ptr::null_mut(),
        GPIO_REGISTER_SIZE,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_SHARED,
        fd,
        GPIO_BASE_REGISTERS[index],
      )
    };

    if base.is_null() {
      panic!("Cannot map GPIO");
    }

    let oe = Mutex::new(unsafe { base.offset(GPIO_OE_REGISTER) as *mut u32 });

    let dataout =
      Mutex::new(unsafe { base.offset(GPIO_DATAOUT_REGISTER) as *mut u32 });

    let base = Mutex::new(base);

    Arc::new(Gpio { fd, base, oe, dataout })
  }

  /// Hands out pin `index` of this bank.
  pub fn get_pin(self: &Arc<Self>, index: usize) -> Pin {
    Pin {
      gpio: self.clone(),
      index,
    }
  }
}

impl Pin {
  /// Sets the direction of this pin in the output-enable register.
  pub fn mode(&self, mode: PinMode) {
    let oe = self.gpio.oe.lock().unwrap();
    let mut bits = unsafe { std::ptr::read_volatile(*oe) };

    bits = match mode {
      PinMode::Output => bits & !(1 << self.index),
      PinMode::Input => bits | (1 << self.index),
    };

    unsafe { std::ptr::write_volatile(*oe, bits) };
  }

  /// Drives this pin to `value`.
  pub fn digital_write(&self, value: PinValue) {
    let dataout = self.gpio.dataout.lock().unwrap();
    let mut bits = unsafe { std::ptr::read_volatile(*dataout) };

    bits = match value {
      PinValue::Low => bits & !(1 << self.index),
      PinValue::High => bits | (1 << self.index),
    };

    unsafe { std::ptr::write_volatile(*dataout, bits) };
  }
}

impl DigitalOutput for Pin {
  fn set_output(&mut self) {
    self.mode(PinMode::Output);
  }

  fn digital_write(&mut self, value: PinValue) {
    Pin::digital_write(self, value);
  }
}
