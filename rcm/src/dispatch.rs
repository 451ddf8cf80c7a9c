use crate::communication::Console;

/// Upper bound on the number of registered command handlers. The table is
/// populated once during bring-up, so hitting this is a configuration
/// mistake rather than anything a running board can do.
pub const MAX_HANDLERS: usize = 32;

/// What a handler decided about one input line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
  /// The handler accepted the line and acted on it; dispatch stops.
  Handled,

  /// The handler did not accept the line, either because it matches a
  /// different grammar or because it failed validation (in which case the
  /// handler has already reported the error). The next handler is tried.
  Rejected,
}

/// Attempts to interpret and act on one completed command line.
pub trait CommandHandler {
  /// Inspects `line` and acts on it if it matches this handler's grammar.
  /// Status and error text goes directly to `console`.
  fn handle(&mut self, line: &str, console: &mut dyn Console) -> Outcome;
}

/// Ordered table of command handlers.
///
/// Registration order is dispatch order, and the first handler to report
/// `Handled` wins. Lines nobody claims are dropped without comment; any
/// unknown-command messaging is a handler's own responsibility.
pub struct Dispatcher {
  handlers: Vec<Box<dyn CommandHandler>>,
}

impl Dispatcher {
  pub fn new() -> Self {
    Dispatcher {
      handlers: Vec::with_capacity(MAX_HANDLERS),
    }
  }

  /// Appends a handler to the table.
  ///
  /// Panics if the table is already full, which can only happen through a
  /// bring-up misconfiguration.
  pub fn register(&mut self, handler: Box<dyn CommandHandler>) {
    if self.handlers.len() == MAX_HANDLERS {
      panic!("Command handler table is full");
    }

    self.handlers.push(handler);
  }

  /// Offers `line` to each handler in registration order until one reports
  /// `Handled`.
  pub fn dispatch(&mut self, line: &str, console: &mut dyn Console) {
    for handler in &mut self.handlers {
      if handler.handle(line, console) == Outcome::Handled {
        return;
      }
    }
  }
}
