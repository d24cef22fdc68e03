//! Output sinks for the host's standard and error streams.
//!
//! Passed explicitly into the commands instead of being held as global
//! state, so tests can assert on exactly what the hook reports.

#[cfg_attr(test, mockall::automock)]
pub trait Console {
    /// Informational message on the host's output stream.
    fn write(&self, message: &str);

    /// Warning or failure report on the host's error stream.
    fn write_error(&self, message: &str);

    /// Whether successful handler stdout should be relayed.
    fn is_verbose(&self) -> bool;
}

pub struct StdConsole {
    verbose: bool,
}

impl StdConsole {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Console for StdConsole {
    fn write(&self, message: &str) {
        println!("{}", message);
    }

    fn write_error(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}
