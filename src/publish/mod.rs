//! Publish entry parsing and handler invocation.

mod invoke;
mod spec;

pub use invoke::{Invocation, Invoker, ProcessInvoker, command_line};
pub use spec::{DEFAULT_KIND, Mode, Options, PublishSpec, SpecError, parse};

#[cfg(test)]
pub use invoke::MockInvoker;
