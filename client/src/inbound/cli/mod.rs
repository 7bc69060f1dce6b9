//! Command-line driving adapter.
//!
//! Each invocation plays one screen action: optionally sign in with the
//! global credentials, run the command against the driving ports, and report
//! the result as data plus a transient notice.

mod args;
mod dispatch;
mod ports;

pub use args::{Cli, Command, RaceArgs};
pub use dispatch::{Outcome, run};
pub use ports::CliPorts;
