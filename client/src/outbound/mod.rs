//! Driven adapters.
//!
//! `memory` holds stateful in-process stand-ins; `firebase` talks to the
//! hosted backend over REST.

pub mod firebase;
pub mod memory;
