//! Inbound adapters that translate user intents into domain service calls.
//!
//! The CLI under [`cli`] stands in for the app's screens; [`notice`] turns
//! domain outcomes into the short transient messages those screens show.

pub mod cli;
pub mod notice;
