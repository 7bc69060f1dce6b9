//! Client core for the team's fan and member app.
//!
//! The crate is laid out as a hexagon: `domain` holds entities, ports and
//! services; `inbound` drives them from the command line; `outbound` adapts
//! them to the hosted Firebase backend or to in-memory stand-ins.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
