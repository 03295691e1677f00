//! Outbound adapters implementing the domain ports.

pub mod memory;
pub mod terminology;
