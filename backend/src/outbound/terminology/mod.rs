//! Outbound adapter for the upstream terminology service.

mod dto;
mod http_source;

pub use http_source::{SourceConfigError, TerminologyHttpSource};
