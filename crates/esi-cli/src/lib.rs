//! Library components for the `elastic-import` CLI.

pub mod logging;
pub mod pipeline;
