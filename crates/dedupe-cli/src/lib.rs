//! Library side of the `dedupe` command-line tool.

pub mod config;
pub mod logging;
pub mod pipeline;
