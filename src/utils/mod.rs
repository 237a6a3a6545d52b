//! Utility functions and helpers for the croply-relay service.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and secret scrubbing for log output.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
