// croply-relay - image analysis relay for a hosted vision inference workflow
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod error;
pub mod inference;
pub mod metrics;
pub mod models;
pub mod server;
pub mod staging;
pub mod utils;
