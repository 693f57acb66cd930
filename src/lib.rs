// src/lib.rs
// Behaviour-driven test harness for verifiable credential transparency logs

pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod http;
pub mod merkle;
pub mod retry;
pub mod runner;
pub mod steps;

pub use error::{HarnessError, Result};
