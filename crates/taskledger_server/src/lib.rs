//! HTTP server for TaskLedger.

pub mod api;
pub mod config;
