//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate sanitization, validation, persistence and audit appends.
//! - Keep the HTTP layer decoupled from storage details.

pub mod audit_service;
pub mod task_service;
