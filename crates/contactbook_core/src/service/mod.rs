//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into screen-level contact flows.
//! - Keep presentation/FFI layers decoupled from storage details.

pub mod contact_service;
