//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model mutations and repository saves into use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod attendance_store;
