//! Address-book use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into caller-facing entry points.
//! - Keep CLI and other front ends decoupled from storage details.

pub mod contact_service;
