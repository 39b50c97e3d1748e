//! Core use-case services.
//!
//! # Responsibility
//! - Gate every holder-facing operation behind token resolution.
//! - Orchestrate repository calls around the lending policy.
//! - Provide the administrative add flow for holders and items.
//!
//! # Invariants
//! - Unknown tokens and unknown items produce the same `NotFound` error.
//! - Services remain storage-agnostic (repository traits only).

pub mod access;
pub mod catalog_service;
pub mod lending_service;
