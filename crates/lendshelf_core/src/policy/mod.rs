//! Ownership rules for lendable items.
//!
//! # Responsibility
//! - Decide whether take/give-back requests are legal.
//! - Stay free of storage and I/O so rules are testable in isolation.
//!
//! # Invariants
//! - An item is held by at most one holder at a time.
//! - Only the current holder can release an item.

pub mod lending;
