//! Repository layer abstractions and the in-memory story store.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for stories.
//! - Hold the authoritative ordered collection in process memory.
//!
//! # Invariants
//! - Repository writes must enforce `Story::validate()` before mutation.
//! - Lookup misses are reported as `None`/`false`, not as errors.

pub mod story_repo;
