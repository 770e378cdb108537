//! Story domain model.
//!
//! # Responsibility
//! - Define the canonical story record shared by store, query and view layers.
//! - Own the wire shape of the story document (`camelCase`, ISO-8601 times).
//!
//! # Invariants
//! - Every story is identified by a stable `StoryId`.
//! - Deletion is a hard remove; there are no tombstones.

pub mod story;
