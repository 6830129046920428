//! Domain model for memo records.
//!
//! # Responsibility
//! - Define the canonical record shape persisted by the store.
//! - Own the text validation rules enforced before any SQL mutation.
//!
//! # Invariants
//! - A persisted memo always carries a store-assigned `id`.
//! - Memo text is never empty and never longer than 200 characters.

pub mod memo;
