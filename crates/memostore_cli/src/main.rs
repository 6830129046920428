//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memostore_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("memostore_core ping={}", memostore_core::ping());
    println!("memostore_core version={}", memostore_core::core_version());
}
