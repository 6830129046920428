//! Core record store for memostore.
//! This crate is the single source of truth for memo persistence invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::memo::{Memo, MemoId, MemoValidationError, MEMO_TEXT_MAX_CHARS};
pub use repo::memo_repo::{
    MemoFilter, MemoRepository, RepoError, RepoResult, SqliteMemoRepository,
};
pub use repo::page::{Page, PageRequest, Sort, SortDirection, SortField, SortKey};
pub use service::memo_service::MemoService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
