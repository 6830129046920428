//! Memo use-case service.
//!
//! # Responsibility
//! - Provide stable store entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::memo::{Memo, MemoId};
use crate::repo::memo_repo::{MemoFilter, MemoRepository, RepoResult};
use crate::repo::page::{Page, PageRequest, SortDirection};

/// Use-case service wrapper for memo store operations.
pub struct MemoService<R: MemoRepository> {
    repo: R,
}

impl<R: MemoRepository> MemoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a memo from plain text and returns the persisted record.
    pub fn create_memo(&self, text: impl Into<String>) -> RepoResult<Memo> {
        self.repo.create(&Memo::new(text))
    }

    /// Inserts or overwrites a memo by id.
    pub fn save(&self, memo: &Memo) -> RepoResult<Memo> {
        self.repo.save(memo)
    }

    /// Gets one memo by id; absent ids are `None`.
    pub fn get_memo(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        self.repo.find_by_id(id)
    }

    /// Lists one page of memos matching the filter.
    pub fn list_page(&self, filter: &MemoFilter, request: &PageRequest) -> RepoResult<Page<Memo>> {
        self.repo.find_page(filter, request)
    }

    /// Lists memos in an inclusive id window, ordered by id.
    pub fn list_range(
        &self,
        from: MemoId,
        to: MemoId,
        direction: SortDirection,
    ) -> RepoResult<Vec<Memo>> {
        self.repo.find_range(from, to, direction)
    }

    /// Counts memos matching the filter.
    pub fn count(&self, filter: &MemoFilter) -> RepoResult<u64> {
        self.repo.count(filter)
    }

    /// Replaces only the text of a memo; returns rows affected.
    pub fn update_text(&self, id: MemoId, new_text: &str) -> RepoResult<usize> {
        self.repo.update_text(id, new_text)
    }

    /// Rewrites a memo's text from its current value in one transaction.
    ///
    /// The closure sees the stored text and returns the replacement; the
    /// read and the write share a single transaction, so concurrent writers
    /// cannot interleave between them.
    pub fn rewrite_text(
        &mut self,
        id: MemoId,
        apply: impl Fn(&str) -> String,
    ) -> RepoResult<Memo> {
        self.repo.modify_text(id, &apply)
    }

    /// Deletes one memo by id.
    pub fn delete_memo(&self, id: MemoId) -> RepoResult<()> {
        self.repo.delete_by_id(id)
    }

    /// Deletes every memo with id below the threshold; returns rows removed.
    pub fn purge_below(&self, threshold: MemoId) -> RepoResult<usize> {
        self.repo.delete_where_id_less_than(threshold)
    }
}
