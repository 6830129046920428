//! Pagination and sorting primitives for memo queries.
//!
//! # Responsibility
//! - Describe page requests (zero-based number, size, sort keys).
//! - Assemble page results with derived totals.
//!
//! # Invariants
//! - Rendered ORDER BY clauses always end in a deterministic `id` tie-break,
//!   so equal-key rows come back in a stable order across repeated calls.
//! - `total_pages` is `ceil(total_elements / size)`.

use serde::{Deserialize, Serialize};

/// Sortable columns of the memo table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Text,
}

impl SortField {
    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Text => "text",
        }
    }
}

/// Sort direction for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub(crate) fn sql_keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// One sort criterion: a column plus a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Ordered list of sort criteria applied before pagination slicing.
///
/// An empty sort means ascending by `id`, which is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    keys: Vec<SortKey>,
}

impl Sort {
    /// Natural order: ascending by `id`.
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Starts a sort with a single key.
    pub fn by(field: SortField, direction: SortDirection) -> Self {
        Self {
            keys: vec![SortKey { field, direction }],
        }
    }

    /// Appends a lower-priority key to the sort.
    pub fn then(mut self, field: SortField, direction: SortDirection) -> Self {
        self.keys.push(SortKey { field, direction });
        self
    }

    /// The configured keys, in priority order.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Renders the ORDER BY clause for this sort.
    ///
    /// Column names come from the `SortField` enum, never from caller input.
    /// A trailing `id ASC` tie-break is appended unless the caller already
    /// sorts on `id`.
    pub(crate) fn order_by_clause(&self) -> String {
        if self.keys.is_empty() {
            return "ORDER BY id ASC".to_string();
        }

        let mut rendered: Vec<String> = self
            .keys
            .iter()
            .map(|key| format!("{} {}", key.field.column(), key.direction.sql_keyword()))
            .collect();

        if !self.keys.iter().any(|key| key.field == SortField::Id) {
            rendered.push("id ASC".to_string());
        }

        format!("ORDER BY {}", rendered.join(", "))
    }
}

/// A request for one slice of a query result.
///
/// Page numbers are zero-based. A `size` of zero is rejected by the
/// repository before any SQL runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
    pub sort: Sort,
}

impl PageRequest {
    /// A page request in natural order.
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number,
            size,
            sort: Sort::default(),
        }
    }

    /// A page request with explicit sort keys.
    pub fn sorted(number: u32, size: u32, sort: Sort) -> Self {
        Self { number, size, sort }
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.number).saturating_mul(i64::from(self.size))
    }
}

/// One slice of a query result plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Builds a page from a content slice and the total match count.
    ///
    /// A request past the last page yields empty content with accurate
    /// totals; this constructor does not treat that as an error.
    pub fn assemble(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(u64::from(request.size));
        Self {
            content,
            number: request.number,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    /// Whether a later page with content exists.
    pub fn has_next(&self) -> bool {
        u64::from(self.number) + 1 < self.total_pages
    }

    /// Whether this is page zero.
    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    /// Whether no later page with content exists.
    pub fn is_last(&self) -> bool {
        !self.has_next()
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageRequest, Sort, SortDirection, SortField};

    #[test]
    fn empty_sort_renders_natural_order() {
        assert_eq!(Sort::unsorted().order_by_clause(), "ORDER BY id ASC");
    }

    #[test]
    fn non_id_sort_gets_id_tie_break() {
        let sort = Sort::by(SortField::Text, SortDirection::Ascending);
        assert_eq!(sort.order_by_clause(), "ORDER BY text ASC, id ASC");
    }

    #[test]
    fn id_sort_is_not_tie_broken_twice() {
        let sort = Sort::by(SortField::Id, SortDirection::Descending);
        assert_eq!(sort.order_by_clause(), "ORDER BY id DESC");
    }

    #[test]
    fn composite_sort_preserves_key_priority() {
        let sort = Sort::by(SortField::Text, SortDirection::Ascending)
            .then(SortField::Id, SortDirection::Descending);
        assert_eq!(sort.order_by_clause(), "ORDER BY text ASC, id DESC");
    }

    #[test]
    fn offset_is_number_times_size() {
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 25).offset(), 75);
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest::new(0, 10);
        assert_eq!(Page::<i64>::assemble(vec![], &request, 100).total_pages, 10);
        assert_eq!(Page::<i64>::assemble(vec![], &request, 101).total_pages, 11);
        assert_eq!(Page::<i64>::assemble(vec![], &request, 0).total_pages, 0);
    }

    #[test]
    fn derived_flags_track_page_position() {
        let first = Page::assemble(vec![1, 2], &PageRequest::new(0, 2), 5);
        assert!(first.is_first());
        assert!(first.has_next());
        assert!(!first.is_last());

        let last = Page::assemble(vec![5], &PageRequest::new(2, 2), 5);
        assert!(!last.is_first());
        assert!(!last.has_next());
        assert!(last.is_last());

        let past_the_end = Page::<i64>::assemble(vec![], &PageRequest::new(9, 2), 5);
        assert!(!past_the_end.has_next());
        assert!(past_the_end.is_last());
    }
}
