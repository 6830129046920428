use memostore_core::db::open_db_in_memory;
use memostore_core::{
    Memo, MemoFilter, MemoRepository, PageRequest, RepoError, Sort, SortDirection, SortField,
    SqliteMemoRepository,
};

#[test]
fn first_page_of_hundred_memos_is_ids_one_through_ten() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    seed_sample_memos(&repo, 100);

    let page = repo
        .find_page(&MemoFilter::any(), &PageRequest::new(0, 10))
        .unwrap();

    assert_eq!(ids_of(&page.content), (1..=10).collect::<Vec<_>>());
    assert_eq!(page.content[0].text, "Sample...1");
    assert_eq!(page.total_elements, 100);
    assert_eq!(page.total_pages, 10);
    assert!(page.is_first());
    assert!(page.has_next());
    assert!(!page.is_last());
}

#[test]
fn last_page_has_no_next() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    seed_sample_memos(&repo, 100);

    let page = repo
        .find_page(&MemoFilter::any(), &PageRequest::new(9, 10))
        .unwrap();

    assert_eq!(ids_of(&page.content), (91..=100).collect::<Vec<_>>());
    assert!(!page.is_first());
    assert!(!page.has_next());
    assert!(page.is_last());
}

#[test]
fn page_past_the_end_is_empty_with_accurate_totals() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    seed_sample_memos(&repo, 100);

    let page = repo
        .find_page(&MemoFilter::any(), &PageRequest::new(10, 10))
        .unwrap();

    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 100);
    assert_eq!(page.total_pages, 10);
    assert!(!page.has_next());
}

#[test]
fn zero_page_size_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();

    let err = repo
        .find_page(&MemoFilter::any(), &PageRequest::new(0, 0))
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidQuery(_)));
}

#[test]
fn id_above_filter_pages_only_matching_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    seed_sample_memos(&repo, 100);

    let page = repo
        .find_page(&MemoFilter::id_above(90), &PageRequest::new(0, 10))
        .unwrap();

    assert_eq!(ids_of(&page.content), (91..=100).collect::<Vec<_>>());
    assert_eq!(page.total_elements, 10);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn id_window_filter_with_descending_sort_pages_through_the_window() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    seed_sample_memos(&repo, 100);

    let filter = MemoFilter::id_within(70, 80);
    let sort = Sort::by(SortField::Id, SortDirection::Descending);

    let first = repo
        .find_page(&filter, &PageRequest::sorted(0, 5, sort.clone()))
        .unwrap();
    assert_eq!(ids_of(&first.content), vec![80, 79, 78, 77, 76]);
    assert_eq!(first.total_elements, 11);
    assert_eq!(first.total_pages, 3);

    let last = repo
        .find_page(&filter, &PageRequest::sorted(2, 5, sort))
        .unwrap();
    assert_eq!(ids_of(&last.content), vec![70]);
    assert!(last.is_last());
}

#[test]
fn composite_sort_breaks_text_ties_by_descending_id() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();

    for text in ["b", "a", "b", "a"] {
        repo.create(&Memo::new(text)).unwrap();
    }

    let sort = Sort::by(SortField::Text, SortDirection::Ascending)
        .then(SortField::Id, SortDirection::Descending);
    let page = repo
        .find_page(&MemoFilter::any(), &PageRequest::sorted(0, 10, sort))
        .unwrap();

    assert_eq!(ids_of(&page.content), vec![4, 2, 3, 1]);
}

#[test]
fn equal_sort_keys_come_back_in_stable_order() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();

    for _ in 0..6 {
        repo.create(&Memo::new("same text")).unwrap();
    }

    let sort = Sort::by(SortField::Text, SortDirection::Ascending);
    let request = PageRequest::sorted(0, 10, sort);

    let first_read = repo.find_page(&MemoFilter::any(), &request).unwrap();
    let second_read = repo.find_page(&MemoFilter::any(), &request).unwrap();

    // The implicit id tie-break keeps repeated reads identical.
    assert_eq!(ids_of(&first_read.content), (1..=6).collect::<Vec<_>>());
    assert_eq!(ids_of(&first_read.content), ids_of(&second_read.content));
}

#[test]
fn find_range_descending_returns_exact_window() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    seed_sample_memos(&repo, 100);

    let window = repo.find_range(70, 80, SortDirection::Descending).unwrap();

    assert_eq!(ids_of(&window), (70..=80).rev().collect::<Vec<_>>());
    assert_eq!(window[0].text, "Sample...80");
}

#[test]
fn find_range_ascending_returns_exact_window() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    seed_sample_memos(&repo, 30);

    let window = repo.find_range(10, 12, SortDirection::Ascending).unwrap();
    assert_eq!(ids_of(&window), vec![10, 11, 12]);
}

#[test]
fn find_range_with_inverted_bounds_is_empty() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    seed_sample_memos(&repo, 10);

    let window = repo.find_range(8, 3, SortDirection::Ascending).unwrap();
    assert!(window.is_empty());
}

#[test]
fn count_matches_filters() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&mut conn).unwrap();
    seed_sample_memos(&repo, 100);

    assert_eq!(repo.count(&MemoFilter::any()).unwrap(), 100);
    assert_eq!(repo.count(&MemoFilter::id_within(10, 20)).unwrap(), 11);
    assert_eq!(repo.count(&MemoFilter::id_above(95)).unwrap(), 5);
    assert_eq!(repo.count(&MemoFilter::id_above(100)).unwrap(), 0);
}

fn seed_sample_memos(repo: &impl MemoRepository, count: usize) {
    for i in 1..=count {
        repo.create(&Memo::new(format!("Sample...{i}"))).unwrap();
    }
}

fn ids_of(memos: &[Memo]) -> Vec<i64> {
    memos.iter().map(|memo| memo.id.unwrap()).collect()
}
