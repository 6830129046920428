//! Memo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD, range, paging and count APIs over `memos` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Memo::validate()` (or `validate_text`) before
//!   SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Multi-statement read-modify-write runs inside one immediate transaction
//!   that rolls back on every early exit.

use crate::db::DbError;
use crate::model::memo::{Memo, MemoId, MemoValidationError};
use crate::repo::page::{Page, PageRequest, SortDirection};
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MEMOS_TABLE: &str = "memos";
const REQUIRED_COLUMNS: [&str; 2] = ["id", "text"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for memo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed model validation before reaching storage.
    Validation(MemoValidationError),
    /// Query shape is malformed (e.g. zero page size).
    InvalidQuery(String),
    /// The addressed memo does not exist.
    NotFound(MemoId),
    /// An explicit-id insert collided with an existing identity.
    Conflict(MemoId),
    /// Backing store unreachable or erroring; never retried by the store.
    Unavailable(DbError),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidQuery(message) => write!(f, "invalid query: {message}"),
            Self::NotFound(id) => write!(f, "memo not found: {id}"),
            Self::Conflict(id) => write!(f, "memo id already exists: {id}"),
            Self::Unavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table is missing: {table}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column is missing: {table}.{column}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Unavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemoValidationError> for RepoError {
    fn from(value: MemoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Unavailable(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Unavailable(DbError::Sqlite(value))
    }
}

/// Filter options for paged and counted memo queries.
///
/// The default filter matches every row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoFilter {
    /// Strictly-greater-than bound on `id`.
    pub id_above: Option<MemoId>,
    /// Inclusive `id` window.
    pub id_within: Option<(MemoId, MemoId)>,
}

impl MemoFilter {
    /// Matches every row.
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches rows with `id` strictly greater than `threshold`.
    pub fn id_above(threshold: MemoId) -> Self {
        Self {
            id_above: Some(threshold),
            ..Self::default()
        }
    }

    /// Matches rows with `id` in the inclusive `[from, to]` window.
    pub fn id_within(from: MemoId, to: MemoId) -> Self {
        Self {
            id_within: Some((from, to)),
            ..Self::default()
        }
    }

    /// Appends this filter's predicates to a `WHERE 1 = 1` query.
    pub(crate) fn apply(&self, sql: &mut String, bind_values: &mut Vec<Value>) {
        if let Some(threshold) = self.id_above {
            sql.push_str(" AND id > ?");
            bind_values.push(Value::Integer(threshold));
        }
        if let Some((from, to)) = self.id_within {
            sql.push_str(" AND id BETWEEN ? AND ?");
            bind_values.push(Value::Integer(from));
            bind_values.push(Value::Integer(to));
        }
    }
}

/// Repository interface for memo store operations.
pub trait MemoRepository {
    /// Strict insert. An explicit duplicate id is a `Conflict`.
    fn create(&self, memo: &Memo) -> RepoResult<Memo>;
    /// Upsert-by-id: inserts when the id is absent, overwrites otherwise.
    fn save(&self, memo: &Memo) -> RepoResult<Memo>;
    /// Point lookup; an absent id is `None`, never an error.
    fn find_by_id(&self, id: MemoId) -> RepoResult<Option<Memo>>;
    /// Inclusive `id` range, ordered by `id` in the given direction.
    fn find_range(
        &self,
        from: MemoId,
        to: MemoId,
        direction: SortDirection,
    ) -> RepoResult<Vec<Memo>>;
    /// One page of matching rows plus totals computed over the same filter.
    fn find_page(&self, filter: &MemoFilter, request: &PageRequest) -> RepoResult<Page<Memo>>;
    /// Number of rows matching the filter.
    fn count(&self, filter: &MemoFilter) -> RepoResult<u64>;
    /// Targeted update of the text column; returns rows affected (0 when the
    /// id is absent).
    fn update_text(&self, id: MemoId, new_text: &str) -> RepoResult<usize>;
    /// Read-modify-write of the text field under one transaction.
    fn modify_text(&mut self, id: MemoId, apply: &dyn Fn(&str) -> String) -> RepoResult<Memo>;
    /// Removes one memo; an absent id is `NotFound`.
    fn delete_by_id(&self, id: MemoId) -> RepoResult<()>;
    /// Bulk delete below a threshold; returns rows removed.
    fn delete_where_id_less_than(&self, threshold: MemoId) -> RepoResult<usize>;
}

/// SQLite-backed memo repository.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Rejects connections whose schema version or table shape does not
    /// match what this binary was built against.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn create(&self, memo: &Memo) -> RepoResult<Memo> {
        memo.validate()?;

        match memo.id {
            Some(id) => {
                let inserted = self.conn.execute(
                    "INSERT INTO memos (id, text) VALUES (?1, ?2);",
                    params![id, memo.text.as_str()],
                );
                match inserted {
                    Ok(_) => Ok(Memo::with_id(id, memo.text.clone())),
                    Err(rusqlite::Error::SqliteFailure(failure, _))
                        if failure.code == ErrorCode::ConstraintViolation =>
                    {
                        Err(RepoError::Conflict(id))
                    }
                    Err(err) => Err(err.into()),
                }
            }
            None => {
                self.conn.execute(
                    "INSERT INTO memos (text) VALUES (?1);",
                    [memo.text.as_str()],
                )?;
                Ok(Memo::with_id(self.conn.last_insert_rowid(), memo.text.clone()))
            }
        }
    }

    fn save(&self, memo: &Memo) -> RepoResult<Memo> {
        memo.validate()?;

        match memo.id {
            None => self.create(memo),
            Some(id) => {
                self.conn.execute(
                    "INSERT INTO memos (id, text) VALUES (?1, ?2)
                     ON CONFLICT(id) DO UPDATE SET text = excluded.text;",
                    params![id, memo.text.as_str()],
                )?;
                Ok(Memo::with_id(id, memo.text.clone()))
            }
        }
    }

    fn find_by_id(&self, id: MemoId) -> RepoResult<Option<Memo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, text FROM memos WHERE id = ?1;")?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memo_row(row)?));
        }

        Ok(None)
    }

    fn find_range(
        &self,
        from: MemoId,
        to: MemoId,
        direction: SortDirection,
    ) -> RepoResult<Vec<Memo>> {
        let sql = format!(
            "SELECT id, text FROM memos WHERE id BETWEEN ?1 AND ?2 ORDER BY id {};",
            direction.sql_keyword()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![from, to])?;
        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            memos.push(parse_memo_row(row)?);
        }

        Ok(memos)
    }

    fn find_page(&self, filter: &MemoFilter, request: &PageRequest) -> RepoResult<Page<Memo>> {
        if request.size == 0 {
            return Err(RepoError::InvalidQuery(
                "page size must be at least 1".to_string(),
            ));
        }

        // Totals and the slice run over the identical predicate.
        let mut count_sql = String::from("SELECT COUNT(*) FROM memos WHERE 1 = 1");
        let mut count_binds: Vec<Value> = Vec::new();
        filter.apply(&mut count_sql, &mut count_binds);
        let total_elements: i64 =
            self.conn
                .query_row(&count_sql, params_from_iter(count_binds), |row| row.get(0))?;

        let mut sql = String::from("SELECT id, text FROM memos WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        filter.apply(&mut sql, &mut bind_values);
        sql.push(' ');
        sql.push_str(&request.sort.order_by_clause());
        sql.push_str(" LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(i64::from(request.size)));
        bind_values.push(Value::Integer(request.offset()));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut content = Vec::new();
        while let Some(row) = rows.next()? {
            content.push(parse_memo_row(row)?);
        }

        Ok(Page::assemble(content, request, total_elements as u64))
    }

    fn count(&self, filter: &MemoFilter) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM memos WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        filter.apply(&mut sql, &mut bind_values);

        let total: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        Ok(total as u64)
    }

    fn update_text(&self, id: MemoId, new_text: &str) -> RepoResult<usize> {
        Memo::validate_text(new_text)?;

        let changed = self.conn.execute(
            "UPDATE memos SET text = ?2 WHERE id = ?1;",
            params![id, new_text],
        )?;
        Ok(changed)
    }

    fn modify_text(&mut self, id: MemoId, apply: &dyn Fn(&str) -> String) -> RepoResult<Memo> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: Option<String> = tx
            .query_row("SELECT text FROM memos WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(current) = current else {
            return Err(RepoError::NotFound(id));
        };

        let next = apply(current.as_str());
        Memo::validate_text(&next)?;

        tx.execute(
            "UPDATE memos SET text = ?2 WHERE id = ?1;",
            params![id, next.as_str()],
        )?;
        tx.commit()?;

        Ok(Memo::with_id(id, next))
    }

    fn delete_by_id(&self, id: MemoId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM memos WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_where_id_less_than(&self, threshold: MemoId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM memos WHERE id < ?1;", [threshold])?;
        Ok(removed)
    }
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let id: MemoId = row.get("id")?;
    let text: String = row.get("text")?;

    let memo = Memo::with_id(id, text);
    memo.validate()
        .map_err(|err| RepoError::InvalidData(format!("memo {id} failed validation: {err}")))?;
    Ok(memo)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 =
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = crate::db::migrations::latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, MEMOS_TABLE)? {
        return Err(RepoError::MissingRequiredTable(MEMOS_TABLE));
    }

    for column in REQUIRED_COLUMNS {
        if !column_exists(conn, MEMOS_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: MEMOS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table_name: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn column_exists(conn: &Connection, table_name: &str, column_name: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM pragma_table_info(?1)
            WHERE name = ?2
        );",
        params![table_name, column_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
