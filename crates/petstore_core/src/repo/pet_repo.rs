//! SQLite execution of pet table operations.
//!
//! # Responsibility
//! - Build SQL for selection-driven reads and writes on `pets`.
//! - Report storage failures as typed `RepoError` values.
//!
//! # Invariants
//! - Only fields present in a `PetValues` payload are written.
//! - Selection clauses are bound with positional `?` parameters only.

use crate::contract::{
    known_column, ALL_COLUMNS, COLUMN_ID, COLUMN_PET_BREED, COLUMN_PET_GENDER, COLUMN_PET_NAME,
    COLUMN_PET_WEIGHT, TABLE_NAME,
};
use crate::db::DbError;
use crate::model::pet::{PetId, PetValues};
use crate::repo::cursor::PetCursor;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level failure for pet table operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Projection named a column the `pets` table does not have.
    UnknownColumn(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UnknownColumn(column) => write!(f, "unknown pets column `{column}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UnknownColumn(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row filter: an optional `WHERE` fragment plus its bound arguments.
///
/// A missing or blank clause selects every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub clause: Option<String>,
    pub args: Vec<Value>,
}

impl Selection {
    /// Selects every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<I, V>(clause: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            clause: Some(clause.into()),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Selects exactly the row with the given identity.
    pub fn by_id(id: PetId) -> Self {
        Self {
            clause: Some(format!("{COLUMN_ID} = ?")),
            args: vec![Value::Integer(id)],
        }
    }

    /// Returns whether this selection matches all rows.
    pub fn is_unfiltered(&self) -> bool {
        self.clause
            .as_deref()
            .map_or(true, |clause| clause.trim().is_empty())
    }

    fn where_sql(&self) -> String {
        match self.clause.as_deref().map(str::trim) {
            Some(clause) if !clause.is_empty() => format!(" WHERE ({clause})"),
            _ => String::new(),
        }
    }
}

/// Executes table operations on a borrowed connection.
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Prepares a query over `pets` and returns an unstepped cursor.
    ///
    /// `projection = None` selects `ALL_COLUMNS`. A blank `sort_order` is
    /// treated as absent.
    pub fn query(
        &self,
        projection: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> RepoResult<PetCursor<'conn>> {
        let columns = resolve_projection(projection)?;
        let mut sql = format!(
            "SELECT {} FROM {TABLE_NAME}{}",
            columns.join(", "),
            selection.where_sql()
        );
        if let Some(order) = sort_order.map(str::trim).filter(|order| !order.is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        let stmt = self.conn.prepare(&sql)?;
        Ok(PetCursor::new(stmt, selection.args.clone(), columns))
    }

    /// Inserts one row from the present payload fields.
    ///
    /// Returns `None` when storage reports no row written.
    pub fn insert(&self, values: &PetValues) -> RepoResult<Option<PetId>> {
        let (columns, bind_values) = payload_columns(values);
        let sql = if columns.is_empty() {
            format!("INSERT INTO {TABLE_NAME} DEFAULT VALUES;")
        } else {
            let placeholders = vec!["?"; columns.len()].join(", ");
            format!(
                "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders});",
                columns.join(", ")
            )
        };

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Ok(None);
        }

        let id = self.conn.last_insert_rowid();
        Ok((id > 0).then_some(id))
    }

    /// Rewrites the present payload fields on every selected row.
    ///
    /// An empty payload modifies nothing and returns 0.
    pub fn update(&self, values: &PetValues, selection: &Selection) -> RepoResult<usize> {
        let (columns, mut bind_values) = payload_columns(values);
        if columns.is_empty() {
            return Ok(0);
        }

        let assignments = columns
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {TABLE_NAME} SET {assignments}{};",
            selection.where_sql()
        );
        bind_values.extend(selection.args.iter().cloned());

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    /// Deletes every selected row.
    pub fn delete(&self, selection: &Selection) -> RepoResult<usize> {
        let sql = format!("DELETE FROM {TABLE_NAME}{};", selection.where_sql());
        let changed = self
            .conn
            .execute(&sql, params_from_iter(selection.args.iter()))?;
        Ok(changed)
    }

    /// Counts all rows in `pets`.
    pub fn count(&self) -> RepoResult<u64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {TABLE_NAME};"),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
    }
}

fn resolve_projection(projection: Option<&[&str]>) -> RepoResult<Vec<&'static str>> {
    match projection {
        None => Ok(ALL_COLUMNS.to_vec()),
        Some([]) => Ok(ALL_COLUMNS.to_vec()),
        Some(requested) => requested
            .iter()
            .map(|name| {
                known_column(name.trim()).ok_or_else(|| RepoError::UnknownColumn(name.to_string()))
            })
            .collect(),
    }
}

fn payload_columns(values: &PetValues) -> (Vec<&'static str>, Vec<Value>) {
    let mut columns = Vec::with_capacity(4);
    let mut bind_values = Vec::with_capacity(4);

    if let Some(name) = &values.name {
        columns.push(COLUMN_PET_NAME);
        bind_values.push(Value::Text(name.clone()));
    }
    if let Some(breed) = &values.breed {
        columns.push(COLUMN_PET_BREED);
        bind_values.push(Value::Text(breed.clone()));
    }
    if let Some(gender) = values.gender {
        columns.push(COLUMN_PET_GENDER);
        bind_values.push(Value::Integer(gender));
    }
    if let Some(weight) = values.weight {
        columns.push(COLUMN_PET_WEIGHT);
        bind_values.push(Value::Integer(weight));
    }

    (columns, bind_values)
}
