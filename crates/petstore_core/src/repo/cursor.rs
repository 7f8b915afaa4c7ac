//! Forward-only cursor over `pets` query results.
//!
//! # Responsibility
//! - Hold a prepared statement until the caller steps through it.
//! - Decode rows by column name into `PetRow` / `Pet`.
//!
//! # Invariants
//! - Rows are fetched one at a time; nothing is buffered ahead of `next()`.
//! - Invalid persisted values surface as `RepoError::InvalidData`.

use crate::contract::{
    COLUMN_ID, COLUMN_PET_BREED, COLUMN_PET_GENDER, COLUMN_PET_NAME, COLUMN_PET_WEIGHT,
};
use crate::model::pet::{Gender, Pet, PetId};
use crate::repo::pet_repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Row, Rows, Statement};

/// Prepared query whose rows have not been read yet.
pub struct PetCursor<'conn> {
    stmt: Statement<'conn>,
    args: Vec<Value>,
    columns: Vec<&'static str>,
}

impl<'conn> PetCursor<'conn> {
    pub(crate) fn new(stmt: Statement<'conn>, args: Vec<Value>, columns: Vec<&'static str>) -> Self {
        Self {
            stmt,
            args,
            columns,
        }
    }

    /// Projected column names in result order.
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Executes the statement and returns a row iterator.
    ///
    /// Each call restarts from the first row.
    pub fn rows(&mut self) -> RepoResult<PetRows<'_>> {
        let rows = self.stmt.query(params_from_iter(self.args.iter()))?;
        Ok(PetRows {
            rows,
            columns: &self.columns,
        })
    }

    /// Drains the cursor into decoded rows.
    pub fn collect_rows(&mut self) -> RepoResult<Vec<PetRow>> {
        self.rows()?.collect()
    }

    /// Drains the cursor into full records. Requires every column projected.
    pub fn collect_pets(&mut self) -> RepoResult<Vec<Pet>> {
        self.rows()?.map(|row| row?.to_pet()).collect()
    }
}

/// Iterator stepping the underlying SQLite statement.
pub struct PetRows<'stmt> {
    rows: Rows<'stmt>,
    columns: &'stmt [&'static str],
}

impl Iterator for PetRows<'_> {
    type Item = RepoResult<PetRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next() {
            Ok(Some(row)) => Some(read_row(row, self.columns)),
            Ok(None) => None,
            Err(err) => Some(Err(err.into())),
        }
    }
}

/// One result row keyed by projected column name.
#[derive(Debug, Clone, PartialEq)]
pub struct PetRow {
    fields: Vec<(&'static str, Value)>,
}

impl PetRow {
    /// Raw value of `column`, or `None` when it was not projected.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn get_i64(&self, column: &str) -> RepoResult<Option<i64>> {
        match self.projected(column)? {
            Value::Null => Ok(None),
            Value::Integer(value) => Ok(Some(*value)),
            other => Err(type_mismatch(column, "integer", other)),
        }
    }

    pub fn get_text(&self, column: &str) -> RepoResult<Option<&str>> {
        match self.projected(column)? {
            Value::Null => Ok(None),
            Value::Text(value) => Ok(Some(value.as_str())),
            other => Err(type_mismatch(column, "text", other)),
        }
    }

    pub fn id(&self) -> RepoResult<PetId> {
        self.get_i64(COLUMN_ID)?
            .ok_or_else(|| RepoError::InvalidData(format!("null value in pets.{COLUMN_ID}")))
    }

    /// Decodes the row into a full record.
    pub fn to_pet(&self) -> RepoResult<Pet> {
        let name = self
            .get_text(COLUMN_PET_NAME)?
            .ok_or_else(|| RepoError::InvalidData(format!("null value in pets.{COLUMN_PET_NAME}")))?
            .to_string();

        let gender_code = self.get_i64(COLUMN_PET_GENDER)?.unwrap_or(0);
        let gender = Gender::from_code(gender_code).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid gender code `{gender_code}` in pets.{COLUMN_PET_GENDER}"
            ))
        })?;

        Ok(Pet {
            id: self.id()?,
            name,
            breed: self.get_text(COLUMN_PET_BREED)?.map(str::to_string),
            gender,
            weight: self.get_i64(COLUMN_PET_WEIGHT)?.unwrap_or(0),
        })
    }

    fn projected(&self, column: &str) -> RepoResult<&Value> {
        self.get(column).ok_or_else(|| {
            RepoError::InvalidData(format!("column `{column}` is not in the projection"))
        })
    }
}

fn read_row(row: &Row<'_>, columns: &[&'static str]) -> RepoResult<PetRow> {
    let mut fields = Vec::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        fields.push((*column, row.get::<_, Value>(index)?));
    }
    Ok(PetRow { fields })
}

fn type_mismatch(column: &str, expected: &str, actual: &Value) -> RepoError {
    RepoError::InvalidData(format!(
        "expected {expected} in pets.{column}, found {:?}",
        actual.data_type()
    ))
}
