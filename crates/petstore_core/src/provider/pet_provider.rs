//! Route-aware CRUD entry points over the `pets` table.
//!
//! # Responsibility
//! - Resolve each identifier to a `Route` before touching storage.
//! - Enforce payload invariants on insert and update.
//! - Rewrite item routes into identity-filtered table operations.
//!
//! # Invariants
//! - Rejected payloads never reach storage; the connection is not even opened.
//! - Item routes ignore caller selections and target exactly one identity.
//! - Insert is only valid on the collection route.
//! - Failures are returned as `ProviderError`, never panicked on.

use crate::contract::{CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE};
use crate::db::PetDbHelper;
use crate::model::pet::{PetValidationError, PetValues, ValidationPolicy};
use crate::provider::router::{with_appended_id, PetUriMatcher, Route};
use crate::repo::cursor::PetCursor;
use crate::repo::pet_repo::{RepoError, Selection, SqlitePetRepository};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Provider operation, carried by routing errors and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Insert,
    Update,
    Delete,
    GetType,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::GetType => "get_type",
        }
    }
}

/// Typed failure of one provider call.
#[derive(Debug)]
pub enum ProviderError {
    /// Identifier matches no registered shape, or a shape the operation
    /// does not accept.
    UnrecognizedRoute { operation: Operation, uri: String },
    Validation(PetValidationError),
    /// Storage accepted the insert call but assigned no identity.
    InsertFailed { uri: String },
    Storage(RepoError),
}

impl ProviderError {
    /// Short text suitable for a transient user notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::InsertFailed { .. } => "Error with saving pet".to_string(),
            Self::Storage(_) => "Error with pet storage".to_string(),
            Self::UnrecognizedRoute { .. } => "Unsupported pet address".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnrecognizedRoute { .. } => "unrecognized_route",
            Self::Validation(PetValidationError::MissingName) => "missing_name",
            Self::Validation(PetValidationError::InvalidGender(_)) => "invalid_gender",
            Self::Validation(PetValidationError::InvalidWeight(_)) => "invalid_weight",
            Self::InsertFailed { .. } => "insert_failed",
            Self::Storage(_) => "storage_failure",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedRoute { operation, uri } => {
                write!(f, "cannot {} unknown uri `{uri}`", operation.as_str())
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::InsertFailed { uri } => write!(f, "failed to insert row for `{uri}`"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::UnrecognizedRoute { .. } | Self::InsertFailed { .. } => None,
        }
    }
}

impl From<PetValidationError> for ProviderError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProviderError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

impl From<crate::db::DbError> for ProviderError {
    fn from(value: crate::db::DbError) -> Self {
        Self::Storage(RepoError::Db(value))
    }
}

/// Mediator between identifier-addressed callers and the `pets` table.
///
/// Holds no record state of its own; one instance is built by the process
/// entry point and shared by reference.
pub struct PetProvider {
    helper: PetDbHelper,
    matcher: PetUriMatcher,
    policy: ValidationPolicy,
}

impl PetProvider {
    pub fn new(helper: PetDbHelper, matcher: PetUriMatcher, policy: ValidationPolicy) -> Self {
        Self {
            helper,
            matcher,
            policy,
        }
    }

    pub fn matcher(&self) -> &PetUriMatcher {
        &self.matcher
    }

    pub fn helper(&self) -> &PetDbHelper {
        &self.helper
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Queries pets addressed by `uri`.
    ///
    /// # Contract
    /// - Collection route: selection and sort order pass through unchanged.
    /// - Item route: selection is replaced by the identity filter.
    /// - Returns an unstepped cursor; rows are read on demand.
    pub fn query(
        &self,
        uri: &str,
        projection: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> ProviderResult<PetCursor<'_>> {
        let started_at = Instant::now();
        let route = self.matcher.classify(uri);
        let result = self.query_route(route, uri, projection, selection, sort_order);
        log_outcome(Operation::Query, route, started_at, &result, |_| None);
        result
    }

    /// Inserts one pet and returns `uri` with the new identity appended.
    ///
    /// # Contract
    /// - Only the collection route is accepted.
    /// - Validation order: name present, gender valid, weight non-negative.
    pub fn insert(&self, uri: &str, values: &PetValues) -> ProviderResult<String> {
        let started_at = Instant::now();
        let route = self.matcher.classify(uri);
        let result = self.insert_route(route, uri, values);
        log_outcome(Operation::Insert, route, started_at, &result, |_| None);
        result
    }

    /// Updates pets addressed by `uri` and returns the modified row count.
    ///
    /// # Contract
    /// - Payload is validated per the configured `ValidationPolicy`.
    /// - Collection route with a blank selection updates every row.
    /// - Zero rows modified is a success.
    pub fn update(
        &self,
        uri: &str,
        values: &PetValues,
        selection: &Selection,
    ) -> ProviderResult<usize> {
        let started_at = Instant::now();
        let route = self.matcher.classify(uri);
        let result = self.update_route(route, uri, values, selection);
        log_outcome(Operation::Update, route, started_at, &result, |rows| Some(*rows));
        result
    }

    /// Deletes pets addressed by `uri` and returns the removed row count.
    ///
    /// Deleting an identity that no longer exists returns 0.
    pub fn delete(&self, uri: &str, selection: &Selection) -> ProviderResult<usize> {
        let started_at = Instant::now();
        let route = self.matcher.classify(uri);
        let result = self.delete_route(route, uri, selection);
        log_outcome(Operation::Delete, route, started_at, &result, |rows| Some(*rows));
        result
    }

    /// Returns the content-type tag for `uri`.
    pub fn get_type(&self, uri: &str) -> ProviderResult<&'static str> {
        let started_at = Instant::now();
        let route = self.matcher.classify(uri);
        let result = match route {
            Route::Collection => Ok(CONTENT_LIST_TYPE),
            Route::Item(_) => Ok(CONTENT_ITEM_TYPE),
            Route::Unrecognized => Err(unrecognized(Operation::GetType, uri)),
        };
        log_outcome(Operation::GetType, route, started_at, &result, |_| None);
        result
    }
}

impl PetProvider {
    fn query_route(
        &self,
        route: Route,
        uri: &str,
        projection: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> ProviderResult<PetCursor<'_>> {
        let selection = scoped_selection(route, selection, Operation::Query, uri)?;
        let conn = self.helper.readable()?;
        let cursor = SqlitePetRepository::new(conn).query(projection, &selection, sort_order)?;
        Ok(cursor)
    }

    fn insert_route(&self, route: Route, uri: &str, values: &PetValues) -> ProviderResult<String> {
        if route != Route::Collection {
            return Err(unrecognized(Operation::Insert, uri));
        }
        values.validate_for_insert()?;

        let conn = self.helper.writable()?;
        let id = SqlitePetRepository::new(conn)
            .insert(values)?
            .ok_or_else(|| ProviderError::InsertFailed {
                uri: uri.to_string(),
            })?;
        Ok(with_appended_id(uri, id))
    }

    fn update_route(
        &self,
        route: Route,
        uri: &str,
        values: &PetValues,
        selection: &Selection,
    ) -> ProviderResult<usize> {
        let selection = scoped_selection(route, selection, Operation::Update, uri)?;
        values.validate_for_update(self.policy)?;
        if values.is_empty() {
            return Ok(0);
        }

        let conn = self.helper.writable()?;
        let changed = SqlitePetRepository::new(conn).update(values, &selection)?;
        Ok(changed)
    }

    fn delete_route(&self, route: Route, uri: &str, selection: &Selection) -> ProviderResult<usize> {
        let selection = scoped_selection(route, selection, Operation::Delete, uri)?;
        let conn = self.helper.writable()?;
        let changed = SqlitePetRepository::new(conn).delete(&selection)?;
        Ok(changed)
    }
}

fn scoped_selection(
    route: Route,
    selection: &Selection,
    operation: Operation,
    uri: &str,
) -> ProviderResult<Selection> {
    match route {
        Route::Collection => Ok(selection.clone()),
        Route::Item(id) => Ok(Selection::by_id(id)),
        Route::Unrecognized => Err(unrecognized(operation, uri)),
    }
}

fn unrecognized(operation: Operation, uri: &str) -> ProviderError {
    ProviderError::UnrecognizedRoute {
        operation,
        uri: uri.to_string(),
    }
}

fn log_outcome<T>(
    operation: Operation,
    route: Route,
    started_at: Instant,
    result: &ProviderResult<T>,
    rows_of: impl FnOnce(&T) -> Option<usize>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(value) => match rows_of(value) {
            Some(rows) => info!(
                "event=provider_{} module=provider status=ok route={} rows={} duration_ms={}",
                operation.as_str(),
                route.kind(),
                rows,
                duration_ms
            ),
            None => info!(
                "event=provider_{} module=provider status=ok route={} duration_ms={}",
                operation.as_str(),
                route.kind(),
                duration_ms
            ),
        },
        Err(err) if matches!(err, ProviderError::Validation(_)) => warn!(
            "event=provider_{} module=provider status=rejected route={} duration_ms={} error_code={}",
            operation.as_str(),
            route.kind(),
            duration_ms,
            err.error_code()
        ),
        Err(err) => error!(
            "event=provider_{} module=provider status=error route={} duration_ms={} error_code={} error={}",
            operation.as_str(),
            route.kind(),
            duration_ms,
            err.error_code(),
            err
        ),
    }
}
