//! Database introspection
//!
//! This module defines the narrow contract the navigator needs from a
//! database: catalog listings, planner statistics, statistics refresh and
//! rolled-back ad-hoc queries. Each supported database has its own
//! feature-gated submodule.

use async_trait::async_trait;

use crate::prelude::NavigatorError;
use crate::schema::{Column, ColumnStatistic, ForeignKey, Index, QueryRows};

/// Everything the catalog reports about one table
///
/// Columns come back exactly as declared; the `primary_key` and `indexed`
/// flags are derived later by the navigator. An unknown table yields the
/// default value (no oid, every list empty).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableDefinition {
    pub oid: Option<u32>,
    pub columns: Vec<Column>,
    pub primary_keys: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
}

/// Trait for database introspection implementations
///
/// Implementations are shared by every request handled concurrently, so
/// they must not hold per-request state. Listings of unknown schemas or
/// tables return empty results rather than errors.
#[async_trait]
pub trait Introspector: Send + Sync {
    /// Names of user visible schemas, ordered by name
    async fn schema_names(&self) -> Result<Vec<String>, NavigatorError>;

    /// Names of the tables in a schema, ordered by name
    async fn table_names(&self, schema: &str) -> Result<Vec<String>, NavigatorError>;

    /// Columns, keys and indexes of a table, all in catalog order
    async fn table_definition(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<TableDefinition, NavigatorError>;

    /// Statistics rows for every analysed column of a table
    async fn table_stats(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnStatistic>, NavigatorError>;

    /// Statistics row of a single column, `None` when nothing was collected
    async fn column_stats(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<Option<ColumnStatistic>, NavigatorError>;

    /// Recompute planner statistics for a table, or one of its columns,
    /// and commit
    async fn analyze(
        &self,
        schema: &str,
        table: &str,
        column: Option<&str>,
    ) -> Result<(), NavigatorError>;

    /// Run a query inside a transaction that is always rolled back
    async fn run_query(&self, query: &str) -> Result<QueryRows, NavigatorError>;
}

#[cfg(test)]
pub(crate) mod memory;

// Feature-gated database implementations
#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PostgresIntrospector;
