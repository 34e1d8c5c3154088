//! Metadata aggregation
//!
//! The navigator turns catalog records from an [`Introspector`] into the
//! documents served to clients: annotated table views, statistics and
//! cross-schema search results.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::introspect::Introspector;
use crate::prelude::NavigatorError;
use crate::schema::{Column, ColumnStatistic, Index, SearchMatch};

mod document;

pub use document::{
    Document, QueryResult, SchemaList, SearchResults, TableList, TableStats, TableView,
};

/// Aggregates introspection calls into documents
///
/// Cheap to clone; every clone shares the same introspector.
#[derive(Clone)]
pub struct Navigator {
    introspector: Arc<dyn Introspector>,
}

impl Navigator {
    pub fn new(introspector: Arc<dyn Introspector>) -> Self {
        Self { introspector }
    }

    pub async fn schemas(&self) -> Result<SchemaList, NavigatorError> {
        let schemas = self.introspector.schema_names().await?;
        debug!(count = ?schemas.len(), "Found schemas");
        Ok(SchemaList { schemas })
    }

    /// Search schema and table names for `query`, which must be lowercase
    ///
    /// A schema whose name matches contributes itself and all of its tables;
    /// otherwise only its matching tables are returned.
    pub async fn search(&self, query: &str) -> Result<SearchResults, NavigatorError> {
        let mut matches = Vec::new();

        for schema in self.introspector.schema_names().await? {
            let tables = self.introspector.table_names(&schema).await?;

            if schema.to_lowercase().contains(query) {
                matches.push(SearchMatch::schema(&schema));
                matches.extend(tables.iter().map(|t| SearchMatch::table(&schema, t)));
            } else {
                matches.extend(
                    tables
                        .iter()
                        .filter(|t| t.to_lowercase().contains(query))
                        .map(|t| SearchMatch::table(&schema, t)),
                );
            }
        }

        debug!(query = ?query, matches = ?matches.len(), "Search complete");
        Ok(SearchResults {
            query: query.to_string(),
            matches,
        })
    }

    pub async fn tables(&self, schema: &str) -> Result<TableList, NavigatorError> {
        let tables = self.introspector.table_names(schema).await?;
        debug!(schema = ?schema, count = ?tables.len(), "Found tables");
        Ok(TableList {
            schema: schema.to_string(),
            tables,
        })
    }

    /// Describe a table; an unknown table comes back with no columns
    pub async fn table(&self, schema: &str, table: &str) -> Result<TableView, NavigatorError> {
        let definition = self.introspector.table_definition(schema, table).await?;
        let columns = annotate_columns(
            definition.columns,
            &definition.primary_keys,
            &definition.indexes,
        );

        Ok(TableView {
            schema: schema.to_string(),
            name: table.to_string(),
            oid: definition.oid,
            columns,
            primary_keys: definition.primary_keys,
            foreign_keys: definition.foreign_keys,
            indexes: definition.indexes,
        })
    }

    pub async fn table_stats(&self, schema: &str, table: &str) -> Result<TableStats, NavigatorError> {
        let columns = self.introspector.table_stats(schema, table).await?;
        Ok(TableStats {
            schema: schema.to_string(),
            table: table.to_string(),
            columns,
        })
    }

    /// Statistics of one column
    ///
    /// Unlike the listings this fails with `NotFound` when the column has
    /// never been analysed.
    pub async fn column_stats(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<ColumnStatistic, NavigatorError> {
        self.introspector
            .column_stats(schema, table, column)
            .await?
            .ok_or_else(|| NavigatorError::NotFound {
                schema: schema.to_string(),
                table: table.to_string(),
                column: column.to_string(),
            })
    }

    pub async fn refresh_table_stats(&self, schema: &str, table: &str) -> Result<(), NavigatorError> {
        info!(schema = ?schema, table = ?table, "Refreshing table statistics");
        self.introspector.analyze(schema, table, None).await
    }

    pub async fn refresh_column_stats(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<(), NavigatorError> {
        info!(schema = ?schema, table = ?table, column = ?column, "Refreshing column statistics");
        self.introspector.analyze(schema, table, Some(column)).await
    }

    /// Run an ad-hoc query; nothing it changes is kept
    ///
    /// An empty query is not sent to the database.
    pub async fn query(&self, query: &str) -> Result<QueryResult, NavigatorError> {
        let result = if query.trim().is_empty() {
            None
        } else {
            Some(self.introspector.run_query(query).await?)
        };

        Ok(QueryResult {
            query: query.to_string(),
            result,
        })
    }
}

/// Flag each column as primary key and/or indexed
///
/// A column counts as indexed when any index lists it, whatever its position
/// in that index.
pub fn annotate_columns(
    columns: Vec<Column>,
    primary_keys: &[String],
    indexes: &[Index],
) -> Vec<Column> {
    let indexed: HashSet<&str> = indexes
        .iter()
        .flat_map(|index| index.column_names.iter().map(String::as_str))
        .collect();

    columns
        .into_iter()
        .map(|mut column| {
            column.primary_key = primary_keys.iter().any(|pk| *pk == column.name);
            column.indexed = indexed.contains(column.name.as_str());
            column
        })
        .collect()
}
