//! In-memory catalog used by unit tests in place of a live database.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{Introspector, TableDefinition};
use crate::prelude::NavigatorError;
use crate::schema::{Column, ColumnStatistic, DataType, Index, QueryRows};

#[derive(Debug, Clone)]
pub struct MemoryTable {
    pub schema: String,
    pub name: String,
    pub definition: TableDefinition,
    pub rows: i64,
}

#[derive(Debug, Default)]
struct State {
    stats: Vec<ColumnStatistic>,
    analyze_calls: usize,
    rollbacks: usize,
}

/// Catalog with a fixed set of schemas and tables
///
/// `analyze` fills in statistics rows; `run_query` understands just enough
/// SQL to count rows and to pretend to delete them.
#[derive(Debug, Default)]
pub struct MemoryIntrospector {
    schemas: Vec<String>,
    tables: Vec<MemoryTable>,
    state: Mutex<State>,
}

impl MemoryIntrospector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schemas.push(schema.to_string());
        self
    }

    pub fn with_table(mut self, schema: &str, name: &str, definition: TableDefinition) -> Self {
        self.tables.push(MemoryTable {
            schema: schema.to_string(),
            name: name.to_string(),
            definition,
            rows: 100,
        });
        self
    }

    /// `public.test(id integer primary key, value integer)` with an index on
    /// `value`, plus an empty `analytics` schema
    pub fn sample() -> Self {
        let definition = TableDefinition {
            oid: Some(16384),
            columns: vec![
                Column::new("id", DataType::Integer).not_null(),
                Column::new("value", DataType::Integer),
                Column::new("legacy", DataType::Null),
            ],
            primary_keys: vec!["id".to_string()],
            foreign_keys: vec![],
            indexes: vec![Index {
                name: "test_value_idx".to_string(),
                column_names: vec!["value".to_string()],
                unique: false,
            }],
        };

        Self::new()
            .with_schema("analytics")
            .with_schema("public")
            .with_table("public", "test", definition)
    }

    pub fn analyze_calls(&self) -> usize {
        self.lock().analyze_calls
    }

    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn find(&self, schema: &str, table: &str) -> Option<&MemoryTable> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == table)
    }
}

#[async_trait]
impl Introspector for MemoryIntrospector {
    async fn schema_names(&self) -> Result<Vec<String>, NavigatorError> {
        Ok(self.schemas.clone())
    }

    async fn table_names(&self, schema: &str) -> Result<Vec<String>, NavigatorError> {
        let mut names: Vec<String> = self
            .tables
            .iter()
            .filter(|t| t.schema == schema)
            .map(|t| t.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn table_definition(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<TableDefinition, NavigatorError> {
        Ok(self
            .find(schema, table)
            .map(|t| t.definition.clone())
            .unwrap_or_default())
    }

    async fn table_stats(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnStatistic>, NavigatorError> {
        Ok(self
            .lock()
            .stats
            .iter()
            .filter(|s| s.schema == schema && s.table == table)
            .cloned()
            .collect())
    }

    async fn column_stats(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<Option<ColumnStatistic>, NavigatorError> {
        Ok(self
            .lock()
            .stats
            .iter()
            .find(|s| s.schema == schema && s.table == table && s.column == column)
            .cloned())
    }

    async fn analyze(
        &self,
        schema: &str,
        table: &str,
        column: Option<&str>,
    ) -> Result<(), NavigatorError> {
        let found = self.find(schema, table).ok_or_else(|| {
            NavigatorError::Database(format!("relation \"{}.{}\" does not exist", schema, table))
        })?;

        let mut state = self.lock();
        state.analyze_calls += 1;
        for col in &found.definition.columns {
            if column.is_some_and(|c| c != col.name) {
                continue;
            }
            state
                .stats
                .retain(|s| !(s.schema == schema && s.table == table && s.column == col.name));
            let mut stat = ColumnStatistic::empty(schema, table, &col.name);
            stat.null_frac = Some(0.0);
            stat.avg_width = Some(4);
            stat.n_distinct = Some(-1.0);
            stat.histogram_bounds = Some(vec!["1".to_string(), "100".to_string()]);
            stat.correlation = Some(1.0);
            state.stats.push(stat);
        }
        Ok(())
    }

    async fn run_query(&self, query: &str) -> Result<QueryRows, NavigatorError> {
        let lowered = query.trim().to_lowercase();
        let result = if lowered.trim_end_matches(';').contains(';') {
            Err("cannot insert multiple commands into a prepared statement".to_string())
        } else if let Some(table) = lowered.strip_prefix("select count(*) from ") {
            match self.tables.iter().find(|t| t.name == table.trim()) {
                Some(found) => Ok(QueryRows {
                    columns: vec!["count".to_string()],
                    rows: vec![vec![Some(found.rows.to_string())]],
                }),
                None => Err(format!("relation \"{}\" does not exist", table.trim())),
            }
        } else if lowered.starts_with("delete from ") {
            // Deleted rows vanish with the rollback below
            Ok(QueryRows::default())
        } else {
            Err(format!("syntax error at or near \"{}\"", query))
        };

        self.lock().rollbacks += 1;
        result.map_err(NavigatorError::MalformedQuery)
    }
}
