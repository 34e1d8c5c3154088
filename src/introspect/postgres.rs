use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use tokio_postgres::{NoTls, Row, SimpleQueryMessage};
use tracing::{debug, error, info, trace};

use super::{Introspector, TableDefinition};
use crate::prelude::{DbConfig, NavigatorError};
use crate::schema::{Column, ColumnStatistic, DataType, ForeignKey, Index, QueryRows};

/// PostgreSQL introspector
///
/// Holds a connection pool and checks one connection out per call. Pooled
/// connections are opened lazily, so building the introspector never touches
/// the database.
#[derive(Clone)]
pub struct PostgresIntrospector {
    pool: Pool,
}

impl PostgresIntrospector {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Build a pool from connection settings without connecting
    pub fn from_config(config: &DbConfig) -> Result<Self, NavigatorError> {
        info!(
            connection = ?config.redacted_connection_string(),
            pool_size = ?config.pool_size,
            "Configuring PostgreSQL pool"
        );

        let pg_config: tokio_postgres::Config =
            config.postgres_connection_string().parse().map_err(|e| {
                error!(error = ?e, "Invalid connection settings");
                NavigatorError::Config(format!(
                    "Invalid PostgreSQL connection settings ({}): {}",
                    config.redacted_connection_string(),
                    e
                ))
            })?;

        let mut manager_config = ManagerConfig::default();
        manager_config.recycling_method = RecyclingMethod::Fast;

        let manager = Manager::from_config(pg_config, NoTls, manager_config);
        let pool = Pool::builder(manager)
            .max_size(config.pool_size)
            .build()
            .map_err(|e| NavigatorError::Connection(format!("Failed to build pool: {}", e)))?;

        Ok(Self::new(pool))
    }

    async fn connection(&self) -> Result<Object, NavigatorError> {
        self.pool.get().await.map_err(|e| {
            error!(error = ?e, "Failed to acquire database connection");
            NavigatorError::Connection(e.to_string())
        })
    }
}

#[async_trait]
impl Introspector for PostgresIntrospector {
    async fn schema_names(&self) -> Result<Vec<String>, NavigatorError> {
        let client = self.connection().await?;
        query_schemas(&client).await
    }

    async fn table_names(&self, schema: &str) -> Result<Vec<String>, NavigatorError> {
        let client = self.connection().await?;
        query_tables(&client, schema).await
    }

    async fn table_definition(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<TableDefinition, NavigatorError> {
        debug!(schema = ?schema, table = ?table, "Introspecting table");
        let client = self.connection().await?;

        let oid = query_table_oid(&client, schema, table).await?;
        if oid.is_none() {
            debug!(schema = ?schema, table = ?table, "Table not found");
            return Ok(TableDefinition::default());
        }

        let columns = query_columns(&client, schema, table).await?;
        trace!(table = ?table, columns = ?columns.len(), "Found columns");

        let primary_keys = query_primary_key(&client, schema, table).await?;
        trace!(table = ?table, primary_key = ?primary_keys, "Found primary key");

        let foreign_keys = query_foreign_keys(&client, schema, table).await?;
        trace!(table = ?table, foreign_keys = ?foreign_keys.len(), "Found foreign keys");

        let indexes = query_indexes(&client, schema, table).await?;
        trace!(table = ?table, indexes = ?indexes.len(), "Found indexes");

        Ok(TableDefinition {
            oid,
            columns,
            primary_keys,
            foreign_keys,
            indexes,
        })
    }

    async fn table_stats(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnStatistic>, NavigatorError> {
        let client = self.connection().await?;
        query_stats(&client, schema, table, None).await
    }

    async fn column_stats(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<Option<ColumnStatistic>, NavigatorError> {
        let client = self.connection().await?;
        let mut stats = query_stats(&client, schema, table, Some(column)).await?;
        // Non-inherited row sorts first
        Ok(if stats.is_empty() {
            None
        } else {
            Some(stats.swap_remove(0))
        })
    }

    async fn analyze(
        &self,
        schema: &str,
        table: &str,
        column: Option<&str>,
    ) -> Result<(), NavigatorError> {
        let sql = analyze_statement(schema, table, column);
        info!(sql = %sql, "Refreshing statistics");

        let mut client = self.connection().await?;
        let tx = client.transaction().await.map_err(database_error)?;
        tx.batch_execute(&sql).await.map_err(database_error)?;
        tx.commit().await.map_err(database_error)?;

        debug!(schema = ?schema, table = ?table, column = ?column, "Statistics refreshed");
        Ok(())
    }

    async fn run_query(&self, query: &str) -> Result<QueryRows, NavigatorError> {
        info!(query = %query, "Running ad-hoc query");

        let mut client = self.connection().await?;
        let tx = client.transaction().await.map_err(database_error)?;
        // A prepared statement holds one command, so multi-statement text fails here
        let result = match tx.prepare(query).await {
            Ok(_) => tx.simple_query(query).await,
            Err(e) => Err(e),
        };
        tx.rollback().await.map_err(database_error)?;
        debug!("Ad-hoc query rolled back");

        let messages = result.map_err(|e| {
            error!(error = ?e, "Ad-hoc query failed");
            NavigatorError::MalformedQuery(e.to_string())
        })?;

        Ok(collect_rows(messages))
    }
}

fn database_error(e: tokio_postgres::Error) -> NavigatorError {
    error!(error = ?e, "Database error");
    NavigatorError::Database(e.to_string())
}

fn introspection_error(schema: &str, what: &str, e: tokio_postgres::Error) -> NavigatorError {
    error!(schema = ?schema, error = ?e, "Failed to query {}", what);
    NavigatorError::Introspection {
        schema: schema.to_string(),
        message: format!("Failed to query {}: {}", what, e),
    }
}

/// Query all schema names, leaving out the `pg_` system namespaces
async fn query_schemas(client: &Object) -> Result<Vec<String>, NavigatorError> {
    trace!("Querying schemas");

    let sql = r#"
        SELECT n.nspname::text AS schema_name
        FROM pg_namespace n
        WHERE n.nspname NOT LIKE 'pg\_%'
        ORDER BY n.nspname
    "#;

    let rows = client
        .query(sql, &[])
        .await
        .map_err(|e| introspection_error("*", "schemas", e))?;

    let schemas = rows.iter().map(|row| row.get("schema_name")).collect();
    trace!(schemas = ?schemas, "Schemas found");
    Ok(schemas)
}

/// Query all table names in a schema
async fn query_tables(client: &Object, schema_name: &str) -> Result<Vec<String>, NavigatorError> {
    trace!(schema = ?schema_name, "Querying tables");

    let sql = r#"
        SELECT c.relname::text AS table_name
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE c.relkind IN ('r', 'p')
            AND n.nspname = $1
        ORDER BY c.relname
    "#;

    let rows = client
        .query(sql, &[&schema_name])
        .await
        .map_err(|e| introspection_error(schema_name, "tables", e))?;

    let tables = rows.iter().map(|row| row.get("table_name")).collect();
    trace!(tables = ?tables, "Tables found");
    Ok(tables)
}

async fn query_table_oid(
    client: &Object,
    schema_name: &str,
    table_name: &str,
) -> Result<Option<u32>, NavigatorError> {
    let sql = r#"
        SELECT c.oid AS table_oid
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE c.relname = $1
            AND n.nspname = $2
            AND c.relkind IN ('r', 'p', 'v', 'm', 'f')
    "#;

    let row = client
        .query_opt(sql, &[&table_name, &schema_name])
        .await
        .map_err(|e| introspection_error(schema_name, "table oid", e))?;

    Ok(row.map(|row| row.get("table_oid")))
}

/// Query all columns for a table
async fn query_columns(
    client: &Object,
    schema_name: &str,
    table_name: &str,
) -> Result<Vec<Column>, NavigatorError> {
    trace!(schema = ?schema_name, table = ?table_name, "Querying columns");

    let sql = r#"
        SELECT
            a.attname::text AS column_name,
            format_type(a.atttypid, a.atttypmod) AS data_type,
            NOT a.attnotnull AS is_nullable,
            pg_get_expr(d.adbin, d.adrelid) AS default_value
        FROM pg_attribute a
        JOIN pg_class c ON c.oid = a.attrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        LEFT JOIN pg_attrdef d ON d.adrelid = c.oid AND d.adnum = a.attnum
        WHERE c.relname = $1
            AND n.nspname = $2
            AND a.attnum > 0
            AND NOT a.attisdropped
        ORDER BY a.attnum
    "#;

    let rows = client
        .query(sql, &[&table_name, &schema_name])
        .await
        .map_err(|e| introspection_error(schema_name, "columns", e))?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let column_name: String = row.get("column_name");
        let data_type_str: Option<String> = row.get("data_type");
        let is_nullable: bool = row.get("is_nullable");
        let default_value: Option<String> = row.get("default_value");

        let data_type = data_type_str
            .as_deref()
            .map(parse_data_type)
            .unwrap_or(DataType::Null);

        trace!(
            column = ?column_name,
            data_type = ?data_type_str,
            parsed_type = ?data_type,
            is_nullable = ?is_nullable,
            "Parsed column"
        );

        columns.push(Column {
            name: column_name,
            data_type,
            nullable: is_nullable,
            default: default_value,
            primary_key: false,
            indexed: false,
        });
    }

    Ok(columns)
}

/// Query primary key columns for a table
async fn query_primary_key(
    client: &Object,
    schema_name: &str,
    table_name: &str,
) -> Result<Vec<String>, NavigatorError> {
    let sql = r#"
        SELECT a.attname::text AS column_name
        FROM pg_constraint con
        JOIN pg_class c ON c.oid = con.conrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = ANY(con.conkey)
        WHERE con.contype = 'p'
            AND c.relname = $1
            AND n.nspname = $2
        ORDER BY array_position(con.conkey, a.attnum)
    "#;

    let rows = client
        .query(sql, &[&table_name, &schema_name])
        .await
        .map_err(|e| introspection_error(schema_name, "primary key", e))?;

    Ok(rows.iter().map(|row| row.get("column_name")).collect())
}

/// Query foreign keys declared on a table
async fn query_foreign_keys(
    client: &Object,
    schema_name: &str,
    table_name: &str,
) -> Result<Vec<ForeignKey>, NavigatorError> {
    let sql = r#"
        SELECT
            con.conname::text AS constraint_name,
            ref_ns.nspname::text AS referred_schema,
            ref_cl.relname::text AS referred_table,
            ARRAY(
                SELECT a.attname::text
                FROM unnest(con.conkey) WITH ORDINALITY AS cols(attnum, pos)
                JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = cols.attnum
                ORDER BY cols.pos
            ) AS constrained_columns,
            ARRAY(
                SELECT a.attname::text
                FROM unnest(con.confkey) WITH ORDINALITY AS cols(attnum, pos)
                JOIN pg_attribute a ON a.attrelid = con.confrelid AND a.attnum = cols.attnum
                ORDER BY cols.pos
            ) AS referred_columns
        FROM pg_constraint con
        JOIN pg_class c ON c.oid = con.conrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_class ref_cl ON ref_cl.oid = con.confrelid
        JOIN pg_namespace ref_ns ON ref_ns.oid = ref_cl.relnamespace
        WHERE con.contype = 'f'
            AND c.relname = $1
            AND n.nspname = $2
        ORDER BY con.conname
    "#;

    let rows = client
        .query(sql, &[&table_name, &schema_name])
        .await
        .map_err(|e| introspection_error(schema_name, "foreign keys", e))?;

    Ok(rows
        .iter()
        .map(|row| ForeignKey {
            name: row.get("constraint_name"),
            constrained_columns: row.get("constrained_columns"),
            referred_schema: row.get("referred_schema"),
            referred_table: row.get("referred_table"),
            referred_columns: row.get("referred_columns"),
        })
        .collect())
}

/// Query indexes of a table, leaving out the one backing the primary key
async fn query_indexes(
    client: &Object,
    schema_name: &str,
    table_name: &str,
) -> Result<Vec<Index>, NavigatorError> {
    let sql = r#"
        SELECT
            i.relname::text AS index_name,
            ix.indisunique AS is_unique,
            ARRAY(
                SELECT a.attname::text
                FROM unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, pos)
                JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum
                ORDER BY k.pos
            ) AS column_names
        FROM pg_index ix
        JOIN pg_class i ON i.oid = ix.indexrelid
        JOIN pg_class t ON t.oid = ix.indrelid
        JOIN pg_namespace n ON n.oid = t.relnamespace
        WHERE t.relname = $1
            AND n.nspname = $2
            AND NOT ix.indisprimary
        ORDER BY i.relname
    "#;

    let rows = client
        .query(sql, &[&table_name, &schema_name])
        .await
        .map_err(|e| introspection_error(schema_name, "indexes", e))?;

    Ok(rows
        .iter()
        .map(|row| Index {
            name: row.get("index_name"),
            column_names: row.get("column_names"),
            unique: row.get("is_unique"),
        })
        .collect())
}

/// Query `pg_stats` rows of a table, optionally narrowed to one column
///
/// Rows come back in column order with the non-inherited row first.
async fn query_stats(
    client: &Object,
    schema_name: &str,
    table_name: &str,
    column_name: Option<&str>,
) -> Result<Vec<ColumnStatistic>, NavigatorError> {
    trace!(schema = ?schema_name, table = ?table_name, column = ?column_name, "Querying statistics");

    let sql = r#"
        SELECT
            s.schemaname::text AS schema_name,
            s.tablename::text AS table_name,
            s.attname::text AS column_name,
            s.inherited,
            s.null_frac,
            s.avg_width,
            s.n_distinct,
            s.most_common_vals::text AS most_common_vals,
            s.most_common_freqs,
            s.histogram_bounds::text AS histogram_bounds,
            s.correlation,
            s.most_common_elems::text AS most_common_elems,
            s.most_common_elem_freqs,
            s.elem_count_histogram
        FROM pg_stats s
        JOIN pg_namespace n ON n.nspname = s.schemaname
        JOIN pg_class c ON c.relnamespace = n.oid AND c.relname = s.tablename
        JOIN pg_attribute a ON a.attrelid = c.oid AND a.attname = s.attname
        WHERE s.schemaname = $1
            AND s.tablename = $2
            AND ($3::text IS NULL OR s.attname = $3::text)
        ORDER BY a.attnum, s.inherited
    "#;

    let rows = client
        .query(sql, &[&schema_name, &table_name, &column_name])
        .await
        .map_err(|e| introspection_error(schema_name, "statistics", e))?;

    rows.iter()
        .map(|row| stats_from_row(schema_name, row))
        .collect()
}

fn stats_from_row(schema_name: &str, row: &Row) -> Result<ColumnStatistic, NavigatorError> {
    let text_array = |name: &str| -> Result<Option<Vec<String>>, NavigatorError> {
        let raw: Option<String> = row.get(name);
        raw.as_deref()
            .map(parse_text_array)
            .transpose()
            .map_err(|message| {
                error!(column = ?name, error = ?message, "Malformed statistics array");
                NavigatorError::Introspection {
                    schema: schema_name.to_string(),
                    message: format!("Malformed {} value: {}", name, message),
                }
            })
    };

    Ok(ColumnStatistic {
        schema: row.get("schema_name"),
        table: row.get("table_name"),
        column: row.get("column_name"),
        inherited: row.get("inherited"),
        null_frac: row.get("null_frac"),
        avg_width: row.get("avg_width"),
        n_distinct: row.get("n_distinct"),
        most_common_vals: text_array("most_common_vals")?,
        most_common_freqs: row.get("most_common_freqs"),
        histogram_bounds: text_array("histogram_bounds")?,
        correlation: row.get("correlation"),
        most_common_elems: text_array("most_common_elems")?,
        most_common_elem_freqs: row.get("most_common_elem_freqs"),
        elem_count_histogram: row.get("elem_count_histogram"),
    })
}

/// Fold simple-query messages into a row set
fn collect_rows(messages: Vec<SimpleQueryMessage>) -> QueryRows {
    let mut result = QueryRows::default();
    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(columns) => {
                result = QueryRows {
                    columns: columns.iter().map(|c| c.name().to_string()).collect(),
                    rows: Vec::new(),
                };
            }
            SimpleQueryMessage::Row(row) => {
                let values = (0..row.len())
                    .map(|idx| row.get(idx).map(str::to_string))
                    .collect();
                result.rows.push(values);
            }
            SimpleQueryMessage::CommandComplete(count) => {
                trace!(rows = count, "Statement complete");
            }
            _ => {}
        }
    }
    result
}

fn analyze_statement(schema: &str, table: &str, column: Option<&str>) -> String {
    match column {
        Some(column) => format!(
            "ANALYZE {}.{} ({})",
            quote_ident(schema),
            quote_ident(table),
            quote_ident(column)
        ),
        None => format!("ANALYZE {}.{}", quote_ident(schema), quote_ident(table)),
    }
}

/// Quote an identifier so it can be spliced into a statement
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Parse the text form of a one-dimensional PostgreSQL array
///
/// `{}` is an empty list, quoted elements are unescaped and an unquoted
/// `NULL` element is kept as the string `NULL`. Nested unquoted braces are
/// kept verbatim as one element.
fn parse_text_array(text: &str) -> Result<Vec<String>, String> {
    let mut text = text.trim();

    // Arrays with non-default bounds are prefixed, e.g. `[0:1]={a,b}`
    if text.starts_with('[') {
        let start = text
            .find("={")
            .ok_or_else(|| format!("missing '=' after dimension decoration in {:?}", text))?;
        text = &text[start + 1..];
    }

    let inner = text
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| format!("array literal must be enclosed in braces: {:?}", text))?;

    let mut elements = Vec::new();
    if inner.trim().is_empty() {
        return Ok(elements);
    }

    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut element = String::new();
        if chars.next_if_eq(&'"').is_some() {
            loop {
                match chars.next() {
                    Some('\\') => match chars.next() {
                        Some(escaped) => element.push(escaped),
                        None => return Err("dangling escape in quoted element".to_string()),
                    },
                    Some('"') => break,
                    Some(c) => element.push(c),
                    None => return Err("unterminated quoted element".to_string()),
                }
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
        } else {
            let mut depth = 0usize;
            while let Some(&c) = chars.peek() {
                match c {
                    ',' if depth == 0 => break,
                    '{' => depth += 1,
                    '}' => {
                        depth = depth
                            .checked_sub(1)
                            .ok_or_else(|| "unbalanced '}' in element".to_string())?;
                    }
                    _ => {}
                }
                element.push(c);
                chars.next();
            }
            if depth != 0 {
                return Err("unbalanced '{' in element".to_string());
            }
            let trimmed = element.trim();
            if trimmed.is_empty() {
                return Err("empty unquoted element".to_string());
            }
            element = trimmed.to_string();
        }
        elements.push(element);

        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(c) => return Err(format!("unexpected character {:?} after element", c)),
        }
    }

    Ok(elements)
}

/// Parse PostgreSQL type string into DataType enum
fn parse_data_type(type_str: &str) -> DataType {
    // Handle arrays first (e.g., "integer[]", "text[]", "character varying(255)[]")
    if let Some(inner_type) = type_str.trim().strip_suffix("[]") {
        let inner = parse_data_type(inner_type);
        return DataType::Array(Box::new(inner));
    }

    let lower = type_str.to_lowercase();
    let trimmed = lower.trim();

    // Handle types with parameters
    if trimmed.starts_with("character varying") || trimmed.starts_with("varchar") {
        return DataType::Varchar(extract_length(trimmed));
    }
    if trimmed.starts_with("character(") || trimmed.starts_with("char(") {
        return DataType::Char(extract_length(trimmed));
    }
    if trimmed.starts_with("numeric") || trimmed.starts_with("decimal") {
        let (precision, scale) = extract_precision(trimmed);
        return DataType::Numeric { precision, scale };
    }

    // Handle timestamp variations
    if trimmed.starts_with("timestamp") {
        if trimmed.contains("with time zone") || trimmed.contains("timestamptz") {
            return DataType::TimestampTz;
        }
        return DataType::Timestamp;
    }

    // Handle time variations
    if trimmed.starts_with("time ") || trimmed.starts_with("time(") || trimmed == "time" {
        if trimmed.contains("with time zone") {
            return DataType::TimeTz;
        }
        return DataType::Time;
    }

    // Simple type matching
    match trimmed {
        "smallint" | "int2" => DataType::SmallInt,
        "integer" | "int" | "int4" => DataType::Integer,
        "bigint" | "int8" => DataType::BigInt,
        "boolean" | "bool" => DataType::Boolean,
        "text" => DataType::Text,
        "character" | "char" | "bpchar" => DataType::Char(None),
        "real" | "float4" => DataType::Real,
        "double precision" | "float8" => DataType::DoublePrecision,
        "date" => DataType::Date,
        "uuid" => DataType::Uuid,
        "json" => DataType::Json,
        "jsonb" => DataType::JsonBinary,
        "bytea" => DataType::Binary,
        "timetz" => DataType::TimeTz,
        "timestamptz" => DataType::TimestampTz,
        _ => DataType::Other(type_str.trim().to_string()),
    }
}

/// Extract length parameter from type like "varchar(255)" or "character varying(100)"
fn extract_length(type_str: &str) -> Option<u32> {
    extract_precision(type_str).0
}

/// Extract "(p)" or "(p,s)" parameters, e.g. from "numeric(10,2)"
fn extract_precision(type_str: &str) -> (Option<u32>, Option<u32>) {
    let (Some(start), Some(end)) = (type_str.find('('), type_str.find(')')) else {
        return (None, None);
    };
    if end <= start {
        return (None, None);
    }
    let mut params = type_str[start + 1..end].split(',');
    let first = params.next().and_then(|p| p.trim().parse().ok());
    let second = params.next().and_then(|p| p.trim().parse().ok());
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_types() {
        assert_eq!(parse_data_type("integer"), DataType::Integer);
        assert_eq!(parse_data_type("int"), DataType::Integer);
        assert_eq!(parse_data_type("bigint"), DataType::BigInt);
        assert_eq!(parse_data_type("boolean"), DataType::Boolean);
        assert_eq!(parse_data_type("text"), DataType::Text);
        assert_eq!(parse_data_type("uuid"), DataType::Uuid);
        assert_eq!(parse_data_type("jsonb"), DataType::JsonBinary);
    }

    #[test]
    fn test_parse_varchar() {
        assert_eq!(
            parse_data_type("character varying(100)"),
            DataType::Varchar(Some(100))
        );
        assert_eq!(
            parse_data_type("character varying"),
            DataType::Varchar(None)
        );
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(
            parse_data_type("numeric(10,2)"),
            DataType::Numeric {
                precision: Some(10),
                scale: Some(2)
            }
        );
        assert_eq!(
            parse_data_type("numeric"),
            DataType::Numeric {
                precision: None,
                scale: None
            }
        );
    }

    #[test]
    fn test_parse_time_variations() {
        assert_eq!(
            parse_data_type("timestamp(3) with time zone"),
            DataType::TimestampTz
        );
        assert_eq!(
            parse_data_type("timestamp without time zone"),
            DataType::Timestamp
        );
        assert_eq!(parse_data_type("time(6) without time zone"), DataType::Time);
        assert_eq!(parse_data_type("time with time zone"), DataType::TimeTz);
    }

    #[test]
    fn test_parse_array() {
        assert_eq!(
            parse_data_type("integer[]"),
            DataType::Array(Box::new(DataType::Integer))
        );
        assert_eq!(
            parse_data_type("character varying(255)[]"),
            DataType::Array(Box::new(DataType::Varchar(Some(255))))
        );
    }

    #[test]
    fn test_parse_user_defined_keeps_spelling() {
        assert_eq!(
            parse_data_type("\"OrderStatus\""),
            DataType::Other("\"OrderStatus\"".to_string())
        );
        assert_eq!(
            parse_data_type("\"OrderStatus\"[]"),
            DataType::Array(Box::new(DataType::Other("\"OrderStatus\"".to_string())))
        );
        assert_eq!(
            parse_data_type("interval"),
            DataType::Other("interval".to_string())
        );
    }

    #[test]
    fn test_text_array_empty() {
        assert_eq!(parse_text_array("{}").unwrap(), Vec::<String>::new());
        assert_eq!(parse_text_array(" { } ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_text_array_plain_elements() {
        assert_eq!(
            parse_text_array("{1,2,10}").unwrap(),
            vec!["1".to_string(), "2".to_string(), "10".to_string()]
        );
    }

    #[test]
    fn test_text_array_quoted_elements() {
        let parsed = parse_text_array(r#"{"hello, world","say \"hi\"",plain,"back\\slash"}"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                "hello, world".to_string(),
                "say \"hi\"".to_string(),
                "plain".to_string(),
                "back\\slash".to_string(),
            ]
        );
    }

    #[test]
    fn test_text_array_null_and_nested() {
        assert_eq!(
            parse_text_array("{NULL,a}").unwrap(),
            vec!["NULL".to_string(), "a".to_string()]
        );
        assert_eq!(
            parse_text_array(r#"{"{1,2}","{3}"}"#).unwrap(),
            vec!["{1,2}".to_string(), "{3}".to_string()]
        );
        assert_eq!(
            parse_text_array("{{1,2},{3,4}}").unwrap(),
            vec!["{1,2}".to_string(), "{3,4}".to_string()]
        );
    }

    #[test]
    fn test_text_array_dimension_decoration() {
        assert_eq!(
            parse_text_array("[0:1]={a,b}").unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_text_array_malformed() {
        assert!(parse_text_array("1,2").is_err());
        assert!(parse_text_array(r#"{"open}"#).is_err());
        assert!(parse_text_array("{a,,b}").is_err());
        assert!(parse_text_array(r#"{"a"b}"#).is_err());
    }

    #[test]
    fn test_analyze_statement_quotes_identifiers() {
        assert_eq!(
            analyze_statement("public", "test", None),
            r#"ANALYZE "public"."test""#
        );
        assert_eq!(
            analyze_statement("public", "odd\"name", Some("id")),
            r#"ANALYZE "public"."odd""name" ("id")"#
        );
    }

    #[test]
    fn test_extract_length() {
        assert_eq!(extract_length("varchar(255)"), Some(255));
        assert_eq!(extract_length("character varying(100)"), Some(100));
        assert_eq!(extract_length("numeric(10,2)"), Some(10));
        assert_eq!(extract_length("text"), None);
    }
}
