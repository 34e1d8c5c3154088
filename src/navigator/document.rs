//! Documents produced by the navigator
//!
//! One document per operation. Field order is the order keys appear in JSON
//! output.

use serde::Serialize;

use crate::schema::{Column, ColumnStatistic, ForeignKey, Index, QueryRows, SearchMatch};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaList {
    pub schemas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableList {
    pub schema: String,
    pub tables: Vec<String>,
}

/// A table with its columns annotated as primary key / indexed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub schema: String,
    pub name: String,
    pub oid: Option<u32>,
    pub columns: Vec<Column>,
    pub primary_keys: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStats {
    pub schema: String,
    pub table: String,
    pub columns: Vec<ColumnStatistic>,
}

/// Ad-hoc query page; rows are only present once a query was submitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub query: String,
    #[serde(flatten)]
    pub result: Option<QueryRows>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Schemas(SchemaList),
    Search(SearchResults),
    Tables(TableList),
    Table(TableView),
    TableStats(TableStats),
    ColumnStats(ColumnStatistic),
    Query(QueryResult),
}

impl Document {
    /// Name of the page template this document renders with
    pub fn template_name(&self) -> &'static str {
        match self {
            Document::Schemas(_) => "schemas",
            Document::Search(_) => "search",
            Document::Tables(_) => "tables",
            Document::Table(_) => "table",
            Document::TableStats(_) => "table_stats",
            Document::ColumnStats(_) => "column_stats",
            Document::Query(_) => "query_manager",
        }
    }
}

impl From<SchemaList> for Document {
    fn from(doc: SchemaList) -> Self {
        Document::Schemas(doc)
    }
}

impl From<SearchResults> for Document {
    fn from(doc: SearchResults) -> Self {
        Document::Search(doc)
    }
}

impl From<TableList> for Document {
    fn from(doc: TableList) -> Self {
        Document::Tables(doc)
    }
}

impl From<TableView> for Document {
    fn from(doc: TableView) -> Self {
        Document::Table(doc)
    }
}

impl From<TableStats> for Document {
    fn from(doc: TableStats) -> Self {
        Document::TableStats(doc)
    }
}

impl From<ColumnStatistic> for Document {
    fn from(doc: ColumnStatistic) -> Self {
        Document::ColumnStats(doc)
    }
}

impl From<QueryResult> for Document {
    fn from(doc: QueryResult) -> Self {
        Document::Query(doc)
    }
}
