//! # navigator
//!
//! Browse a database's metadata over HTTP
//!
//! This crate provides a web server and library for listing schemas, tables,
//! columns, keys, indexes and planner statistics, refreshing statistics and
//! running ad-hoc queries that are always rolled back.

pub mod config;
pub mod error;
pub mod introspect;
pub mod navigator;
pub mod render;
pub mod schema;
pub mod server;

pub mod prelude {
    pub use crate::config::DbConfig;
    pub use crate::error::NavigatorError;
    pub use crate::introspect::{Introspector, TableDefinition};
    pub use crate::navigator::{Document, Navigator};
    pub use crate::render::{Format, Renderer};
    pub use crate::schema::{
        Column, ColumnStatistic, DataType, ForeignKey, Index, QueryRows, SearchKind, SearchMatch,
    };
}

#[cfg(feature = "postgres")]
pub use introspect::PostgresIntrospector;
