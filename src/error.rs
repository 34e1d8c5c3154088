use thiserror::Error;

/// navigator errors
#[derive(Error, Debug)]
pub enum NavigatorError {
    #[error("Failed to connect to database: {0}")]
    Connection(String),

    #[error("Failed to introspect schema '{schema}': {message}")]
    Introspection { schema: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("No statistics found for column '{schema}.{table}.{column}'")]
    NotFound {
        schema: String,
        table: String,
        column: String,
    },

    #[error("Query failed: {0}")]
    MalformedQuery(String),

    #[error("Failed to render '{template}': {message}")]
    Render { template: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}
