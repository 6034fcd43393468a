use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the engine and storage layers.
pub type DbResult<T> = Result<T, DatabaseError>;

/// Every failure the engine, the storage gateway or the shell can report.
///
/// All variants are recoverable: the shell prints them and keeps running.
#[derive(Debug, Error, Diagnostic)]
pub enum DatabaseError {
    #[error("Table \"{0}\" already exists")]
    #[diagnostic(code(scrawl::duplicate_table))]
    DuplicateTable(String),

    #[error("Table \"{0}\" does not exist")]
    #[diagnostic(code(scrawl::unknown_table), help("run `list_tables` to see existing tables"))]
    UnknownTable(String),

    #[error("Malformed column spec \"{spec}\": {reason}")]
    #[diagnostic(
        code(scrawl::malformed_column_spec),
        help("columns are written as `name:type`, e.g. `age:int`")
    )]
    MalformedColumnSpec { spec: String, reason: String },

    #[error("Unsupported type \"{0}\"")]
    #[diagnostic(code(scrawl::unsupported_type), help("supported types are int, str and bool"))]
    UnsupportedType(String),

    #[error("Invalid value {value}: expected {expected}")]
    #[diagnostic(code(scrawl::invalid_value))]
    InvalidValue { value: String, expected: String },

    #[error("Expected {expected} value(s), got {actual}")]
    #[diagnostic(code(scrawl::arity_mismatch), help("the ID column is assigned automatically"))]
    ArityMismatch { expected: usize, actual: usize },

    #[error("No records matched")]
    #[diagnostic(code(scrawl::no_records_affected))]
    NoRecordsAffected,

    #[error("Invalid command: {0}")]
    #[diagnostic(code(scrawl::invalid_command))]
    InvalidCommand(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(scrawl::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(scrawl::serialization))]
    Serialization(#[from] serde_json::Error),
}
