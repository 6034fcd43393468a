//! scrawl: a small file-backed table store.
//!
//! Tables have typed columns (`int`, `str`, `bool`) plus an engine-assigned
//! `ID`. Rows are read and changed with equality filters. The engine in
//! [`db::engine`] is pure; [`Database`] wires it to a [`Storage`] gateway,
//! and [`shell`] puts a line-oriented command interpreter on top.

pub mod catalog;
pub mod common;
pub mod config;
pub mod core;
pub mod db;
pub mod shell;
pub mod storage;

pub use crate::catalog::Catalog;
pub use crate::common::error::{DatabaseError, DbResult};
pub use crate::config::Config;
pub use crate::core::types::{DataType, Value, coerce, parse_literal};
pub use crate::db::{
    database::Database,
    engine::TableSummary,
    filter::{Assignments, Filter},
    table::*,
};
pub use crate::storage::{JsonStorage, MemoryStorage, Storage};
