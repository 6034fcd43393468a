pub mod database;
pub mod engine;
pub mod filter;
pub mod table;
