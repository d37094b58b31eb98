//! Database access shared across markcheck crates

pub mod init;
pub mod models;

pub use init::init_database;
