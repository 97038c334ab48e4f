//! Storage Layer - SQLite-backed persistence
//!
//! The store is a single SQLite file with tables:
//! - continent(continent_id, continent_code, name)
//! - country(country_id, country_code, name, continent_id, wikipedia_link, keywords)
//! - region(region_id, region_code, local_code, name, continent_id, country_id, wikipedia_link, keywords)

pub mod schema;
pub mod sqlite;
pub mod filter;
pub mod table;
mod rows;

pub use sqlite::Database;
pub use filter::SearchFilter;
pub use table::{Entity, SearchCursor, Table};
