//! On-disk stores.
//!
//! - `database`: the loose-object store
//! - `refs`: reference files and namespace enumeration
//! - `repository`: discovery, bootstrap and component wiring

pub mod database;
pub mod refs;
pub mod repository;
