//! A minimal content-addressable object store speaking git's loose-object
//! format, plus the reference and revision resolution that sits on top of it.
//!
//! The crate is split into three layers:
//!
//! - `areas`: the on-disk stores (object database, references, repository)
//! - `artifacts`: the data types and codecs (objects, KVLM, revisions)
//! - `commands`: thin CLI glue implemented as `impl Repository` blocks

pub mod areas;
pub mod artifacts;
pub mod commands;
