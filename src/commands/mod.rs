//! CLI glue, implemented as `impl Repository` blocks: plumbing commands
//! expose the store and resolvers directly, porcelain commands compose them.

pub mod plumbing;
pub mod porcelain;
