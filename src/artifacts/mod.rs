//! Data types and algorithms.
//!
//! - `kvlm`: the ordered key-value-list-with-message codec
//! - `objects`: the four object kinds and their body codecs
//! - `revision`: name → hash resolution

pub mod kvlm;
pub mod objects;
pub mod revision;
