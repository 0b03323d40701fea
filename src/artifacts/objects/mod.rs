//! Object types and codecs.
//!
//! Four kinds of object exist, identified by fixed ASCII tags:
//!
//! - **blob**: opaque file content
//! - **tree**: ordered directory listing (mode, path, target hash)
//! - **commit**: KVLM body with tree/parent/author fields and a message
//! - **tag**: KVLM body naming a target object and its kind
//!
//! All share the on-disk framing `<type> <size>\0<content>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tag;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
