//! The typed object sum and its framing.
//!
//! Every stored object is framed as `<type-tag> <ascii-decimal-length>\0<body>`
//! before compression, and its id is the SHA-1 of that framed buffer. The
//! four kinds are a closed set, so dispatch is an enum rather than an open
//! trait object.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::Write;
use std::path::PathBuf;

/// Encode to the on-disk body (unframed).
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Decode from the on-disk body (unframed).
pub trait Unpackable {
    fn deserialize(body: Bytes) -> Result<Self>
    where
        Self: Sized;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitObject {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl GitObject {
    /// Construct from a type tag and a raw body, dispatching to the
    /// matching codec.
    pub fn deserialize(object_type: ObjectType, body: Bytes) -> Result<Self> {
        Ok(match object_type {
            ObjectType::Blob => GitObject::Blob(Blob::deserialize(body)?),
            ObjectType::Tree => GitObject::Tree(Tree::deserialize(body)?),
            ObjectType::Commit => GitObject::Commit(Commit::deserialize(body)?),
            ObjectType::Tag => GitObject::Tag(Tag::deserialize(body)?),
        })
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            GitObject::Blob(_) => ObjectType::Blob,
            GitObject::Tree(_) => ObjectType::Tree,
            GitObject::Commit(_) => ObjectType::Commit,
            GitObject::Tag(_) => ObjectType::Tag,
        }
    }

    /// The encoded body, without the framing header.
    pub fn body(&self) -> Result<Bytes> {
        match self {
            GitObject::Blob(blob) => blob.serialize(),
            GitObject::Tree(tree) => tree.serialize(),
            GitObject::Commit(commit) => commit.serialize(),
            GitObject::Tag(tag) => tag.serialize(),
        }
    }

    /// The framed buffer: `<type> <len>\0<body>`.
    pub fn serialize(&self) -> Result<Bytes> {
        let body = self.body()?;

        let mut framed = Vec::with_capacity(body.len() + 16);
        let header = format!("{} {}\0", self.object_type(), body.len());
        framed.write_all(header.as_bytes())?;
        framed.write_all(&body)?;

        Ok(Bytes::from(framed))
    }

    /// SHA-1 of the framed buffer. A pure function of content; computable
    /// without touching the store.
    pub fn object_id(&self) -> Result<ObjectId> {
        let framed = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&framed);

        let oid = hasher.finalize();
        ObjectId::try_parse(format!("{oid:x}"))
    }

    pub fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_hash_matches_git() {
        // sha1 of "blob 6\0hello\n"
        let blob = GitObject::Blob(Blob::new(&b"hello\n"[..]));
        assert_eq!(
            blob.object_id().unwrap().as_ref(),
            "ce013625030ba8dba906f756967f9e9ca394464b"
        );
    }

    #[test]
    fn test_framing_header_shape() {
        let blob = GitObject::Blob(Blob::new(&b"hello\n"[..]));
        let framed = blob.serialize().unwrap();
        assert!(framed.starts_with(b"blob 6\0"));
        assert!(framed.ends_with(b"hello\n"));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let blob = GitObject::Blob(Blob::new(&b"same bytes"[..]));
        assert_eq!(blob.object_id().unwrap(), blob.object_id().unwrap());
    }

    #[test]
    fn test_dispatch_round_trip_keeps_type() {
        let commit_body = Bytes::from_static(
            b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\nmsg\n",
        );
        let object = GitObject::deserialize(ObjectType::Commit, commit_body.clone()).unwrap();
        assert_eq!(object.object_type(), ObjectType::Commit);
        assert_eq!(object.body().unwrap(), commit_body);
    }
}
