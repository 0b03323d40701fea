//! Commit object: a KVLM body conventionally carrying a `tree` hash, zero
//! or more `parent` hashes, author/committer lines and a message.

use crate::artifacts::kvlm::Kvlm;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    kvlm: Kvlm,
}

impl Commit {
    pub fn new(kvlm: Kvlm) -> Self {
        Commit { kvlm }
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }

    /// The snapshot tree this commit points at.
    pub fn tree_oid(&self) -> anyhow::Result<ObjectId> {
        let raw = self
            .kvlm
            .first(b"tree")
            .context("commit has no tree field")?;
        ObjectId::try_parse(String::from_utf8(raw.to_vec())?)
    }

    /// Parent commit ids; empty for a root commit, several for a merge.
    pub fn parents(&self) -> anyhow::Result<Vec<ObjectId>> {
        self.kvlm
            .get(b"parent")
            .unwrap_or_default()
            .iter()
            .map(|raw| ObjectId::try_parse(String::from_utf8(raw.to_vec())?))
            .collect()
    }

    pub fn message(&self) -> &Bytes {
        self.kvlm.message()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(self.kvlm.serialize())
    }
}

impl Unpackable for Commit {
    fn deserialize(body: Bytes) -> anyhow::Result<Self> {
        Ok(Commit {
            kvlm: Kvlm::parse(&body)?,
        })
    }
}
