//! Annotated tag object.
//!
//! Same KVLM shape as a commit; an annotated tag additionally carries an
//! `object` field (the target hash) and a `type` field (the target's kind).
//! A lightweight tag is just a reference file and never reaches this type.

use crate::artifacts::kvlm::Kvlm;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    kvlm: Kvlm,
}

impl Tag {
    pub fn new(kvlm: Kvlm) -> Self {
        Tag { kvlm }
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }

    /// Hash of the tagged object.
    pub fn target(&self) -> anyhow::Result<ObjectId> {
        let raw = self
            .kvlm
            .first(b"object")
            .context("tag has no object field")?;
        ObjectId::try_parse(String::from_utf8(raw.to_vec())?)
    }

    /// Kind of the tagged object.
    pub fn target_type(&self) -> anyhow::Result<ObjectType> {
        let raw = self.kvlm.first(b"type").context("tag has no type field")?;
        ObjectType::try_from(std::str::from_utf8(raw)?)
    }

    pub fn message(&self) -> &Bytes {
        self.kvlm.message()
    }
}

impl Packable for Tag {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(self.kvlm.serialize())
    }
}

impl Unpackable for Tag {
    fn deserialize(body: Bytes) -> anyhow::Result<Self> {
        Ok(Tag {
            kvlm: Kvlm::parse(&body)?,
        })
    }
}
