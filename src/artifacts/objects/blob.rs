use crate::artifacts::objects::object::{Packable, Unpackable};
use bytes::Bytes;

/// Opaque byte payload; the codec is a pass-through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    data: Bytes,
}

impl Blob {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Blob { data: data.into() }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(self.data.clone())
    }
}

impl Unpackable for Blob {
    fn deserialize(body: Bytes) -> anyhow::Result<Self> {
        Ok(Blob { data: body })
    }
}
