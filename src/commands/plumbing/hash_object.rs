use crate::areas::repository::Repository;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;

impl Repository {
    /// Hash a file's content as an object of the given kind, optionally
    /// persisting it. Prints the hash either way.
    pub fn hash_object(
        &mut self,
        file: &str,
        object_type: ObjectType,
        write: bool,
    ) -> anyhow::Result<()> {
        let data = std::fs::read(file).context(format!("Unable to read file {file}"))?;

        // Parsing the body validates non-blob kinds before they are hashed
        let object = GitObject::deserialize(object_type, Bytes::from(data))?;
        let oid = self.database().store(&object, write)?;

        writeln!(self.writer(), "{oid}")?;

        Ok(())
    }
}
