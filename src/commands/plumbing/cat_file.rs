use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::Revision;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Resolve `name` to an object of the requested kind (following tag and
    /// commit indirections) and write its raw body to the output writer.
    pub fn cat_file(&mut self, name: &str, want: ObjectType) -> anyhow::Result<()> {
        let oid = Revision::parse(name)
            .resolve(self, Some(want), true)?
            .context(format!("No {want} object found for {name}"))?;

        let object = self.database().load(&oid)?;
        let body = object.body()?;
        self.writer().write_all(&body)?;

        Ok(())
    }
}
