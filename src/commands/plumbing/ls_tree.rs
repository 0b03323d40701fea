use crate::areas::repository::Repository;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::Revision;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Pretty-print the tree `name` resolves to (a commit resolves to its
    /// snapshot tree).
    pub fn ls_tree(&mut self, name: &str) -> anyhow::Result<()> {
        let oid = Revision::parse(name)
            .resolve(self, Some(ObjectType::Tree), true)?
            .context(format!("No tree object found for {name}"))?;

        let tree = match self.database().load(&oid)? {
            GitObject::Tree(tree) => tree,
            other => anyhow::bail!("object {oid} is a {}, not a tree", other.object_type()),
        };

        for entry in tree.entries() {
            let entry_type = self.database().get_object_type(entry.oid())?;
            writeln!(
                self.writer(),
                "{} {} {}\t{}",
                entry.padded_mode(),
                entry_type,
                entry.oid(),
                String::from_utf8_lossy(entry.path())
            )?;
        }

        Ok(())
    }
}
