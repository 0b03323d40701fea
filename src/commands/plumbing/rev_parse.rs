use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::Revision;
use std::io::Write;

impl Repository {
    /// Resolve a revision name and print the hash, optionally coerced to a
    /// wanted object kind.
    pub fn rev_parse(&mut self, name: &str, want: Option<ObjectType>) -> anyhow::Result<()> {
        match Revision::parse(name).resolve(self, want, true)? {
            Some(oid) => writeln!(self.writer(), "{oid}")?,
            // The no-match outcome only occurs when a kind was wanted;
            // distinct from "no such reference"
            None => {
                if let Some(want) = want {
                    writeln!(self.writer(), "no {want} object reachable from {name}")?;
                }
            }
        }

        Ok(())
    }
}
