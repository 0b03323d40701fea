use crate::areas::repository::Repository;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::Revision;
use anyhow::Context;
use std::collections::HashSet;
use std::io::Write;

impl Repository {
    /// Emit the commit graph reachable from `name` as a Graphviz digraph.
    pub fn log(&mut self, name: &str) -> anyhow::Result<()> {
        let start = Revision::parse(name)
            .resolve(self, Some(ObjectType::Commit), true)?
            .context(format!("No commit found for {name}"))?;

        writeln!(self.writer(), "digraph log{{")?;

        let mut seen = HashSet::new();
        let mut stack = vec![start];

        while let Some(oid) = stack.pop() {
            if !seen.insert(oid.clone()) {
                continue;
            }

            let commit = match self.database().load(&oid)? {
                GitObject::Commit(commit) => commit,
                other => anyhow::bail!("object {oid} is a {}, not a commit", other.object_type()),
            };

            for parent in commit.parents()? {
                writeln!(self.writer(), "  c_{oid} -> c_{parent};")?;
                stack.push(parent);
            }
        }

        writeln!(self.writer(), "}}")?;

        Ok(())
    }
}
