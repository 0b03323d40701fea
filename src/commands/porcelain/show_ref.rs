use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Print every reference under `refs/` as `<hash> <name>` lines,
    /// name-sorted at every level.
    pub fn show_ref(&mut self) -> anyhow::Result<()> {
        let tree = self.refs().list(None)?;

        for (name, oid) in tree.flatten("refs") {
            writeln!(self.writer(), "{oid} {name}")?;
        }

        Ok(())
    }
}
