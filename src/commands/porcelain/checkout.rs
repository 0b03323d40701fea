use crate::areas::repository::Repository;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::revision::Revision;
use anyhow::Context;
use std::path::Path;

impl Repository {
    /// Materialize the tree behind `name` (a commit resolves to its tree)
    /// into `target`, which must be empty or absent.
    pub fn checkout(&mut self, name: &str, target: &str) -> anyhow::Result<()> {
        let oid = Revision::parse(name)
            .resolve(self, None, true)?
            .context(format!("No such reference: {name}"))?;

        let tree_oid = match self.database().load(&oid)? {
            GitObject::Commit(commit) => commit.tree_oid()?,
            GitObject::Tree(_) => oid,
            other => anyhow::bail!(
                "{name} is a {}, not a commit or tree",
                other.object_type()
            ),
        };

        let target = Path::new(target);
        if target.exists() {
            if !target.is_dir() {
                anyhow::bail!("Not a directory: {}", target.display());
            }
            if std::fs::read_dir(target)?.next().is_some() {
                anyhow::bail!("Directory not empty: {}", target.display());
            }
        } else {
            std::fs::create_dir_all(target)?;
        }

        self.checkout_tree(&tree_oid, target)
    }

    fn checkout_tree(&self, oid: &ObjectId, destination: &Path) -> anyhow::Result<()> {
        let tree = match self.database().load(oid)? {
            GitObject::Tree(tree) => tree,
            other => anyhow::bail!("object {oid} is a {}, not a tree", other.object_type()),
        };

        for entry in tree.entries() {
            let name = std::str::from_utf8(entry.path())
                .context(format!("tree entry path is not valid UTF-8 in {oid}"))?;
            let entry_path = destination.join(name);

            match self.database().load(entry.oid())? {
                GitObject::Tree(_) => {
                    std::fs::create_dir(&entry_path)?;
                    self.checkout_tree(entry.oid(), &entry_path)?;
                }
                GitObject::Blob(blob) => {
                    std::fs::write(&entry_path, blob.data())?;
                }
                other => anyhow::bail!(
                    "tree {oid} points at a {}, which cannot be checked out",
                    other.object_type()
                ),
            }
        }

        Ok(())
    }
}
