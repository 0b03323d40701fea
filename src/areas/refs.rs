//! References: named, mutable pointers into the object store.
//!
//! A reference file holds either a direct hash (`<40-hex>\n`) or a symbolic
//! indirection (`ref: <name>\n`). References form a DAG rooted under
//! `refs/` plus the distinguished `HEAD` pointer; a cycle can only appear
//! through manual corruption, so indirection depth is hard-bounded instead
//! of trusted.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use log::debug;
use std::io::Write;
use std::path::Path;

/// Name of the head pointer
pub const HEAD_REF_NAME: &str = "HEAD";

/// Symbolic reference marker pattern
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Maximum symbolic-ref links followed before declaring a cycle
pub const MAX_SYMREF_DEPTH: usize = 32;

#[derive(Debug, new)]
pub struct Refs {
    /// The git directory; ref names are resolved relative to it
    path: Box<Path>,
}

/// One level of the reference namespace, name-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefTree(Vec<(String, RefNode)>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefNode {
    /// Leaf reference, fully resolved
    Oid(ObjectId),
    /// Subdirectory of the namespace
    Nested(RefTree),
}

impl RefTree {
    pub fn entries(&self) -> &[(String, RefNode)] {
        &self.0
    }

    /// Walk the tree depth-first, yielding `(slash-joined-name, oid)` for
    /// every leaf, prefixed with `prefix` when given.
    pub fn flatten(&self, prefix: &str) -> Vec<(String, ObjectId)> {
        let mut leaves = Vec::new();
        for (name, node) in &self.0 {
            let full_name = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };
            match node {
                RefNode::Oid(oid) => leaves.push((full_name, oid.clone())),
                RefNode::Nested(subtree) => leaves.extend(subtree.flatten(&full_name)),
            }
        }
        leaves
    }
}

impl Refs {
    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    /// Resolve a reference name to a hash, following symbolic indirections.
    ///
    /// Runs as a loop so the depth bound is a plain counter; exceeding it
    /// means a corrupt self-referential chain and is fatal.
    pub fn resolve(&self, name: &str) -> anyhow::Result<ObjectId> {
        let mut current = name.to_string();

        for _ in 0..MAX_SYMREF_DEPTH {
            let ref_path = self.path.join(&current);
            let content = std::fs::read_to_string(&ref_path)
                .context(format!("Unknown reference {current}"))?;
            // Exactly one trailing newline is part of the format
            let content = content.strip_suffix('\n').unwrap_or(&content);

            match regex::Regex::new(SYMREF_REGEX)?.captures(content) {
                Some(captures) => {
                    debug!("{current} -> {}", &captures[1]);
                    current = captures[1].to_string();
                }
                None => {
                    return ObjectId::try_parse(content.to_string())
                        .context(format!("Reference {current} does not contain a hash"));
                }
            }
        }

        anyhow::bail!(
            "symbolic reference chain starting at {name} exceeds {MAX_SYMREF_DEPTH} links"
        )
    }

    /// Enumerate the reference namespace as a nested tree, name-sorted at
    /// every level. Defaults to the whole `refs/` subtree.
    pub fn list(&self, root: Option<&Path>) -> anyhow::Result<RefTree> {
        let root = root
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.refs_path().to_path_buf());

        let mut entries: Vec<_> = std::fs::read_dir(&root)
            .context(format!("Unable to list references in {}", root.display()))?
            .collect::<Result<_, _>>()?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut nodes = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let node = if entry.file_type()?.is_dir() {
                RefNode::Nested(self.list(Some(&entry.path()))?)
            } else {
                let relative = entry
                    .path()
                    .strip_prefix(&*self.path)?
                    .to_string_lossy()
                    .into_owned();
                RefNode::Oid(self.resolve(&relative)?)
            };
            nodes.push((name, node));
        }

        Ok(RefTree(nodes))
    }

    /// Write a direct reference, creating parent directories as needed.
    pub fn create_ref(&self, name: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let ref_path = self.path.join(name);
        if let Some(parent) = ref_path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Unable to create ref directory {}", parent.display()))?;
        }

        let mut ref_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&ref_path)
            .context(format!("Unable to open reference {}", ref_path.display()))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.write_all(format!("{oid}\n").as_bytes())?;

        debug!("wrote reference {name} -> {oid}");
        Ok(())
    }

    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.create_ref(HEAD_REF_NAME, oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HASH_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const HASH_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn temp_refs() -> (assert_fs::TempDir, Refs) {
        let dir = assert_fs::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("refs/heads")).unwrap();
        std::fs::create_dir_all(dir.path().join("refs/tags")).unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        (dir, refs)
    }

    fn write_ref(dir: &assert_fs::TempDir, name: &str, content: &str) {
        let path = dir.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_direct_reference_resolves_to_hash() {
        let (dir, refs) = temp_refs();
        write_ref(&dir, "refs/heads/main", &format!("{HASH_A}\n"));

        assert_eq!(refs.resolve("refs/heads/main").unwrap().as_ref(), HASH_A);
    }

    #[test]
    fn test_symbolic_chain_resolves_through_head() {
        let (dir, refs) = temp_refs();
        write_ref(&dir, "HEAD", "ref: refs/heads/main\n");
        write_ref(&dir, "refs/heads/main", &format!("{HASH_A}\n"));

        assert_eq!(refs.resolve("HEAD").unwrap().as_ref(), HASH_A);
    }

    #[test]
    fn test_self_referential_reference_hits_the_depth_bound() {
        let (dir, refs) = temp_refs();
        write_ref(&dir, "refs/heads/loop", "ref: refs/heads/loop\n");

        let err = refs.resolve("refs/heads/loop").unwrap_err();
        assert!(err.to_string().contains("exceeds 32 links"), "{err}");
    }

    #[test]
    fn test_missing_reference_is_reported() {
        let (_dir, refs) = temp_refs();
        let err = refs.resolve("refs/heads/ghost").unwrap_err();
        assert!(err.to_string().contains("Unknown reference"));
    }

    #[test]
    fn test_list_builds_name_sorted_nested_tree() {
        let (dir, refs) = temp_refs();
        write_ref(&dir, "refs/heads/main", &format!("{HASH_A}\n"));
        write_ref(&dir, "refs/heads/dev", &format!("{HASH_B}\n"));
        write_ref(&dir, "refs/tags/v1.0", &format!("{HASH_A}\n"));

        let tree = refs.list(None).unwrap();
        let flat = tree.flatten("refs");

        assert_eq!(
            flat,
            vec![
                (
                    "refs/heads/dev".to_string(),
                    ObjectId::try_parse(HASH_B.to_string()).unwrap()
                ),
                (
                    "refs/heads/main".to_string(),
                    ObjectId::try_parse(HASH_A.to_string()).unwrap()
                ),
                (
                    "refs/tags/v1.0".to_string(),
                    ObjectId::try_parse(HASH_A.to_string()).unwrap()
                ),
            ]
        );
    }

    #[test]
    fn test_create_ref_writes_hash_with_newline() {
        let (dir, refs) = temp_refs();
        let oid = ObjectId::try_parse(HASH_A.to_string()).unwrap();

        refs.create_ref("refs/tags/v1.0", &oid).unwrap();

        let content = std::fs::read_to_string(dir.path().join("refs/tags/v1.0")).unwrap();
        assert_eq!(content, format!("{HASH_A}\n"));
        assert_eq!(refs.resolve("refs/tags/v1.0").unwrap(), oid);
    }
}
