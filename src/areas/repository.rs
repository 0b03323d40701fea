//! Repository: ties the worktree, the object database and the reference
//! store together, and owns the output writer the commands print through.

use crate::areas::database::Database;
use crate::areas::refs::Refs;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Only format version 0 is understood.
const SUPPORTED_FORMAT_VERSION: u32 = 0;

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    refs: Refs,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open (or prepare to create) a repository rooted at `path`.
    ///
    /// No validation happens here; `init` creates the layout and
    /// `discover` is the checked entry point for existing repositories.
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let database = Database::new(path.join(".git").join("objects").into_boxed_path());
        let refs = Refs::new(path.join(".git").into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            refs,
        })
    }

    /// Walk up from `start` looking for a `.git` directory, then verify the
    /// repository format version.
    pub fn discover(start: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let mut current = start.canonicalize()?;

        loop {
            if current.join(".git").is_dir() {
                let repository = Self::new(&current.to_string_lossy(), writer)?;
                repository.check_format_version()?;
                return Ok(repository);
            }
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => anyhow::bail!("Not a repository (or any parent): {}", start.display()),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(".git")
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Consult the ini-style config once and reject unknown format versions.
    fn check_format_version(&self) -> anyhow::Result<()> {
        let config_path = self.git_path().join("config");
        let config = std::fs::read_to_string(&config_path)
            .context(format!("Config file missing at {}", config_path.display()))?;

        let version = Self::config_value(&config, "core", "repositoryformatversion")
            .context("Config has no core.repositoryformatversion")?
            .parse::<u32>()
            .context("core.repositoryformatversion is not a number")?;

        if version != SUPPORTED_FORMAT_VERSION {
            anyhow::bail!("Unsupported repositoryformatversion: {version}");
        }

        Ok(())
    }

    /// Minimal ini lookup: `[section]` headers, `key = value` lines.
    fn config_value<'c>(config: &'c str, section: &str, key: &str) -> Option<&'c str> {
        let mut in_section = false;

        for line in config.lines() {
            let line = line.trim();
            if line.starts_with('[') && line.ends_with(']') {
                in_section = line[1..line.len() - 1].trim() == section;
            } else if in_section {
                if let Some((k, v)) = line.split_once('=') {
                    if k.trim() == key {
                        return Some(v.trim());
                    }
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> Box<dyn std::io::Write> {
        Box::new(std::io::sink())
    }

    #[test]
    fn test_discover_finds_repository_from_nested_directory() {
        let dir = assert_fs::TempDir::new().unwrap();
        let mut repository =
            Repository::new(&dir.path().to_string_lossy(), sink()).unwrap();
        repository.init().unwrap();

        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Repository::discover(&nested, sink()).unwrap();
        assert_eq!(found.path(), dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_discover_fails_outside_any_repository() {
        let dir = assert_fs::TempDir::new().unwrap();
        let err = Repository::discover(dir.path(), sink()).unwrap_err();
        assert!(err.to_string().contains("Not a repository"));
    }

    #[test]
    fn test_unsupported_format_version_is_rejected() {
        let dir = assert_fs::TempDir::new().unwrap();
        let mut repository =
            Repository::new(&dir.path().to_string_lossy(), sink()).unwrap();
        repository.init().unwrap();

        std::fs::write(
            dir.path().join(".git/config"),
            "[core]\n\trepositoryformatversion = 1\n",
        )
        .unwrap();

        let err = Repository::discover(dir.path(), sink()).unwrap_err();
        assert!(err.to_string().contains("Unsupported repositoryformatversion"));
    }

    #[test]
    fn test_config_value_lookup() {
        let config = "[core]\n\trepositoryformatversion = 0\n\tbare = false\n[user]\n\tname = a\n";
        assert_eq!(
            Repository::config_value(config, "core", "repositoryformatversion"),
            Some("0")
        );
        assert_eq!(Repository::config_value(config, "user", "name"), Some("a"));
        assert_eq!(Repository::config_value(config, "core", "name"), None);
    }
}
