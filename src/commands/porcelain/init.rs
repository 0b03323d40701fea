use crate::areas::repository::Repository;
use anyhow::Context;
use std::io::Write;

const DEFAULT_CONFIG: &str = "\
[core]
\trepositoryformatversion = 0
\tfilemode = false
\tbare = false
";

const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

impl Repository {
    /// Create the `.git` layout: object area, ref namespaces, description,
    /// a HEAD pointing at master, and the default config.
    pub fn init(&mut self) -> anyhow::Result<()> {
        let git_path = self.git_path();

        for dir in ["objects", "refs/heads", "refs/tags", "branches"] {
            std::fs::create_dir_all(git_path.join(dir))
                .context(format!("Unable to create {dir} directory"))?;
        }

        std::fs::write(git_path.join("description"), DEFAULT_DESCRIPTION)?;
        std::fs::write(git_path.join("HEAD"), "ref: refs/heads/master\n")?;
        std::fs::write(git_path.join("config"), DEFAULT_CONFIG)?;

        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            git_path.display()
        )?;

        Ok(())
    }
}
