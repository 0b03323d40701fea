use crate::areas::repository::Repository;
use crate::artifacts::kvlm::Kvlm;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::revision::Revision;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// List tag names, one per line, name-sorted.
    pub fn tag_list(&mut self) -> anyhow::Result<()> {
        let tags_path = self.git_path().join("refs/tags");
        let tree = self.refs().list(Some(tags_path.as_path()))?;

        for (name, _) in tree.flatten("") {
            writeln!(self.writer(), "{name}")?;
        }

        Ok(())
    }

    /// Create a tag named `name` pointing at whatever `target` resolves to.
    ///
    /// A lightweight tag is just a reference file; an annotated tag stores
    /// a Tag object first and points the reference at that.
    pub fn tag_create(&mut self, name: &str, target: &str, annotate: bool) -> anyhow::Result<()> {
        let target_oid = Revision::parse(target)
            .resolve(self, None, true)?
            .context(format!("No such reference: {target}"))?;

        let ref_target = if annotate {
            let target_type = self.database().get_object_type(&target_oid)?;

            let mut kvlm = Kvlm::new();
            kvlm.push(&b"object"[..], target_oid.to_string());
            kvlm.push(&b"type"[..], target_type.as_str().to_string());
            kvlm.push(&b"tag"[..], name.to_string());
            kvlm.push(&b"tagger"[..], Self::tagger_identity());
            kvlm.set_message(format!("{name}\n"));

            self.database().store(&GitObject::Tag(Tag::new(kvlm)), true)?
        } else {
            target_oid
        };

        self.refs().create_ref(&format!("refs/tags/{name}"), &ref_target)
    }

    /// `Name <email> timestamp offset`, from the environment where set.
    fn tagger_identity() -> String {
        let name =
            std::env::var("GIT_AUTHOR_NAME").unwrap_or_else(|_| "anonymous".to_string());
        let email = std::env::var("GIT_AUTHOR_EMAIL")
            .unwrap_or_else(|_| "anonymous@localhost".to_string());
        let now = chrono::Local::now().fixed_offset();

        format!("{} <{}> {} {}", name, email, now.timestamp(), now.format("%z"))
    }
}
