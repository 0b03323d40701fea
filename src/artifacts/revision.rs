//! Name → hash resolution.
//!
//! A revision name can be:
//! - `HEAD` (or the `@` alias): the head pointer, resolved through the
//!   reference store and never treated as a hash
//! - a full 40-hex hash: accepted directly, lower-cased
//! - a short hash of 4+ hex digits: prefix-matched against the object area
//! - a tag or branch name: looked up as `refs/tags/<name>` then
//!   `refs/heads/<name>`
//!
//! Several interpretations may apply at once; resolution collects every
//! candidate and treats more than one as an ambiguity error rather than
//! picking silently.

use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use log::debug;

/// Spellings that resolve to another name before anything else happens.
pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};

const HASH_REGEX: &str = r"^[0-9A-Fa-f]{1,40}$";

/// Minimum length for a hex string to count as a short hash
const MIN_ABBREV_LENGTH: usize = 4;

/// Maximum tag/commit dereferences before declaring a cycle
pub const MAX_FOLLOW_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub struct Revision(String);

impl Revision {
    pub fn parse(name: &str) -> Self {
        let resolved = *REF_ALIASES.get(name).unwrap_or(&name);
        Revision(resolved.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Collect every hash this name could denote. Exact against the store
    /// and the reference namespace; no ordering is guaranteed.
    pub fn candidates(&self, repository: &Repository) -> anyhow::Result<Vec<ObjectId>> {
        let name = self.0.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }

        // HEAD is nonambiguous: only ever the head pointer
        if name == crate::areas::refs::HEAD_REF_NAME {
            return Ok(vec![repository.refs().resolve(name)?]);
        }

        let mut candidates = Vec::new();

        if regex::Regex::new(HASH_REGEX)?.is_match(name) {
            if name.len() == OBJECT_ID_LENGTH {
                // A complete hash is taken at face value, unverified
                return Ok(vec![ObjectId::try_parse(name.to_string())?]);
            }
            if name.len() >= MIN_ABBREV_LENGTH {
                candidates.extend(
                    repository
                        .database()
                        .find_objects_by_prefix(&name.to_ascii_lowercase())?,
                );
            }
        }

        // Plain tag and branch names, in git's lookup order
        for ref_name in [format!("refs/tags/{name}"), format!("refs/heads/{name}")] {
            if repository.git_path().join(&ref_name).is_file() {
                let oid = repository.refs().resolve(&ref_name)?;
                if !candidates.contains(&oid) {
                    candidates.push(oid);
                }
            }
        }

        debug!("revision {name} has {} candidate(s)", candidates.len());
        Ok(candidates)
    }

    /// Resolve to exactly one hash, optionally coercing to a wanted type by
    /// following tag → object and commit → tree indirections.
    ///
    /// Returns `Ok(None)` when the object exists but cannot reach the
    /// wanted type (the distinguished "no match" outcome).
    pub fn resolve(
        &self,
        repository: &Repository,
        want: Option<ObjectType>,
        follow: bool,
    ) -> anyhow::Result<Option<ObjectId>> {
        let mut candidates = self.candidates(repository)?;

        if candidates.is_empty() {
            anyhow::bail!("No such reference: {}", self.0);
        }
        if candidates.len() > 1 {
            let mut listing: Vec<String> =
                candidates.iter().map(|oid| oid.to_string()).collect();
            listing.sort();
            anyhow::bail!(
                "Ambiguous reference {}: candidates are:\n - {}",
                self.0,
                listing.join("\n - ")
            );
        }
        let mut oid = candidates.remove(0);

        let Some(want) = want else {
            // No coercion requested: done without touching the store
            return Ok(Some(oid));
        };

        for _ in 0..MAX_FOLLOW_DEPTH {
            let object = repository.database().load(&oid)?;

            if object.object_type() == want {
                return Ok(Some(oid));
            }
            if !follow {
                return Ok(None);
            }

            match object {
                GitObject::Tag(tag) => oid = tag.target()?,
                GitObject::Commit(commit) if want == ObjectType::Tree => {
                    oid = commit.tree_oid()?;
                }
                _ => return Ok(None),
            }
        }

        anyhow::bail!(
            "object dereference chain for {} exceeds {MAX_FOLLOW_DEPTH} links",
            self.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::kvlm::Kvlm;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::commit::Commit;
    use crate::artifacts::objects::tag::Tag;
    use crate::artifacts::objects::tree::Tree;

    fn temp_repository() -> (assert_fs::TempDir, Repository) {
        let dir = assert_fs::TempDir::new().unwrap();
        let mut repository = Repository::new(
            &dir.path().to_string_lossy(),
            Box::new(std::io::sink()),
        )
        .unwrap();
        repository.init().unwrap();
        (dir, repository)
    }

    /// Plant an empty object file at an arbitrary hash; candidate
    /// collection only looks at filenames.
    fn plant_object_file(repository: &Repository, hex: &str) {
        let (dir, file) = hex.split_at(2);
        let dir_path = repository.database().objects_path().join(dir);
        std::fs::create_dir_all(&dir_path).unwrap();
        std::fs::write(dir_path.join(file), b"").unwrap();
    }

    #[test]
    fn test_alias_resolves_to_head() {
        assert_eq!(Revision::parse("@").name(), "HEAD");
        assert_eq!(Revision::parse("main").name(), "main");
    }

    #[test]
    fn test_empty_name_has_no_candidates() {
        let (_dir, repository) = temp_repository();
        assert!(
            Revision::parse("")
                .candidates(&repository)
                .unwrap()
                .is_empty()
        );
        assert!(
            Revision::parse("  ")
                .candidates(&repository)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_full_hash_is_accepted_unverified_and_lowercased() {
        let (_dir, repository) = temp_repository();
        let name = "CE013625030BA8DBA906F756967F9E9CA394464B";

        let candidates = Revision::parse(name).candidates(&repository).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].as_ref(),
            "ce013625030ba8dba906f756967f9e9ca394464b"
        );
    }

    #[test]
    fn test_head_resolves_through_reference_store() {
        let (dir, repository) = temp_repository();
        let hash = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        std::fs::write(
            dir.path().join(".git/refs/heads/master"),
            format!("{hash}\n"),
        )
        .unwrap();

        let resolved = Revision::parse("HEAD")
            .resolve(&repository, None, true)
            .unwrap();
        assert_eq!(resolved.unwrap().as_ref(), hash);
    }

    #[test]
    fn test_short_hash_with_unique_prefix_resolves() {
        let (_dir, repository) = temp_repository();
        plant_object_file(&repository, &format!("abcd{}", "0".repeat(36)));

        let resolved = Revision::parse("abcd")
            .resolve(&repository, None, true)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.as_ref(), format!("abcd{}", "0".repeat(36)));
    }

    #[test]
    fn test_shared_prefix_is_ambiguous_and_lists_both() {
        let (_dir, repository) = temp_repository();
        let first = format!("abcd{}", "0".repeat(36));
        let second = format!("abcd{}", "f".repeat(36));
        plant_object_file(&repository, &first);
        plant_object_file(&repository, &second);

        let err = Revision::parse("abcd")
            .resolve(&repository, None, true)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Ambiguous reference abcd"), "{message}");
        assert!(message.contains(&first));
        assert!(message.contains(&second));
    }

    #[test]
    fn test_three_char_hex_is_not_a_short_hash() {
        let (_dir, repository) = temp_repository();
        plant_object_file(&repository, &format!("abcd{}", "0".repeat(36)));

        let err = Revision::parse("abc")
            .resolve(&repository, None, true)
            .unwrap_err();
        assert!(err.to_string().contains("No such reference"));
    }

    #[test]
    fn test_branch_name_resolves_via_refs_heads() {
        let (dir, repository) = temp_repository();
        let hash = "cccccccccccccccccccccccccccccccccccccccc";
        std::fs::write(dir.path().join(".git/refs/heads/main"), format!("{hash}\n")).unwrap();

        let resolved = Revision::parse("main")
            .resolve(&repository, None, true)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.as_ref(), hash);
    }

    #[test]
    fn test_commit_coerces_to_its_tree() {
        let (_dir, repository) = temp_repository();

        let tree_oid = repository
            .database()
            .store(&GitObject::Tree(Tree::default()), true)
            .unwrap();

        let mut kvlm = Kvlm::new();
        kvlm.push(&b"tree"[..], tree_oid.to_string());
        kvlm.set_message(&b"snapshot\n"[..]);
        let commit_oid = repository
            .database()
            .store(&GitObject::Commit(Commit::new(kvlm)), true)
            .unwrap();

        let coerced = Revision::parse(commit_oid.as_ref())
            .resolve(&repository, Some(ObjectType::Tree), true)
            .unwrap();
        assert_eq!(coerced, Some(tree_oid.clone()));

        // Without following, a commit is not a tree
        let unfollowed = Revision::parse(commit_oid.as_ref())
            .resolve(&repository, Some(ObjectType::Tree), false)
            .unwrap();
        assert_eq!(unfollowed, None);
    }

    #[test]
    fn test_tag_chain_dereferences_to_target() {
        let (_dir, repository) = temp_repository();

        let blob_oid = repository
            .database()
            .store(&GitObject::Blob(Blob::new(&b"payload\n"[..])), true)
            .unwrap();

        let mut kvlm = Kvlm::new();
        kvlm.push(&b"object"[..], blob_oid.to_string());
        kvlm.push(&b"type"[..], &b"blob"[..]);
        kvlm.push(&b"tag"[..], &b"v1.0"[..]);
        kvlm.set_message(&b"release\n"[..]);
        let tag_oid = repository
            .database()
            .store(&GitObject::Tag(Tag::new(kvlm)), true)
            .unwrap();

        let resolved = Revision::parse(tag_oid.as_ref())
            .resolve(&repository, Some(ObjectType::Blob), true)
            .unwrap();
        assert_eq!(resolved, Some(blob_oid));
    }

    #[test]
    fn test_blob_does_not_coerce_to_commit() {
        let (_dir, repository) = temp_repository();
        let blob_oid = repository
            .database()
            .store(&GitObject::Blob(Blob::new(&b"data\n"[..])), true)
            .unwrap();

        let resolved = Revision::parse(blob_oid.as_ref())
            .resolve(&repository, Some(ObjectType::Commit), true)
            .unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_self_referential_tag_hits_the_follow_bound() {
        let (_dir, repository) = temp_repository();

        // Forge a tag whose object field is its own storage id. The store
        // never verifies hashes on read, so the loop is reachable only
        // through this kind of corruption.
        let self_oid = format!("abcd{}", "0".repeat(36));

        let mut kvlm = Kvlm::new();
        kvlm.push(&b"object"[..], self_oid.clone());
        kvlm.push(&b"type"[..], &b"tag"[..]);
        kvlm.set_message(&b""[..]);
        let body = GitObject::Tag(Tag::new(kvlm)).body().unwrap();

        let mut framed = format!("tag {}\0", body.len()).into_bytes();
        framed.extend_from_slice(&body);

        let (dir_part, file_part) = self_oid.split_at(2);
        let dir_path = repository.database().objects_path().join(dir_part);
        std::fs::create_dir_all(&dir_path).unwrap();
        let compressed = {
            use std::io::Write;
            let mut encoder =
                flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&framed).unwrap();
            encoder.finish().unwrap()
        };
        std::fs::write(dir_path.join(file_part), compressed).unwrap();

        let err = Revision::parse(&self_oid)
            .resolve(&repository, Some(ObjectType::Commit), true)
            .unwrap_err();
        assert!(err.to_string().contains("exceeds 32 links"), "{err}");
    }
}
