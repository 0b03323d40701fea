//! Loose-object database.
//!
//! Objects are stored one per file, zlib-compressed, at a path derived from
//! their hash (`<hash[0:2]>/<hash[2:]>`), which keeps any single directory's
//! entry count bounded. The decompressed form carries a `<type> <len>\0`
//! header, making every object self-describing and verifiable without a
//! side index.

use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use fake::rand;
use log::debug;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, new)]
pub struct Database {
    /// Root of the object area (`.git/objects`)
    path: Box<Path>,
}

impl Database {
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Hash an object and, unless `persist` is false, write it to the store.
    ///
    /// The hash is returned unconditionally, so hashing works as a pure
    /// function of content. An existing destination is treated as already
    /// written: identity is content-derived, so same hash means same bytes.
    pub fn store(&self, object: &GitObject, persist: bool) -> anyhow::Result<ObjectId> {
        let framed = object.serialize()?;
        let oid = object.object_id()?;

        if persist {
            let object_path = self.path.join(oid.to_path());
            if !object_path.exists() {
                std::fs::create_dir_all(
                    object_path
                        .parent()
                        .context(format!("Invalid object path {}", object_path.display()))?,
                )
                .context(format!(
                    "Unable to create object directory {}",
                    object_path.display()
                ))?;

                self.write_object(object_path, framed)?;
                debug!("stored {} object {oid}", object.object_type());
            }
        }

        Ok(oid)
    }

    /// Read, decompress and decode the object named by `oid`.
    ///
    /// The declared body length must equal the actual byte count after the
    /// header's null terminator; a mismatch is corruption, not truncation.
    pub fn load(&self, oid: &ObjectId) -> anyhow::Result<GitObject> {
        let raw = self.read_object(oid)?;
        let (object_type, body) = Self::split_header(raw, oid)?;

        GitObject::deserialize(object_type, body)
    }

    /// Decode just enough of the object to learn its kind.
    pub fn get_object_type(&self, oid: &ObjectId) -> anyhow::Result<ObjectType> {
        let raw = self.read_object(oid)?;
        let (object_type, _) = Self::split_header(raw, oid)?;

        Ok(object_type)
    }

    /// Every stored object whose id starts with `prefix` (at least the
    /// 2-character directory part). Exact against what is physically stored.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if prefix.len() < 2 {
            anyhow::bail!("object prefix too short: {prefix:?}");
        }

        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = self.path.join(dir_name);

        let mut matches = Vec::new();
        if dir_path.is_dir() {
            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let file_name = entry.file_name();
                let file_name_str = file_name.to_string_lossy();

                if file_name_str.starts_with(file_prefix) {
                    if let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name_str}")) {
                        matches.push(oid);
                    }
                }
            }
        }

        debug!("prefix {prefix} matched {} object(s)", matches.len());
        Ok(matches)
    }

    fn read_object(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(oid.to_path());

        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
            .context(format!("Corrupt object {oid}: decompression failed"))
    }

    /// Split `<type> <len>\0<body>` and validate the declared length.
    fn split_header(raw: Bytes, oid: &ObjectId) -> anyhow::Result<(ObjectType, Bytes)> {
        let space = raw
            .iter()
            .position(|&b| b == b' ')
            .context(format!("Malformed object {oid}: missing type terminator"))?;
        let nul = raw[space..]
            .iter()
            .position(|&b| b == 0)
            .map(|i| space + i)
            .context(format!("Malformed object {oid}: missing length terminator"))?;

        let object_type = ObjectType::try_from(std::str::from_utf8(&raw[..space])?)
            .context(format!("Malformed object {oid}: unknown type tag"))?;
        let declared: usize = std::str::from_utf8(&raw[space + 1..nul])?
            .parse()
            .context(format!("Malformed object {oid}: bad length field"))?;

        let body = raw.slice(nul + 1..);
        if body.len() != declared {
            anyhow::bail!(
                "Malformed object {oid}: header declares {declared} bytes, payload has {}",
                body.len()
            );
        }

        Ok((object_type, body))
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
