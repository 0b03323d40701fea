//! Tree object: an ordered list of mode/path/target entries.
//!
//! Body format, repeated until the buffer is exhausted:
//!
//! ```text
//! <mode ascii, 5-6 octal digits> SP <path bytes> NUL <20 raw hash bytes>
//! ```
//!
//! Entry order is preserved as stored; this layer imposes no sorting, so
//! encode is a byte-identical inverse of decode.

use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    mode: String,
    path: Bytes,
    oid: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: String, path: impl Into<Bytes>, oid: ObjectId) -> anyhow::Result<Self> {
        if !(5..=6).contains(&mode.len()) {
            anyhow::bail!("invalid tree entry mode {mode:?}: expected 5 or 6 characters");
        }
        Ok(TreeEntry {
            mode,
            path: path.into(),
            oid,
        })
    }

    /// Mode string exactly as stored ("100644", "40000", ...).
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Mode left-padded to 6 digits, for display.
    pub fn padded_mode(&self) -> String {
        format!("{:0>6}", self.mode)
    }

    pub fn path(&self) -> &Bytes {
        &self.path
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut out = Vec::new();

        for entry in &self.entries {
            out.extend_from_slice(entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.path);
            out.push(0);
            entry.oid.write_h40_to(&mut out)?;
        }

        Ok(Bytes::from(out))
    }
}

impl Unpackable for Tree {
    fn deserialize(body: Bytes) -> anyhow::Result<Self> {
        let raw = body.as_ref();
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < raw.len() {
            let space = find_byte(raw, pos, b' ').ok_or_else(|| {
                anyhow::anyhow!("truncated tree entry at offset {pos}: missing mode terminator")
            })?;
            let mode_len = space - pos;
            if !(5..=6).contains(&mode_len) {
                anyhow::bail!(
                    "invalid tree entry mode length {mode_len} at offset {pos}: expected 5 or 6"
                );
            }
            let mode = std::str::from_utf8(&raw[pos..space])?.to_string();

            let nul = find_byte(raw, space + 1, 0).ok_or_else(|| {
                anyhow::anyhow!("truncated tree entry at offset {pos}: missing path terminator")
            })?;
            let path = body.slice(space + 1..nul);

            if nul + 21 > raw.len() {
                anyhow::bail!("truncated tree entry at offset {pos}: missing object id");
            }
            let oid = ObjectId::read_h40_from(&mut &raw[nul + 1..nul + 21])?;

            entries.push(TreeEntry { mode, path, oid });
            pos = nul + 21;
        }

        Ok(Tree { entries })
    }
}

fn find_byte(haystack: &[u8], from: usize, needle: u8) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}
