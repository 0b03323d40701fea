//! Key-value-list-with-message: the text body format of commit and tag
//! objects.
//!
//! A body is a run of `key value\n` lines followed by a blank line and a
//! free-text message that extends to the end of the buffer. Values may span
//! multiple lines; continuation lines carry a single leading space that is
//! stripped on parse and re-added on serialization. A key may occur more
//! than once (`parent` in merge commits), in which case its values collapse
//! into an ordered list.
//!
//! ## Example
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! author Alice <alice@example.com> 1527025023 +0200
//!
//! Initial commit
//! ```

use anyhow::Context;
use bytes::Bytes;

/// Ordered key → values multimap plus the distinguished message tail.
///
/// Field order is insertion order of first occurrence; values of a repeated
/// key keep append order. The message is always present (possibly empty)
/// and always serializes last, preceded by a blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kvlm {
    fields: Vec<(Bytes, Vec<Bytes>)>,
    message: Bytes,
}

impl Kvlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw body.
    ///
    /// Runs as a loop over an offset cursor rather than recursing per line,
    /// so a pathological body cannot grow the stack.
    pub fn parse(raw: &[u8]) -> anyhow::Result<Self> {
        let mut fields: Vec<(Bytes, Vec<Bytes>)> = Vec::new();
        let mut message = Bytes::new();
        let mut pos = 0;

        while pos < raw.len() {
            let space = find_byte(raw, pos, b' ');
            let newline = find_byte(raw, pos, b'\n');

            // A blank line (newline at the cursor, before any space) ends the
            // key-value block; the rest of the buffer is the message.
            let at_message = match (space, newline) {
                (None, _) => true,
                (Some(s), Some(n)) => n < s,
                (Some(_), None) => false,
            };

            if at_message {
                if newline != Some(pos) {
                    anyhow::bail!(
                        "malformed key-value block at offset {pos}: expected blank line"
                    );
                }
                message = Bytes::copy_from_slice(&raw[pos + 1..]);
                break;
            }

            let space = space.expect("space exists when not at message");
            let key = Bytes::copy_from_slice(&raw[pos..space]);

            // The value ends at the first newline not followed by a
            // continuation space.
            let mut end = space;
            loop {
                end = find_byte(raw, end + 1, b'\n').with_context(|| {
                    format!(
                        "unterminated value for key {:?}",
                        String::from_utf8_lossy(&key)
                    )
                })?;
                if end + 1 >= raw.len() || raw[end + 1] != b' ' {
                    break;
                }
            }

            let value = unfold(&raw[space + 1..end]);

            // Repeated keys promote to a list instead of overwriting
            match fields.iter_mut().find(|(k, _)| *k == key) {
                Some((_, values)) => values.push(value),
                None => fields.push((key, vec![value])),
            }

            pos = end + 1;
        }

        Ok(Kvlm { fields, message })
    }

    /// Serialize back to the on-disk body. Lossless inverse of [`parse`]
    /// for well-formed input.
    ///
    /// [`parse`]: Kvlm::parse
    pub fn serialize(&self) -> Bytes {
        let mut out = Vec::new();

        for (key, values) in &self.fields {
            for value in values {
                out.extend_from_slice(key);
                out.push(b' ');
                out.extend_from_slice(&fold(value));
                out.push(b'\n');
            }
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message);

        Bytes::from(out)
    }

    /// All values recorded for `key`, in append order.
    pub fn get(&self, key: &[u8]) -> Option<&[Bytes]> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, values)| values.as_slice())
    }

    /// First value recorded for `key`.
    pub fn first(&self, key: &[u8]) -> Option<&Bytes> {
        self.get(key).and_then(|values| values.first())
    }

    /// Append a value, promoting an existing key to a list.
    pub fn push(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((key, vec![value])),
        }
    }

    pub fn message(&self) -> &Bytes {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<Bytes>) {
        self.message = message.into();
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

/// Strip the continuation-space after each embedded newline.
fn unfold(raw: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'\n' && i + 1 < raw.len() && raw[i + 1] == b' ' {
            out.push(b'\n');
            i += 2;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    Bytes::from(out)
}

/// Re-indent embedded newlines with a single leading space.
fn fold(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for &b in value {
        out.push(b);
        if b == b'\n' {
            out.push(b' ');
        }
    }
    out
}
