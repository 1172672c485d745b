//! Reversible path-to-key translation.
//!
//! A key is the percent-encoded segments of a path joined with the
//! delimiter, behind an optional fixed prefix. Encoding escapes the
//! characters a flat backend cannot hold literally inside one segment,
//! which keeps the delimiter unambiguous and makes the mapping an exact
//! inverse pair: `as_path(as_key(p)) == p` for every valid path, and
//! `as_path` rejects any key `as_key` could not have produced.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::path::{Path, PathError};

/// Path delimiter inside keys.
///
/// Fixed rather than configurable: the original notebook-storage adapter
/// pins it at construction no matter what was configured, and the segment
/// encoding set is keyed to it.
pub const DELIMITER: char = '/';

/// Bytes escaped inside a single key segment: the escape character
/// itself, the delimiter, and control bytes. Non-ASCII is always
/// percent-encoded.
const SEGMENT_SET: &AsciiSet = &CONTROLS.add(b'%').add(b'/');

/// Translates between [`Path`]s and flat store keys under a fixed prefix.
#[derive(Debug, Clone)]
pub struct KeyCodec {
    /// Encoded prefix key; empty when the codec covers the whole
    /// namespace.
    prefix: String,
}

impl KeyCodec {
    /// Create a codec rooted at `prefix`.
    pub fn new(prefix: &Path) -> Self {
        KeyCodec {
            prefix: encode_segments(prefix),
        }
    }

    /// Flat key for `path`.
    ///
    /// The root path maps to the bare prefix (the empty key when no
    /// prefix is configured).
    pub fn as_key(&self, path: &Path) -> String {
        if path.is_root() {
            return self.prefix.clone();
        }
        let encoded = encode_segments(path);
        if self.prefix.is_empty() {
            encoded
        } else {
            format!("{}{}{}", self.prefix, DELIMITER, encoded)
        }
    }

    /// Path for a flat key, the exact inverse of [`KeyCodec::as_key`].
    ///
    /// Fails when the key lies outside the configured prefix, or when any
    /// segment is not the canonical encoding `as_key` produces (malformed
    /// escapes, non-UTF-8 content, lowercase hex, unescaped specials).
    pub fn as_path(&self, key: &str) -> Result<Path, PathError> {
        let rest = if self.prefix.is_empty() {
            key
        } else if key == self.prefix {
            ""
        } else {
            let rest = key
                .strip_prefix(&self.prefix)
                .and_then(|r| r.strip_prefix(DELIMITER))
                .ok_or_else(|| PathError::ForeignKey {
                    key: key.to_string(),
                })?;
            // The root encodes as the bare prefix; a trailing delimiter
            // is nothing `as_key` produces.
            if rest.is_empty() {
                return Err(PathError::NonCanonicalKey {
                    key: key.to_string(),
                    message: "trailing delimiter".to_string(),
                });
            }
            rest
        };

        if rest.is_empty() {
            return Ok(Path::root());
        }

        let mut segments = Vec::new();
        for raw in rest.split(DELIMITER) {
            segments.push(decode_segment(key, raw)?);
        }
        Path::from_segments(segments)
    }

    /// Scan prefix covering every key strictly below directory `path`.
    pub fn dir_prefix(&self, path: &Path) -> String {
        let key = self.as_key(path);
        if key.is_empty() {
            // Unprefixed root: the whole namespace.
            String::new()
        } else {
            format!("{}{}", key, DELIMITER)
        }
    }
}

fn encode_segments(path: &Path) -> String {
    path.iter()
        .map(|seg| utf8_percent_encode(seg, SEGMENT_SET).to_string())
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

fn decode_segment(key: &str, raw: &str) -> Result<String, PathError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| PathError::NonCanonicalKey {
            key: key.to_string(),
            message: format!("segment '{}' does not decode to UTF-8", raw),
        })?
        .into_owned();

    // percent_decode passes malformed escapes through untouched, so the
    // only reliable strictness check is to re-encode and compare.
    let reencoded = utf8_percent_encode(&decoded, SEGMENT_SET).to_string();
    if reencoded != raw {
        return Err(PathError::NonCanonicalKey {
            key: key.to_string(),
            message: format!("segment '{}' re-encodes as '{}'", raw, reencoded),
        });
    }

    Ok(decoded)
}
