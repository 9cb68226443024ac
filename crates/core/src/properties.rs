//! Java-style `.properties` file parsing
//!
//! `key.properties` and friends are consumed by Gradle through
//! `java.util.Properties`, so this parser follows the same logical-line
//! rules: backslash line continuations, `#`/`!` comments, `=`/`:`/whitespace
//! separators, and backslash escape sequences including `\uXXXX`.
//!
//! Unlike `java.util.Properties`, input is read as UTF-8 and malformed
//! syntax is rejected outright rather than silently repaired: a signing
//! identity must never be half-loaded from a corrupt file.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed key-value properties with deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Read and parse a properties file.
    ///
    /// The file must exist; callers that treat a missing file as "no
    /// configuration" check existence first.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read {}: {}", path.display(), e)).with_source(e)
        })?;
        Self::parse_named(&text, path)
    }

    /// Parse properties text not backed by a file.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_named(text, Path::new("<input>"))
    }

    /// Parse properties text, attributing errors to `source`.
    pub fn parse_named(text: &str, source: &Path) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let lines: Vec<&str> = text.lines().collect();
        let mut i = 0;

        while i < lines.len() {
            let start_line = i + 1;
            let stripped = lines[i].trim_start();

            if stripped.is_empty() || stripped.starts_with('#') || stripped.starts_with('!') {
                i += 1;
                continue;
            }

            // Join continuation lines into one logical line. A trailing odd
            // run of backslashes continues onto the next natural line, with
            // that line's leading whitespace dropped.
            let mut logical = String::new();
            loop {
                let part = lines[i].trim_start();
                if has_continuation(part) {
                    logical.push_str(&part[..part.len() - 1]);
                    i += 1;
                    if i >= lines.len() {
                        return Err(Error::properties_syntax(
                            source,
                            i,
                            "unterminated line continuation",
                        ));
                    }
                } else {
                    logical.push_str(part);
                    i += 1;
                    break;
                }
            }

            let (raw_key, raw_value) = split_entry(&logical);
            let key = unescape(raw_key, source, start_line)?;
            let value = unescape(raw_value, source, start_line)?;
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Get a value by key, treating blank (empty or whitespace-only)
    /// values as unset.
    pub fn get_nonblank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the file defined no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// True if the line ends with an odd number of backslashes.
fn has_continuation(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Split a logical line at the first unescaped `=`, `:`, or whitespace run.
/// Returns raw (still escaped) key and value slices.
fn split_entry(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' => idx += 2,
            b'=' | b':' | b' ' | b'\t' => break,
            _ => idx += 1,
        }
    }
    if idx >= bytes.len() {
        // No separator: the whole line is the key, value is empty.
        return (line, "");
    }

    let key = &line[..idx.min(line.len())];
    let mut rest = line[idx.min(line.len())..].trim_start();
    // Whitespace may precede the actual separator character.
    if rest.starts_with('=') || rest.starts_with(':') {
        rest = rest[1..].trim_start();
    }
    (key, rest)
}

/// Decode backslash escapes. Unknown escapes collapse to the escaped
/// character, matching `java.util.Properties`; malformed `\uXXXX` is a
/// syntax error.
fn unescape(raw: &str, source: &Path, line: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars
                        .next()
                        .and_then(|h| h.to_digit(16))
                        .ok_or_else(|| {
                            Error::properties_syntax(source, line, "malformed \\uXXXX escape")
                        })?;
                    code = code * 16 + digit;
                }
                let decoded = char::from_u32(code).ok_or_else(|| {
                    Error::properties_syntax(source, line, "malformed \\uXXXX escape")
                })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {
                return Err(Error::properties_syntax(
                    source,
                    line,
                    "dangling backslash at end of entry",
                ));
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_basic_key_value() {
        let props = Properties::parse("storeFile=release.keystore\nkeyAlias=upload\n").unwrap();
        assert_eq!(props.get("storeFile"), Some("release.keystore"));
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_separator_variants() {
        let props = Properties::parse("a=1\nb:2\nc 3\nd\t=\t4\n").unwrap();
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("2"));
        assert_eq!(props.get("c"), Some("3"));
        assert_eq!(props.get("d"), Some("4"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let text = "# keystore credentials\n! legacy comment\n\n  # indented comment\nkeyAlias=upload\n";
        let props = Properties::parse(text).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_line_continuation_strips_leading_whitespace() {
        let props = Properties::parse("storeFile=keys/\\\n    release.keystore\n").unwrap();
        assert_eq!(props.get("storeFile"), Some("keys/release.keystore"));
    }

    #[test]
    fn test_even_trailing_backslashes_do_not_continue() {
        // "\\\\" is an escaped backslash, not a continuation.
        let props = Properties::parse("storeFile=C:\\\\keys\\\\\nkeyAlias=upload\n").unwrap();
        assert_eq!(props.get("storeFile"), Some("C:\\keys\\"));
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_escaped_separator_in_key() {
        let props = Properties::parse("store\\=file=name\n").unwrap();
        assert_eq!(props.get("store=file"), Some("name"));
    }

    #[test]
    fn test_escape_sequences() {
        let props = Properties::parse("a=tab\\there\\nnewline\nb=\\u0041BC\n").unwrap();
        assert_eq!(props.get("a"), Some("tab\there\nnewline"));
        assert_eq!(props.get("b"), Some("ABC"));
    }

    #[test]
    fn test_unknown_escape_collapses() {
        let props = Properties::parse("path=a\\b\n").unwrap();
        assert_eq!(props.get("path"), Some("ab"));
    }

    #[test]
    fn test_key_only_line_has_empty_value() {
        let props = Properties::parse("storePassword\n").unwrap();
        assert_eq!(props.get("storePassword"), Some(""));
        assert_eq!(props.get_nonblank("storePassword"), None);
    }

    #[test]
    fn test_last_entry_wins() {
        let props = Properties::parse("keyAlias=old\nkeyAlias=new\n").unwrap();
        assert_eq!(props.get("keyAlias"), Some("new"));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_non_ascii_values() {
        let props = Properties::parse("storePassword=пароль\n").unwrap();
        assert_eq!(props.get("storePassword"), Some("пароль"));
    }

    #[test]
    fn test_unterminated_continuation_is_error() {
        let err = Properties::parse("keyAlias=upload\nstoreFile=release.keystore\\").unwrap_err();
        assert_eq!(err.code, ErrorCode::PropertiesSyntaxError);
        assert!(err.message.contains("line 2"));
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_short_unicode_escape_is_error() {
        let err = Properties::parse("a=\\u00\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::PropertiesSyntaxError);
    }

    #[test]
    fn test_non_hex_unicode_escape_is_error() {
        let err = Properties::parse("a=\\uZZZZ\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::PropertiesSyntaxError);
    }

    #[test]
    fn test_load_from_file_names_path_in_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("key.properties");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "storeFile=release.keystore\\").unwrap();

        let err = Properties::load(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::PropertiesSyntaxError);
        assert!(err.message.contains("key.properties"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Properties::load(dir.path().join("absent.properties")).unwrap_err();
        assert_eq!(err.code.category(), "IO");
    }
}
