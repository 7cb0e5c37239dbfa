//! Glob patterns: compiled to a `RegexSet` for the blocklist, or translated
//! to SQL `LIKE` for resource purges.
//!
//! Only `*` (any run of characters, `/` included) and `?` (one character)
//! are special. Everything else matches literally.

use footprint_core::errors::ConfigError;
use regex::RegexSet;

/// Anchored regex source equivalent to `glob`.
pub fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2 + 2);
    out.push('^');
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            other => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
    }
    out.push('$');
    out
}

/// `LIKE` pattern equivalent to `glob`, escaped with `\`.
pub fn glob_to_like(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    for c in glob.chars() {
        match c {
            '*' => out.push('%'),
            '?' => out.push('_'),
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            other => out.push(other),
        }
    }
    out
}

/// Compiled resource blocklist.
#[derive(Debug, Clone)]
pub struct BlockList {
    set: RegexSet,
    patterns: Vec<String>,
}

impl BlockList {
    /// Compile all patterns into a single `RegexSet`.
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        for pattern in patterns {
            if pattern.is_empty() {
                return Err(ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: "empty pattern".to_string(),
                });
            }
        }
        let regexes: Vec<String> = patterns.iter().map(|p| glob_to_regex(p)).collect();
        let set = RegexSet::new(&regexes).map_err(|e| ConfigError::InvalidPattern {
            pattern: patterns.join(", "),
            message: e.to_string(),
        })?;
        Ok(Self {
            set,
            patterns: patterns.to_vec(),
        })
    }

    /// Check if any pattern matches (single pass).
    pub fn is_blocked(&self, uri: &str) -> bool {
        self.set.is_match(uri)
    }

    /// Patterns as configured.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_core::constants::DEFAULT_BLOCKED_PATTERNS;

    fn defaults() -> BlockList {
        let patterns: Vec<String> = DEFAULT_BLOCKED_PATTERNS.iter().map(|p| p.to_string()).collect();
        BlockList::compile(&patterns).unwrap()
    }

    #[test]
    fn default_blocklist() {
        let list = defaults();
        assert!(list.is_blocked("about:blank"));
        assert!(list.is_blocked("/home/u/.bashrc"));
        assert!(list.is_blocked("/home/u/.config/app/file.txt"));
        assert!(list.is_blocked("/"));
        assert!(list.is_blocked("/tmp/scratch.txt"));

        assert!(!list.is_blocked("/home/u/notes.txt"));
        assert!(!list.is_blocked("/tmpfiles/notes.txt"));
        assert!(!list.is_blocked("https://kde.org/index.html"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let list = BlockList::compile(&["/home/u/(draft)+.txt".to_string()]).unwrap();
        assert!(list.is_blocked("/home/u/(draft)+.txt"));
        assert!(!list.is_blocked("/home/u/draft.txt"));
    }

    #[test]
    fn question_mark_is_one_char() {
        let list = BlockList::compile(&["/a?c".to_string()]).unwrap();
        assert!(list.is_blocked("/abc"));
        assert!(!list.is_blocked("/ac"));
    }

    #[test]
    fn empty_pattern_rejected() {
        assert!(matches!(
            BlockList::compile(&[String::new()]),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn like_translation_escapes_wildcards() {
        assert_eq!(glob_to_like("/home/*"), "/home/%");
        assert_eq!(glob_to_like("file?.txt"), "file_.txt");
        assert_eq!(glob_to_like("100%_done"), r"100\%\_done");
        assert_eq!(glob_to_like(r"C:\x"), r"C:\\x");
    }
}
