//! Read-only access to the externally managed credential store.
//!
//! The presence client never writes tokens; refresh happens elsewhere and is
//! picked up by the token-rotation watch.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::debug;

/// A cookie-like key/value credential store.
pub trait TokenSource: Send + Sync + 'static {
    /// Current value stored under `key`, if any.
    fn token(&self, key: &str) -> Option<String>;
}

// ---------------------------------------------------------------------------
// In-memory jar
// ---------------------------------------------------------------------------

/// Shared in-memory cookie store. Clones share the same contents.
#[derive(Clone, Default)]
pub struct CookieJar {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let jar = Self::new();
        jar.set(key, value);
        jar
    }

    pub fn set(&self, key: &str, value: &str) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
    }
}

impl std::fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<&String> = values.keys().collect();
        keys.sort();
        f.debug_struct("CookieJar").field("keys", &keys).finish()
    }
}

impl TokenSource for CookieJar {
    fn token(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }
}

// ---------------------------------------------------------------------------
// Cookie file
// ---------------------------------------------------------------------------

/// Cookie store backed by a file that another process keeps up to date.
///
/// The file is re-read on every lookup. A missing or unreadable file reads
/// as "no token".
#[derive(Debug, Clone)]
pub struct CookieFile {
    path: PathBuf,
}

impl CookieFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenSource for CookieFile {
    fn token(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => parse_cookies(&content).remove(key),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "cookie file unreadable");
                None
            }
        }
    }
}

/// Parse `name=value` pairs separated by `;` or newlines.
///
/// Lines starting with `#` are comments. Whitespace around names and values
/// is trimmed, as are surrounding double quotes on values. Pairs with an
/// empty name or value are skipped; later pairs win.
pub fn parse_cookies(content: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for pair in line.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim().trim_matches('"');
            if name.is_empty() || value.is_empty() {
                continue;
            }
            cookies.insert(name.to_string(), value.to_string());
        }
    }
    cookies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_header_style_cookies() {
        let cookies = parse_cookies("access_token=abc.def; refresh_token=xyz");
        assert_eq!(cookies.get("access_token").map(String::as_str), Some("abc.def"));
        assert_eq!(cookies.get("refresh_token").map(String::as_str), Some("xyz"));
    }

    #[test]
    fn parse_line_style_cookies_with_comments() {
        let cookies = parse_cookies("# saved by login\naccess_token = \"tok-A\"\n\ntheme=dark\n");
        assert_eq!(cookies.get("access_token").map(String::as_str), Some("tok-A"));
        assert_eq!(cookies.get("theme").map(String::as_str), Some("dark"));
    }

    #[test]
    fn token_values_may_contain_equals() {
        let cookies = parse_cookies("access_token=eyJh==.sig=");
        assert_eq!(cookies.get("access_token").map(String::as_str), Some("eyJh==.sig="));
    }

    #[test]
    fn empty_values_and_bare_words_are_skipped() {
        let cookies = parse_cookies("access_token=; flag; =orphan");
        assert!(cookies.is_empty());
    }

    #[test]
    fn jar_set_and_remove() {
        let jar = CookieJar::with("access_token", "tok-A");
        assert_eq!(jar.token("access_token").as_deref(), Some("tok-A"));

        let shared = jar.clone();
        shared.set("access_token", "tok-B");
        assert_eq!(jar.token("access_token").as_deref(), Some("tok-B"));

        jar.remove("access_token");
        assert_eq!(shared.token("access_token"), None);
    }

    #[test]
    fn jar_debug_hides_values() {
        let jar = CookieJar::with("access_token", "secret-value");
        let debug = format!("{jar:?}");
        assert!(debug.contains("access_token"));
        assert!(!debug.contains("secret-value"));
    }

    #[test]
    fn cookie_file_is_reread_on_each_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies");
        let source = CookieFile::new(&path);

        assert_eq!(source.token("access_token"), None);

        std::fs::write(&path, "access_token=tok-A").unwrap();
        assert_eq!(source.token("access_token").as_deref(), Some("tok-A"));

        std::fs::write(&path, "access_token=tok-B").unwrap();
        assert_eq!(source.token("access_token").as_deref(), Some("tok-B"));
    }
}
