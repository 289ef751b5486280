use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Source of the bearer token attached to admin API requests.
pub trait TokenStore: Send + Sync {
    /// `Ok(None)` when no token has been stored.
    fn token(&self) -> io::Result<Option<String>>;
}

/// Token persisted in a local file, re-read on every request so a refreshed login is picked up.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(non_blank(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Fixed token, mostly for tests and one-off CLI calls.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenStore {
    token: Option<String>,
}

impl StaticTokenStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: non_blank(token.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl TokenStore for StaticTokenStore {
    fn token(&self) -> io::Result<Option<String>> {
        Ok(self.token.clone())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("showcase-token-{}-{name}", std::process::id()))
    }

    #[test]
    fn missing_file_means_no_token() {
        let store = FileTokenStore::new(scratch_path("missing"));
        assert_eq!(store.token().unwrap(), None);
    }

    #[test]
    fn file_token_is_trimmed() {
        let path = scratch_path("present");
        fs::write(&path, "  abc123\n").unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.token().unwrap(), Some("abc123".to_string()));

        fs::write(&path, "\n").unwrap();
        assert_eq!(store.token().unwrap(), None);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn static_store_treats_blank_as_absent() {
        assert_eq!(StaticTokenStore::new("  ").token().unwrap(), None);
        assert_eq!(StaticTokenStore::empty().token().unwrap(), None);
        assert_eq!(
            StaticTokenStore::new("t").token().unwrap(),
            Some("t".to_string())
        );
    }
}
