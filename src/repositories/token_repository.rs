use std::fs;
use std::path::PathBuf;

use tracing::warn;

/// Durable storage for the session token, one plaintext value in one file.
/// Fills the role the browser client gives to its single localStorage key.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    token_path: PathBuf,
}

impl TokenRepository {
    pub fn new(token_path: PathBuf) -> Self {
        Self { token_path }
    }

    /// Read the persisted token, if any. An unreadable or empty file counts
    /// as no token.
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.token_path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(_) => None,
        }
    }

    pub fn store(&self, token: &str) {
        if let Err(e) = fs::write(&self.token_path, token) {
            warn!("failed to persist session token: {}", e);
        }
    }

    pub fn clear(&self) {
        match fs::remove_file(&self.token_path) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to clear session token: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> TokenRepository {
        let path = std::env::temp_dir().join(format!("ppob-token-test-{}-{}", tag, std::process::id()));
        let _ = fs::remove_file(&path);
        TokenRepository::new(path)
    }

    #[test]
    fn round_trips_a_token() {
        let store = temp_store("roundtrip");
        assert_eq!(store.load(), None);
        store.store("abc");
        assert_eq!(store.load(), Some("abc".to_string()));
        store.clear();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let store = temp_store("idempotent");
        store.clear();
        store.clear();
        assert_eq!(store.load(), None);
    }
}
