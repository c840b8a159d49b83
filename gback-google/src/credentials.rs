//! Persisted OAuth tokens.
//!
//! The credential file also records the client id and secret the tokens were
//! issued to, so it can double as the client-secret file on later runs.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use gback_core::GbackResult;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client_secret::ClientSecret;

/// Refresh this long before Google's stated expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredCredentials {
    pub fn new(
        secret: &ClientSecret,
        access_token: String,
        refresh_token: String,
        expires_in: i64,
    ) -> Self {
        let expires_at = if expires_in > 0 {
            Some(Utc::now() + Duration::seconds(expires_in))
        } else {
            None
        };

        StoredCredentials {
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            access_token,
            refresh_token,
            expires_at,
        }
    }

    /// Load credentials from `path`.
    ///
    /// Returns `None` when there is nothing usable: no file, content that does
    /// not parse, or no refresh token.
    pub fn load(path: &Path) -> Option<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read stored credentials");
                return None;
            }
        };

        match serde_json::from_str::<StoredCredentials>(&contents) {
            Ok(creds) if !creds.refresh_token.is_empty() => Some(creds),
            Ok(_) => {
                warn!(path = %path.display(), "stored credentials have no refresh token");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable stored credentials");
                None
            }
        }
    }

    pub fn save(&self, path: &Path) -> GbackResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;

        // Owner-only (0600) since the file holds OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Also true when the expiry is unknown.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= expires_at,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> ClientSecret {
        ClientSecret {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gback.oauth");
        let creds = StoredCredentials::new(&secret(), "access".into(), "refresh".into(), 3600);

        creds.save(&path).unwrap();

        assert_eq!(StoredCredentials::load(&path), Some(creds));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gback.oauth");
        StoredCredentials::new(&secret(), "a".into(), "r".into(), 3600)
            .save(&path)
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_credential_file_doubles_as_client_secret() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gback.oauth");
        StoredCredentials::new(&secret(), "a".into(), "r".into(), 3600)
            .save(&path)
            .unwrap();

        assert_eq!(ClientSecret::load(&path).unwrap(), secret());
    }

    #[test]
    fn test_load_missing_or_invalid_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gback.oauth");
        assert_eq!(StoredCredentials::load(&path), None);

        std::fs::write(&path, "garbage").unwrap();
        assert_eq!(StoredCredentials::load(&path), None);

        let no_refresh = StoredCredentials::new(&secret(), "a".into(), String::new(), 3600);
        no_refresh.save(&path).unwrap();
        assert_eq!(StoredCredentials::load(&path), None);
    }

    #[test]
    fn test_expiry() {
        let fresh = StoredCredentials::new(&secret(), "a".into(), "r".into(), 3600);
        assert!(!fresh.is_expired());

        let nearly = StoredCredentials::new(&secret(), "a".into(), "r".into(), 30);
        assert!(nearly.is_expired());

        let unknown = StoredCredentials::new(&secret(), "a".into(), "r".into(), 0);
        assert!(unknown.is_expired());
    }
}
