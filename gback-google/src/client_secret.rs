//! OAuth client credentials (user-provided).
//!
//! Accepts the JSON Google offers for download, which wraps the values in
//! `installed` (desktop clients) or `web`, as well as a flat object:
//!
//! ```json
//! { "installed": { "client_id": "...", "client_secret": "..." } }
//! ```

use std::path::Path;

use gback_core::{GbackError, GbackResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SecretFile {
    Installed { installed: ClientSecret },
    Web { web: ClientSecret },
    Flat(ClientSecret),
}

impl ClientSecret {
    pub fn load(path: &Path) -> GbackResult<Self> {
        if !path.exists() {
            return Err(GbackError::config(path.display(), "file not found"));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| GbackError::config(path.display(), e))?;

        Self::parse(&contents).map_err(|e| GbackError::config(path.display(), e))
    }

    fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let file: SecretFile = serde_json::from_str(contents)?;

        Ok(match file {
            SecretFile::Installed { installed } => installed,
            SecretFile::Web { web } => web,
            SecretFile::Flat(secret) => secret,
        })
    }
}
