//! Google Calendar connection for gback.
//!
//! `connect` turns a `SessionConfig` into a ready `Session`: it reads the
//! OAuth client secret, loads (or obtains and stores) user credentials, and
//! caches the user's calendar list.

pub mod api;
pub mod auth;
pub mod client_secret;
pub mod credentials;

use std::future::Future;
use std::path::{Path, PathBuf};

use gback_core::{GbackError, GbackResult, Session};
use tracing::{info, warn};

pub use api::GoogleCalendarApi;
pub use client_secret::ClientSecret;
pub use credentials::StoredCredentials;

/// Where credentials live. Paths are used as given; callers expand `~`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Stored OAuth tokens; written after authorization or refresh.
    pub credential_path: PathBuf,
    /// JSON file with `client_id` and `client_secret`.
    pub client_secret_path: PathBuf,
}

impl SessionConfig {
    /// Use one file for both; the credential file records the client secret
    /// once it has been written.
    pub fn single_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        SessionConfig {
            credential_path: path.clone(),
            client_secret_path: path,
        }
    }
}

/// Authenticate and cache the calendar list.
///
/// May open a browser and block until the user grants access, and may
/// overwrite the credential file. Tokens are refreshed only here, once per
/// connection; a session that outlives its access token fails with `Auth`.
pub async fn connect(config: &SessionConfig) -> GbackResult<Session<GoogleCalendarApi>> {
    let secret = ClientSecret::load(&config.client_secret_path)?;
    let secret = &secret;

    let credentials = valid_credentials(
        &config.credential_path,
        |stored| async move { auth::refresh(secret, &stored).await },
        || auth::authorize(secret),
    )
    .await?;

    let api = GoogleCalendarApi::new(credentials.access_token)?;
    Session::new(api).await
}

/// Stored credentials if still valid; otherwise refreshed, or newly
/// authorized when there are none or the refresh fails. New credentials are
/// saved to `path`.
async fn valid_credentials<R, RF, Z, ZF>(
    path: &Path,
    refresh: R,
    authorize: Z,
) -> GbackResult<StoredCredentials>
where
    R: FnOnce(StoredCredentials) -> RF,
    RF: Future<Output = anyhow::Result<StoredCredentials>>,
    Z: FnOnce() -> ZF,
    ZF: Future<Output = anyhow::Result<StoredCredentials>>,
{
    if let Some(stored) = StoredCredentials::load(path) {
        if !stored.is_expired() {
            return Ok(stored);
        }

        info!("access token expired, refreshing");
        match refresh(stored).await {
            Ok(fresh) => {
                fresh.save(path)?;
                return Ok(fresh);
            }
            Err(e) => warn!(error = %format!("{:#}", e), "token refresh failed, re-authorizing"),
        }
    }

    let fresh = authorize()
        .await
        .map_err(|e| GbackError::Auth(format!("{:#}", e)))?;
    fresh.save(path)?;
    info!(path = %path.display(), "stored new credentials");

    Ok(fresh)
}
