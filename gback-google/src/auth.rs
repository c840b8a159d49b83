//! Browser-based OAuth flow and token refresh.
//!
//! The consent URL, code exchange and refresh calls are made by the
//! `google-calendar` client; this module only drives them and catches the
//! redirect on a loopback port.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

use anyhow::{Context, Result};
use google_calendar::Client;
use tracing::info;

use crate::client_secret::ClientSecret;
use crate::credentials::StoredCredentials;

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

const REDIRECT_PORT: u16 = 8085;

pub fn redirect_uri() -> String {
    format!("http://localhost:{}/callback", REDIRECT_PORT)
}

fn redirect_address() -> String {
    format!("127.0.0.1:{}", REDIRECT_PORT)
}

/// Run the full consent flow and return fresh credentials.
///
/// Blocks until the browser is redirected back to the loopback port.
pub async fn authorize(secret: &ClientSecret) -> Result<StoredCredentials> {
    let mut client = Client::new(
        secret.client_id.clone(),
        secret.client_secret.clone(),
        redirect_uri(),
        String::new(),
        String::new(),
    );

    let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();
    let auth_url = client.user_consent_url(&scopes);

    eprintln!("\nOpen this URL in your browser to authorize gback:\n");
    eprintln!("{}\n", auth_url);

    if open::that(&auth_url).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let (code, state) = wait_for_callback()?;

    info!("received authorization code, exchanging for tokens");

    let tokens = client
        .get_access_token(&code, &state)
        .await
        .context("Failed to exchange code for tokens")?;

    Ok(StoredCredentials::new(
        secret,
        tokens.access_token,
        tokens.refresh_token,
        tokens.expires_in,
    ))
}

/// Trade the refresh token for a new access token.
pub async fn refresh(secret: &ClientSecret, creds: &StoredCredentials) -> Result<StoredCredentials> {
    let client = Client::new(
        secret.client_id.clone(),
        secret.client_secret.clone(),
        redirect_uri(),
        creds.access_token.clone(),
        creds.refresh_token.clone(),
    );

    let tokens = client
        .refresh_access_token()
        .await
        .context("Failed to refresh token")?;

    // Google typically doesn't return a new refresh_token on refresh
    let refresh_token = if tokens.refresh_token.is_empty() {
        creds.refresh_token.clone()
    } else {
        tokens.refresh_token
    };

    Ok(StoredCredentials::new(
        secret,
        tokens.access_token,
        refresh_token,
        tokens.expires_in,
    ))
}

fn wait_for_callback() -> Result<(String, String)> {
    let listener = TcpListener::bind(redirect_address())
        .with_context(|| format!("Failed to bind to port {}", REDIRECT_PORT))?;

    eprintln!("Waiting for OAuth callback on port {}...", REDIRECT_PORT);

    let (mut stream, _) = listener.accept().context("Failed to accept connection")?;

    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let result = parse_callback(&request_line);

    let (status, message) = match &result {
        Ok(_) => (
            "200 OK",
            "<h1>Authorization successful!</h1><p>You can close this window and return to the terminal.</p>",
        ),
        Err(_) => (
            "400 Bad Request",
            "<h1>Authorization failed</h1><p>Return to the terminal for details.</p>",
        ),
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html><body>{}</body></html>",
        status, message
    );

    stream.write_all(response.as_bytes())?;
    stream.flush()?;

    result
}

/// Pull `code` and `state` out of the redirect's request line,
/// e.g. `GET /callback?code=...&state=... HTTP/1.1`.
fn parse_callback(request_line: &str) -> Result<(String, String)> {
    let path = request_line
        .split_whitespace()
        .nth(1)
        .context("Invalid request")?;

    let url = url::Url::parse(&format!("http://localhost{}", path))?;
    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.to_string())
    };

    if let Some(error) = param("error") {
        anyhow::bail!("Authorization was denied: {}", error);
    }

    let code = param("code").context("No code in callback")?;
    let state = param("state").context("No state in callback")?;

    Ok((code, state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_callback() {
        let (code, state) =
            parse_callback("GET /callback?state=xyz&code=4%2F0Ab&scope=calendar HTTP/1.1\r\n")
                .unwrap();
        assert_eq!(code, "4/0Ab");
        assert_eq!(state, "xyz");
    }

    #[test]
    fn test_parse_callback_denied() {
        let err = parse_callback("GET /callback?error=access_denied&state=xyz HTTP/1.1")
            .unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn test_parse_callback_without_code() {
        assert!(parse_callback("GET /favicon.ico HTTP/1.1").is_err());
        assert!(parse_callback("").is_err());
    }

    #[test]
    fn test_redirect_uri_uses_loopback_port() {
        assert_eq!(redirect_uri(), "http://localhost:8085/callback");
    }
}
