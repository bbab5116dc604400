//! Google OAuth sign-in (installed-app flow).
//!
//! `sign_in` binds a loopback listener, opens the consent URL in the
//! system browser, waits for the redirect carrying the authorization
//! code, exchanges the code for an access token and hands out a
//! ready-to-use Drive adapter. A browser that cannot be opened surfaces
//! as [`AuthError::PopupBlocked`], which carries remediation guidance for
//! the user.

use crate::drive::GoogleDriveClient;
use async_trait::async_trait;
use config::{AuthConfig, DriveConfig};
use errors::AuthError;
use pd_core::traits::{Authenticator, SharedDrive};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// How long we wait for the user to complete the consent screen.
const SIGN_IN_TIMEOUT: Duration = Duration::from_secs(300);

const REDIRECT_PAGE: &str = "<html><body><p>Signed in. You can close this window and return \
                             to the app.</p></body></html>";

type BrowserOpener = Arc<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

pub struct GoogleAuthenticator {
    client: reqwest::Client,
    auth: AuthConfig,
    drive: DriveConfig,
    auth_url: String,
    token_url: String,
    opener: BrowserOpener
}

impl GoogleAuthenticator {
    pub fn new(auth: AuthConfig, drive: DriveConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth,
            drive,
            auth_url: AUTH_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            opener: Arc::new(|url| webbrowser::open(url))
        }
    }

    /// Endpoint override for tests.
    pub fn with_endpoints(
        mut self,
        auth_url: impl Into<String>,
        token_url: impl Into<String>
    ) -> Self {
        self.auth_url = auth_url.into();
        self.token_url = token_url.into();
        self
    }

    /// Browser override for tests and embedders with their own window
    /// handling.
    pub fn with_browser_opener<F>(mut self, opener: F) -> Self
    where
        F: Fn(&str) -> std::io::Result<()> + Send + Sync + 'static
    {
        self.opener = Arc::new(opener);
        self
    }

    fn consent_url(&self, redirect_uri: &str, state: &str) -> Result<String, AuthError> {
        let url = reqwest::Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.auth.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", DRIVE_SCOPE),
                ("state", state)
            ]
        )
        .map_err(|e| AuthError::Failed {
            reason: format!("invalid consent URL: {}", e)
        })?;
        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str
    ) -> Result<String, AuthError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.auth.client_id.as_str()),
                ("client_secret", self.auth.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code")
            ])
            .send()
            .await
            .map_err(|e| AuthError::Failed {
                reason: e.to_string()
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AuthError::Failed {
            reason: e.to_string()
        })?;
        if !status.is_success() {
            return Err(AuthError::Failed {
                reason: format!("token exchange rejected: status {}: {}", status.as_u16(), body)
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Failed {
                reason: format!("malformed token response: {}", e)
            })?;
        Ok(token.access_token)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String
}

#[async_trait]
impl Authenticator for GoogleAuthenticator {
    type Error = AuthError;

    #[tracing::instrument(skip(self))]
    async fn sign_in(&self) -> Result<SharedDrive, Self::Error> {
        let port = self.auth.redirect_port.unwrap_or(0);
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|e| AuthError::Failed {
                reason: format!("could not bind redirect listener: {}", e)
            })?;
        let redirect_uri = format!(
            "http://127.0.0.1:{}",
            listener.local_addr().map_err(|e| AuthError::Failed {
                reason: e.to_string()
            })?
            .port()
        );

        let state = uuid::Uuid::new_v4().to_string();
        let consent_url = self.consent_url(&redirect_uri, &state)?;

        (self.opener)(&consent_url).map_err(|e| {
            tracing::warn!(error = %e, "Could not open the sign-in window");
            AuthError::PopupBlocked {
                reason: e.to_string()
            }
        })?;

        let code = tokio::time::timeout(SIGN_IN_TIMEOUT, wait_for_code(&listener, &state))
            .await
            .map_err(|_| AuthError::Failed {
                reason: "timed out waiting for sign-in".to_string()
            })??;

        let access_token = self.exchange_code(&code, &redirect_uri).await?;
        tracing::info!("Sign-in complete");

        Ok(Arc::new(GoogleDriveClient::from_config(access_token, &self.drive)))
    }
}

/// Accepts loopback connections until one carries the authorization
/// redirect; unrelated requests (favicons and friends) get a 404 and the
/// wait continues.
async fn wait_for_code(listener: &TcpListener, expected_state: &str) -> Result<String, AuthError> {
    loop {
        let (mut stream, _addr) = listener.accept().await.map_err(|e| AuthError::Failed {
            reason: format!("redirect listener failed: {}", e)
        })?;

        match read_request_target(&mut stream).await {
            Some(target) => match parse_redirect(&target, expected_state) {
                Some(result) => {
                    respond(&mut stream, "200 OK", REDIRECT_PAGE).await;
                    return result;
                }
                None => respond(&mut stream, "404 Not Found", "").await
            },
            None => respond(&mut stream, "400 Bad Request", "").await
        }
    }
}

/// Pulls the request target out of the HTTP request line.
async fn read_request_target(stream: &mut TcpStream) -> Option<String> {
    let mut buf = vec![0u8; 4096];
    let n = stream.read(&mut buf).await.ok()?;
    let request = String::from_utf8_lossy(&buf[..n]).into_owned();
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    if method != "GET" {
        return None;
    }
    Some(target.to_string())
}

/// Interprets a redirect target. Returns `None` for requests that are not
/// the OAuth redirect at all; `Some(Err(..))` when the provider reported
/// an error or the state does not match.
fn parse_redirect(target: &str, expected_state: &str) -> Option<Result<String, AuthError>> {
    let url = reqwest::Url::parse(&format!("http://127.0.0.1{}", target)).ok()?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Some(Err(AuthError::Failed {
            reason: format!("consent denied: {}", error)
        }));
    }

    let code = code?;
    if state.as_deref() != Some(expected_state) {
        return Some(Err(AuthError::Failed {
            reason: "state mismatch in redirect".to_string()
        }));
    }
    Some(Ok(code))
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
