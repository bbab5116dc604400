//! Top-level application switch.

use crate::dashboard::Dashboard;
use errors::{AuthError, CredentialError, ExtractError, SummarizeError};
use pd_core::traits::{Authenticator, CredentialStore, Summarizer, TextExtractor};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Where the top-level presentation switch currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    SignedOut,
    /// Sign-in is in flight; the switch shows a loading state.
    SigningIn,
    SignedIn
}

/// Snapshot of the last sign-in failure for the signed-out view.
#[derive(Debug, Clone)]
pub struct SignInFailure {
    pub message: String,
    /// Concrete steps for the user, present for the blocked-window case.
    pub remediation: Option<&'static str>
}

impl From<&AuthError> for SignInFailure {
    fn from(error: &AuthError) -> Self {
        Self {
            message: error.to_string(),
            remediation: error.remediation()
        }
    }
}

/// Wires the authentication collaborator to the dashboard. Until sign-in
/// completes there is no Drive adapter and therefore no dashboard.
pub struct App {
    authenticator: Arc<dyn Authenticator<Error = AuthError>>,
    summarizer: Arc<dyn Summarizer<Error = SummarizeError>>,
    extractor: Arc<dyn TextExtractor<Error = ExtractError>>,
    credentials: Arc<dyn CredentialStore<Error = CredentialError>>,
    phase: RwLock<AppPhase>,
    last_failure: RwLock<Option<SignInFailure>>,
    dashboard: RwLock<Option<Arc<Dashboard>>>
}

impl App {
    pub fn new(
        authenticator: Arc<dyn Authenticator<Error = AuthError>>,
        summarizer: Arc<dyn Summarizer<Error = SummarizeError>>,
        extractor: Arc<dyn TextExtractor<Error = ExtractError>>,
        credentials: Arc<dyn CredentialStore<Error = CredentialError>>
    ) -> Self {
        Self {
            authenticator,
            summarizer,
            extractor,
            credentials,
            phase: RwLock::new(AppPhase::SignedOut),
            last_failure: RwLock::new(None),
            dashboard: RwLock::new(None)
        }
    }

    pub async fn phase(&self) -> AppPhase {
        *self.phase.read().await
    }

    pub async fn dashboard(&self) -> Option<Arc<Dashboard>> {
        self.dashboard.read().await.clone()
    }

    pub async fn last_sign_in_failure(&self) -> Option<SignInFailure> {
        self.last_failure.read().await.clone()
    }

    /// Drives the authentication collaborator. On success the dashboard
    /// comes up and performs its initial Drive sync (a sync failure is
    /// logged, not fatal: the user can refresh). On failure the app stays
    /// signed out and keeps the failure for display.
    #[tracing::instrument(skip(self))]
    pub async fn sign_in(&self) -> Result<Arc<Dashboard>, AuthError> {
        *self.phase.write().await = AppPhase::SigningIn;
        *self.last_failure.write().await = None;

        let drive = match self.authenticator.sign_in().await {
            Ok(drive) => drive,
            Err(e) => {
                tracing::error!(error = %e, "Sign-in failed");
                *self.last_failure.write().await = Some(SignInFailure::from(&e));
                *self.phase.write().await = AppPhase::SignedOut;
                return Err(e);
            }
        };

        let dashboard = Arc::new(
            Dashboard::new(
                drive,
                Arc::clone(&self.summarizer),
                Arc::clone(&self.extractor),
                Arc::clone(&self.credentials)
            )
            .await
        );

        if let Err(e) = dashboard.refresh().await {
            tracing::warn!(error = %e, "Initial Drive sync failed");
        }

        *self.dashboard.write().await = Some(Arc::clone(&dashboard));
        *self.phase.write().await = AppPhase::SignedIn;
        Ok(dashboard)
    }
}
