use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use url::Url;

use crate::{
    error::ApiError,
    helpers::{api, oauth},
    models::{
        firm::FirmUser,
        timecard::{Timecard, TimecardQuery},
        token::TokenSet,
    },
};

const DEFAULT_BASE_URL: &str = "https://apigateway.timesolv.com";

/// Configuration for the TimeSolv service.
///
/// The authorization code is not part of the configuration: it is a
/// single-use value delivered to `redirect_uri` and consumed by
/// [`TimeSolvService::authenticate`].
#[derive(Clone)]
pub struct TimeSolvConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub base_url: String,
}

impl TimeSolvConfig {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Load configuration from `TIMESOLV_CLIENT_ID`, `TIMESOLV_CLIENT_SECRET`,
    /// `TIMESOLV_REDIRECT_URI` and optional `TIMESOLV_BASE_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self {
            client_id: require_env("TIMESOLV_CLIENT_ID")?,
            client_secret: require_env("TIMESOLV_CLIENT_SECRET")?,
            redirect_uri: require_env("TIMESOLV_REDIRECT_URI")?,
            base_url: std::env::var("TIMESOLV_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        })
    }
}

impl fmt::Debug for TimeSolvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeSolvConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn require_env(name: &str) -> Result<String, ApiError> {
    std::env::var(name)
        .map_err(|_| ApiError::Config(format!("missing environment variable {}", name)))
}

#[derive(Default)]
struct AuthState {
    tokens: Option<TokenSet>,
    pending_state: Option<String>,
}

/// The main TimeSolv service that handles the OAuth2 flow and exposes
/// the firm-user and timecard data surfaces.
#[derive(Clone)]
pub struct TimeSolvService {
    pub client: Client,
    pub config: TimeSolvConfig,
    auth: Arc<RwLock<AuthState>>,
}

impl TimeSolvService {
    /// Create a new TimeSolv service instance
    pub fn new(client: Client, config: TimeSolvConfig) -> Self {
        info!("Creating new TimeSolvService instance");
        Self {
            client,
            config,
            auth: Arc::new(RwLock::new(AuthState::default())),
        }
    }

    /// Authorization URL to send the user to. The `state` value is held and
    /// checked against the callback to reject forged redirects.
    pub async fn authorize_url(&self, state: &str) -> Result<Url, ApiError> {
        let url = oauth::build_authorize_url(&self.config, Some(state))?;
        self.auth.write().await.pending_state = Some(state.to_string());
        Ok(url)
    }

    /// Exchange an authorization code and store the resulting token pair.
    pub async fn authenticate(&self, auth_code: &str) -> Result<(), ApiError> {
        let response = oauth::exchange_code(&self.client, &self.config, auth_code).await?;

        let mut auth = self.auth.write().await;
        auth.tokens = Some(TokenSet::from_response(response));
        auth.pending_state = None;

        info!("TimeSolv token pair stored");
        Ok(())
    }

    /// Whether a non-expired access token is currently held.
    pub async fn is_authenticated(&self) -> bool {
        match &self.auth.read().await.tokens {
            Some(tokens) => !tokens.is_expired(),
            None => false,
        }
    }

    /// Retrieve every timekeeper in the firm.
    pub async fn firm_users(&self) -> Result<Vec<FirmUser>, ApiError> {
        let token = self.ensure_access_token().await?;
        api::fetch_firm_users(&self.client, &self.config, &token).await
    }

    /// Retrieve timecards for the given range, defaulting to the current
    /// semimonthly pay period.
    pub async fn timecards(
        &self,
        query: Option<TimecardQuery>,
    ) -> Result<Vec<Timecard>, ApiError> {
        let query = query.unwrap_or_else(|| {
            let (from, to) = api::utils::current_pay_period();
            TimecardQuery::new(from, to)
        });

        let token = self.ensure_access_token().await?;
        api::fetch_timecards(&self.client, &self.config, &token, query).await
    }

    /// Create an Axum router hosting the OAuth2 redirect target
    pub fn router(self) -> Router {
        info!("Creating TimeSolv OAuth router");
        let shared_state = Arc::new(self);

        Router::new()
            .route("/oauth/callback", get(oauth_callback))
            .route("/oauth/status", get(oauth_status))
            .with_state(shared_state)
    }

    /// Valid access token for an API call, refreshing if expired.
    async fn ensure_access_token(&self) -> Result<String, ApiError> {
        {
            let auth = self.auth.read().await;
            match &auth.tokens {
                Some(tokens) if !tokens.is_expired() => {
                    return Ok(tokens.access_token().to_string());
                }
                Some(_) => {}
                None => return Err(ApiError::NotAuthorized),
            }
        }

        self.refresh().await
    }

    async fn refresh(&self) -> Result<String, ApiError> {
        let mut auth = self.auth.write().await;
        let tokens = auth.tokens.as_ref().ok_or(ApiError::NotAuthorized)?;

        // Another caller may have refreshed while we waited for the lock.
        if !tokens.is_expired() {
            return Ok(tokens.access_token().to_string());
        }

        let refresh_token = tokens.refresh_token().ok_or(ApiError::NotAuthorized)?;
        let response =
            oauth::refresh_access_token(&self.client, &self.config, refresh_token).await?;

        let tokens = TokenSet::from_response(response);
        let access_token = tokens.access_token().to_string();
        auth.tokens = Some(tokens);

        info!("TimeSolv access token refreshed");
        Ok(access_token)
    }
}

/// Query parameters TimeSolv appends to the redirect URI.
#[derive(Deserialize, Debug)]
pub struct CallbackParams {
    pub code: String,
    pub state: Option<String>,
}

// Route handlers
async fn oauth_callback(
    State(service): State<Arc<TimeSolvService>>,
    Query(params): Query<CallbackParams>,
) -> String {
    info!("Received OAuth2 callback from TimeSolv");

    // A callback is only valid while an authorize flow is pending and the
    // returned state matches the one issued with the authorize URL.
    let expected_state = service.auth.read().await.pending_state.clone();
    match expected_state {
        Some(expected) if params.state.as_deref() == Some(expected.as_str()) => {}
        _ => {
            error!("{}", ApiError::StateMismatch);
            return "State mismatch, restart the authorization flow".to_string();
        }
    }

    match service.authenticate(&params.code).await {
        Ok(()) => {
            info!("Authorization code exchanged successfully");
            "Authenticated with TimeSolv, you can close this window".to_string()
        }
        Err(e) => {
            error!("Failed to exchange authorization code: {}", e);
            format!("Error completing OAuth2 flow: {}", e)
        }
    }
}

async fn oauth_status(State(service): State<Arc<TimeSolvService>>) -> String {
    if service.is_authenticated().await {
        "authenticated".to_string()
    } else {
        "not authenticated".to_string()
    }
}
