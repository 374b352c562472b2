use reqwest::{Client, header};
use tracing::{error, info};
use url::Url;

use crate::error::ApiError;
use crate::models::token::TokenResponse;
use crate::service::TimeSolvConfig;

/// Build the shared HTTP client used for both token and data requests.
pub fn oauth_client_init() -> Result<Client, ApiError> {
    info!("Initializing TimeSolv HTTP client");

    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    match Client::builder().default_headers(headers).build() {
        Ok(client) => {
            info!("TimeSolv HTTP client initialized successfully");
            Ok(client)
        }
        Err(e) => {
            error!("Failed to build TimeSolv HTTP client: {}", e);
            Err(e.into())
        }
    }
}

/// Authorization endpoint URL the user must visit to grant access.
///
/// The authorization code TimeSolv delivers to `redirect_uri` afterwards is
/// what [`exchange_code`] consumes.
pub fn build_authorize_url(
    config: &TimeSolvConfig,
    state: Option<&str>,
) -> Result<Url, ApiError> {
    let mut url = Url::parse(&format!("{}/oauth2/authorize", config.base_url))?;

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri);

    if let Some(state) = state {
        url.query_pairs_mut().append_pair("state", state);
    }

    Ok(url)
}

/// Exchange a single-use authorization code for a token pair.
pub async fn exchange_code(
    client: &Client,
    config: &TimeSolvConfig,
    auth_code: &str,
) -> Result<TokenResponse, ApiError> {
    info!("Exchanging authorization code for access token");

    let params = [
        ("grant_type", "authorization_code"),
        ("code", auth_code),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    token_request(client, config, &params).await
}

/// Obtain a fresh access token from a stored refresh token.
pub async fn refresh_access_token(
    client: &Client,
    config: &TimeSolvConfig,
    refresh_token: &str,
) -> Result<TokenResponse, ApiError> {
    info!("Refreshing TimeSolv access token");

    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
    ];

    token_request(client, config, &params).await
}

async fn token_request(
    client: &Client,
    config: &TimeSolvConfig,
    params: &[(&str, &str)],
) -> Result<TokenResponse, ApiError> {
    let url = format!("{}/oauth2/token", config.base_url);

    let response = match client.post(&url).form(params).send().await {
        Ok(resp) => {
            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                error!("Token endpoint returned error status {}: {}", status, body);
                return Err(ApiError::Status { status, body });
            }
            resp
        }
        Err(e) => {
            error!("Failed to send request to token endpoint: {}", e);
            return Err(e.into());
        }
    };

    let text = response.text().await.map_err(|e| {
        error!("Failed to read token endpoint response body: {}", e);
        ApiError::from(e)
    })?;

    match serde_json::from_str::<TokenResponse>(&text) {
        Ok(tokens) => {
            info!(
                "Token exchange succeeded, access token valid for {} seconds",
                tokens.expires_in
            );
            Ok(tokens)
        }
        Err(e) => {
            // The raw body is deliberately not logged here, it may carry tokens.
            error!("Failed to parse token endpoint response: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn test_config() -> TimeSolvConfig {
        TimeSolvConfig {
            client_id: "cid-1".to_string(),
            client_secret: "csec-1".to_string(),
            redirect_uri: "https://localhost:3000/oauth/callback".to_string(),
            base_url: "https://apigateway.timesolv.com".to_string(),
        }
    }

    #[test]
    fn authorize_url_carries_required_query_pairs() {
        let url = build_authorize_url(&test_config(), Some("xyzzy"))
            .expect("Failed to build authorize URL");

        assert_eq!(url.path(), "/oauth2/authorize");

        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
        assert_eq!(pairs.get("client_id").map(String::as_str), Some("cid-1"));
        assert_eq!(
            pairs.get("redirect_uri").map(String::as_str),
            Some("https://localhost:3000/oauth/callback")
        );
        assert_eq!(pairs.get("state").map(String::as_str), Some("xyzzy"));
    }

    #[test]
    fn authorize_url_omits_state_when_not_provided() {
        let url =
            build_authorize_url(&test_config(), None).expect("Failed to build authorize URL");
        assert!(url.query_pairs().all(|(k, _)| k != "state"));
    }

    #[test]
    fn authorize_url_never_contains_the_client_secret() {
        let url = build_authorize_url(&test_config(), Some("xyzzy"))
            .expect("Failed to build authorize URL");
        assert!(!url.as_str().contains("csec-1"));
    }
}
