use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use timesolv_api::{
    helpers::oauth,
    service::{TimeSolvConfig, TimeSolvService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting TimeSolv API client example");

    // Requires TIMESOLV_CLIENT_ID, TIMESOLV_CLIENT_SECRET and
    // TIMESOLV_REDIRECT_URI in the environment (TIMESOLV_BASE_URL optional)
    let config = TimeSolvConfig::from_env()?;
    let client = oauth::oauth_client_init()?;

    let service = TimeSolvService::new(client, config);

    let auth_url = service.authorize_url("demo-state").await?;
    info!("Visit this URL to authorize the client: {}", auth_url);

    // Host the OAuth2 redirect target so the callback completes the exchange
    let app = Router::new()
        .merge(service.clone().router())
        .route("/health", axum::routing::get(|| async { "OK" }));

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!("Callback server running on http://0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}

/*
Flow:

1. Run with the TIMESOLV_* environment variables set.
2. Open the printed authorization URL and grant access; TimeSolv
   redirects to GET /oauth/callback with `code` and `state`.
3. The callback handler exchanges the code for a token pair.
4. GET /oauth/status reports "authenticated" once tokens are held.

With a token pair in place the service exposes:
- service.firm_users()            -> all timekeepers in the firm
- service.timecards(None)         -> timecards for the current pay period
- service.timecards(Some(query))  -> timecards for an explicit date range
*/
