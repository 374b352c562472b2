use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::error::ApiError;
use crate::models::Paged;
use crate::models::firm::FirmUser;
use crate::models::timecard::{Timecard, TimecardQuery};
use crate::service::TimeSolvConfig;

const PAGE_SIZE: u32 = 100;

/// Retrieve every timekeeper in the firm.
pub async fn fetch_firm_users(
    client: &Client,
    config: &TimeSolvConfig,
    access_token: &str,
) -> Result<Vec<FirmUser>, ApiError> {
    info!("Fetching firm users");
    fetch_all(client, config, access_token, "firm/users", &[]).await
}

/// Retrieve timecards for the given inclusive date range.
pub async fn fetch_timecards(
    client: &Client,
    config: &TimeSolvConfig,
    access_token: &str,
    query: TimecardQuery,
) -> Result<Vec<Timecard>, ApiError> {
    info!("Fetching timecards from {} to {}", query.from, query.to);
    let params = query.to_params();
    fetch_all(client, config, access_token, "firm/timecards", &params).await
}

/// Walk a paged list endpoint until the reported total is exhausted.
async fn fetch_all<T: DeserializeOwned>(
    client: &Client,
    config: &TimeSolvConfig,
    access_token: &str,
    path: &str,
    extra_params: &[(&str, String)],
) -> Result<Vec<T>, ApiError> {
    let url = format!("{}/rest/v1/{}", config.base_url, path);

    let mut auth_value =
        header::HeaderValue::from_str(format!("Bearer {}", access_token).as_str())
            .map_err(|e| {
                error!("Failed to create Authorization header value: {}", e);
                ApiError::Config(format!("invalid access token for header: {}", e))
            })?;
    auth_value.set_sensitive(true);

    let mut results = Vec::new();
    let mut page = 1u32;

    loop {
        info!("Requesting {} page {}", path, page);

        let mut request = client
            .get(&url)
            .header(header::AUTHORIZATION, auth_value.clone())
            .query(&[("page", page.to_string()), ("size", PAGE_SIZE.to_string())]);
        for (key, value) in extra_params {
            request = request.query(&[(*key, value.as_str())]);
        }

        let response = match request.send().await {
            Ok(resp) => {
                if !resp.status().is_success() {
                    let status = resp.status();
                    let body = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    error!(
                        "TimeSolv API returned error status {} for {}: {}",
                        status, path, body
                    );
                    return Err(ApiError::Status { status, body });
                }
                resp
            }
            Err(e) => {
                error!("Failed to send request to TimeSolv API: {}", e);
                return Err(e.into());
            }
        };

        let text = response.text().await.map_err(|e| {
            error!("Failed to read response body for {}: {}", path, e);
            ApiError::from(e)
        })?;

        let parsed = match serde_json::from_str::<Paged<T>>(&text) {
            Ok(parsed) => {
                info!(
                    "Received page {} of {} with {} results ({} total)",
                    parsed.page,
                    path,
                    parsed.results.len(),
                    parsed.total_count
                );
                parsed
            }
            Err(e) => {
                error!("Failed to parse TimeSolv response for {}: {}", path, e);
                error!("Raw response: {}", text);
                return Err(e.into());
            }
        };

        let has_more = parsed.has_more() && !parsed.results.is_empty();
        results.extend(parsed.results);

        if !has_more {
            break;
        }
        page += 1;
    }

    info!("Fetched {} records from {}", results.len(), path);
    Ok(results)
}


pub mod utils {
    use chrono::{Datelike, Local, NaiveDate};
    use tracing::info;

    /// Semimonthly pay period containing today's date.
    pub fn current_pay_period() -> (NaiveDate, NaiveDate) {
        let today = Local::now().date_naive();
        let period = pay_period_for(today);
        info!("Current pay period: {} to {}", period.0, period.1);
        period
    }

    /// Semimonthly pay period containing `date`: the 1st through the 15th,
    /// or the 16th through the end of the month.
    pub fn pay_period_for(date: NaiveDate) -> (NaiveDate, NaiveDate) {
        if date.day() <= 15 {
            (date.with_day(1).unwrap(), date.with_day(15).unwrap())
        } else {
            (date.with_day(16).unwrap(), last_day_of_month(date))
        }
    }

    fn last_day_of_month(date: NaiveDate) -> NaiveDate {
        let (year, month) = if date.month() == 12 {
            (date.year() + 1, 1)
        } else {
            (date.year(), date.month() + 1)
        };

        NaiveDate::from_ymd_opt(year, month, 1)
            .unwrap()
            .pred_opt()
            .unwrap()
    }

}
