use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

/// Ask the test-network faucet to credit `address`, retrying with doubling
/// backoff. Best effort only: every failure path returns `false` and leaves
/// manual funding as the fallback, so callers never treat this as fatal.
pub async fn fund_account(
    http: &reqwest::Client,
    faucet_url: &str,
    address: &str,
    attempts: u32,
) -> bool {
    let url = format!("{}/?addr={address}", faucet_url.trim_end_matches('/'));
    let mut delay = Duration::from_secs(2);
    for attempt in 1..=attempts.max(1) {
        match http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                info!(%address, attempt, "faucet credited account");
                return true;
            }
            Ok(response) => {
                warn!(status = %response.status(), attempt, "faucet request rejected");
            }
            Err(err) => {
                warn!(error = %err, attempt, "faucet request failed");
            }
        }
        if attempt < attempts {
            sleep(delay).await;
            delay *= 2;
        }
    }
    warn!(%address, "faucet funding failed; fund the account manually");
    false
}
