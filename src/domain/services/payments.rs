#[cfg(test)]
#[path = "payments_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::PaymentStatus;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::api::ApiError;

/// Where the poller gets its status from. The live implementation wraps the
/// API client; tests script their own sequences.
#[async_trait]
pub trait PaymentStatusSource {
    async fn poll(&self) -> Result<PaymentStatus, ApiError>;
}

struct CheckoutStatusSource<'a> {
    api: &'a ApiClient,
    session_id: &'a str,
}

#[async_trait]
impl PaymentStatusSource for CheckoutStatusSource<'_> {
    async fn poll(&self) -> Result<PaymentStatus, ApiError> {
        return self.api.payment_status(self.session_id).await;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Expired,
    TimedOut,
    Failed(String),
}

impl PaymentOutcome {
    pub fn notice(&self) -> String {
        return match self {
            PaymentOutcome::Success => "Payment successful! Welcome to Premium!".to_string(),
            PaymentOutcome::Expired => {
                "Checkout session expired. No charge was made.".to_string()
            }
            PaymentOutcome::TimedOut => "Payment verification timed out".to_string(),
            PaymentOutcome::Failed(_) => {
                "There was a problem verifying your payment".to_string()
            }
        };
    }
}

/// Bounded fixed-interval poll confirming an asynchronous checkout. Pending
/// responses retry up to the attempt ceiling; transport failures end the poll
/// immediately.
pub struct PaymentPoller {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PaymentPoller {
    fn default() -> PaymentPoller {
        let max_attempts = Config::get(ConfigKey::PaymentPollAttempts)
            .parse::<u32>()
            .unwrap_or(5);
        let interval_ms = Config::get(ConfigKey::PaymentPollInterval)
            .parse::<u64>()
            .unwrap_or(2000);

        return PaymentPoller {
            max_attempts,
            interval: Duration::from_millis(interval_ms),
        };
    }
}

impl PaymentPoller {
    /// Entry point shared by the subscribe flow and the confirmation command.
    /// A missing session id fails without issuing a single query.
    pub async fn confirm(
        &self,
        api: &ApiClient,
        session_id: Option<&str>,
    ) -> PaymentOutcome {
        let Some(session_id) = session_id else {
            return PaymentOutcome::Failed("Missing checkout session id".to_string());
        };

        return self.run(&CheckoutStatusSource { api, session_id }).await;
    }

    pub async fn run(&self, source: &dyn PaymentStatusSource) -> PaymentOutcome {
        for attempt in 0..self.max_attempts {
            match source.poll().await {
                Ok(status) => {
                    if status.is_paid() {
                        return PaymentOutcome::Success;
                    }
                    if status.is_expired() {
                        return PaymentOutcome::Expired;
                    }
                    tracing::debug!(
                        attempt = attempt + 1,
                        payment_status = status.payment_status,
                        "Payment still pending"
                    );
                }
                Err(err) => {
                    tracing::error!(err = ?err, "Payment status check failed");
                    return PaymentOutcome::Failed(err.to_string());
                }
            }

            if attempt + 1 < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        return PaymentOutcome::TimedOut;
    }
}

/// Pulls the `session_id` query parameter out of a checkout redirect URL, the
/// same parameter the hosted success page receives.
pub fn session_id_from_url(url: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            if key == "session_id" && !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    return None;
}
