use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Checkout session returned by the backend. The URL is opened in a browser,
/// and the session id is what the status poller tracks afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
    pub session_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub status: String,
    pub payment_status: String,
    #[serde(default)]
    pub amount_total: f64,
    #[serde(default)]
    pub currency: String,
}

impl PaymentStatus {
    pub fn is_paid(&self) -> bool {
        return self.payment_status == "paid";
    }

    pub fn is_expired(&self) -> bool {
        return self.status == "expired";
    }
}
