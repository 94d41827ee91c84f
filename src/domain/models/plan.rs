use serde_derive::Deserialize;
use serde_derive::Serialize;

/// A subscription plan as served by `/api/subscription/plans`. Plans are keyed
/// by id (weekly, monthly, yearly) in the response payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub amount: f64,
    pub name: String,
    #[serde(default)]
    pub features: Vec<String>,
}
