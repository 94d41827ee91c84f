use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Liveness of the Roblox Studio plugin as tracked by the backend. Polled on
/// demand, never pushed, and held without expiry until the next refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginStatus {
    pub connected: bool,
    #[serde(default)]
    pub last_synced: Option<String>,
    pub message: String,
}

impl Default for PluginStatus {
    fn default() -> PluginStatus {
        return PluginStatus {
            connected: false,
            last_synced: None,
            message: "Plugin not connected".to_string(),
        };
    }
}
