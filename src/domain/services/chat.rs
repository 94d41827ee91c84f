#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use crate::domain::services::ProjectStore;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::api::ApiError;

pub const RATE_LIMIT_NOTICE: &str =
    "Daily chat limit reached. Upgrade to premium for unlimited chats.";
pub const SEND_FAILED_NOTICE: &str = "Failed to send message. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend stored the user message and replied; both were appended.
    Sent,
    /// Empty input, no active project, or a send already in flight. Repeated
    /// submits while in flight are dropped, never queued.
    Ignored,
    RateLimited(String),
    Failed(String),
}

impl SendOutcome {
    pub fn notice(&self) -> Option<&str> {
        return match self {
            SendOutcome::RateLimited(notice) | SendOutcome::Failed(notice) => Some(notice),
            _ => None,
        };
    }
}

/// Orchestrates one chat turn: draft input in, a user/assistant message pair
/// out. The input clears optimistically on send; on failure the user resends
/// by hand, there is no automatic retry.
#[derive(Default)]
pub struct ChatFlow {
    pub input: String,
    sending: bool,
}

impl ChatFlow {
    pub fn new() -> ChatFlow {
        return ChatFlow {
            input: "".to_string(),
            sending: false,
        };
    }

    pub fn is_sending(&self) -> bool {
        return self.sending;
    }

    pub async fn send(&mut self, api: &ApiClient, store: &mut ProjectStore) -> SendOutcome {
        let text = self.input.trim().to_string();
        if text.is_empty() || store.current_project.is_none() || self.sending {
            return SendOutcome::Ignored;
        }

        self.input.clear();
        self.sending = true;

        let project_id = store.current_project.as_ref().unwrap().id.clone();
        let res = api.send_chat(&project_id, &text).await;
        self.sending = false;

        return match res {
            Ok(exchange) => {
                store.add_messages(vec![exchange.user_message, exchange.ai_message]);
                SendOutcome::Sent
            }
            Err(ApiError::RateLimited(detail)) => {
                let notice = if detail.is_empty() {
                    RATE_LIMIT_NOTICE.to_string()
                } else {
                    detail
                };
                SendOutcome::RateLimited(notice)
            }
            Err(err) => {
                tracing::error!(err = ?err, "Failed to send chat message");
                SendOutcome::Failed(SEND_FAILED_NOTICE.to_string())
            }
        };
    }
}

/// Refetches the active project's messages. Errors are logged and swallowed,
/// leaving whatever was already rendered in place.
pub async fn refresh_messages(api: &ApiClient, store: &mut ProjectStore) {
    let Some(project_id) = store.current_project.as_ref().map(|p| return p.id.clone()) else {
        return;
    };

    store.set_loading(true);
    match api.list_messages(&project_id).await {
        Ok(messages) => store.set_messages(messages),
        Err(err) => {
            tracing::error!(err = ?err, project_id = project_id, "Failed to load messages");
        }
    }
    store.set_loading(false);
}

pub async fn refresh_plugin_status(api: &ApiClient, store: &mut ProjectStore) {
    match api.plugin_status().await {
        Ok(status) => store.set_plugin_status(status),
        Err(err) => {
            tracing::error!(err = ?err, "Failed to check plugin status");
        }
    }
}
