#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::StatusCode;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::ApiError;
use crate::domain::models::CheckoutSession;
use crate::domain::models::Message;
use crate::domain::models::PaymentStatus;
use crate::domain::models::Plan;
use crate::domain::models::PluginStatus;
use crate::domain::models::Project;
use crate::domain::models::Route;
use crate::domain::models::Theme;
use crate::domain::models::User;
use crate::domain::services::AuthStore;
use crate::domain::services::Router;

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub user: User,
}

#[derive(Serialize)]
struct ThemeRequest {
    theme: Theme,
}

#[derive(Serialize)]
struct CreateProjectRequest {
    name: String,
    project_type: String,
}

#[derive(Serialize)]
struct ChatRequest {
    project_id: String,
    message: String,
}

/// The persisted user message and the generated assistant reply, in order, as
/// returned by `POST /api/chat`. The client appends both rather than
/// synthesizing the user message locally, so ids always match the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatExchange {
    pub user_message: Message,
    pub ai_message: Message,
}

#[derive(Serialize)]
struct CheckoutRequest {
    plan: String,
    origin_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// HTTP client for the NotFox backend. Attaches the bearer token from the
/// auth store to every request, and handles 401 globally: sign out, navigate
/// to login, then surface [ApiError::Unauthorized] to the caller.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<Mutex<AuthStore>>,
    router: Arc<Mutex<Router>>,
}

impl ApiClient {
    pub fn new(base_url: &str, auth: Arc<Mutex<AuthStore>>, router: Arc<Mutex<Router>>) -> ApiClient {
        return ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            router,
        };
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{base}/api{path}", base = self.base_url);
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let mut req = req;
        let token = self.auth.lock().unwrap().token.clone();
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let res = req.send().await?;
        let status = res.status();

        if status == StatusCode::UNAUTHORIZED {
            let detail = error_detail(res).await;
            self.force_logout();
            return Err(ApiError::Unauthorized(detail));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited(error_detail(res).await));
        }

        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                detail: error_detail(res).await,
            });
        }

        return Ok(res);
    }

    /// The one globally handled failure: any 401 clears the session and lands
    /// the caller on the login route. Re-entrant safe, navigating to login
    /// while already there is a plain state write.
    fn force_logout(&self) {
        tracing::warn!("Backend rejected the session token, signing out");
        self.auth.lock().unwrap().logout();
        self.router.lock().unwrap().navigate(Route::Login);
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<TokenResponse, ApiError> {
        let res = self
            .execute(self.http.post(self.endpoint("/auth/register")).json(req))
            .await?;
        return Ok(res.json::<TokenResponse>().await?);
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<TokenResponse, ApiError> {
        let res = self
            .execute(self.http.post(self.endpoint("/auth/login")).json(req))
            .await?;
        return Ok(res.json::<TokenResponse>().await?);
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        let res = self.execute(self.http.get(self.endpoint("/auth/me"))).await?;
        return Ok(res.json::<User>().await?);
    }

    pub async fn update_theme(&self, theme: Theme) -> Result<(), ApiError> {
        self.execute(
            self.http
                .put(self.endpoint("/auth/theme"))
                .json(&ThemeRequest { theme }),
        )
        .await?;
        return Ok(());
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let res = self.execute(self.http.get(self.endpoint("/projects"))).await?;
        return Ok(res.json::<Vec<Project>>().await?);
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Project, ApiError> {
        let res = self
            .execute(self.http.get(self.endpoint(&format!("/projects/{project_id}"))))
            .await?;
        return Ok(res.json::<Project>().await?);
    }

    pub async fn create_project(&self, name: &str) -> Result<Project, ApiError> {
        let res = self
            .execute(self.http.post(self.endpoint("/projects")).json(&CreateProjectRequest {
                name: name.to_string(),
                project_type: "roblox_game".to_string(),
            }))
            .await?;
        return Ok(res.json::<Project>().await?);
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<(), ApiError> {
        self.execute(
            self.http
                .delete(self.endpoint(&format!("/projects/{project_id}"))),
        )
        .await?;
        return Ok(());
    }

    pub async fn list_messages(&self, project_id: &str) -> Result<Vec<Message>, ApiError> {
        let res = self
            .execute(self.http.get(self.endpoint(&format!("/messages/{project_id}"))))
            .await?;
        return Ok(res.json::<Vec<Message>>().await?);
    }

    pub async fn send_chat(&self, project_id: &str, message: &str) -> Result<ChatExchange, ApiError> {
        let res = self
            .execute(self.http.post(self.endpoint("/chat")).json(&ChatRequest {
                project_id: project_id.to_string(),
                message: message.to_string(),
            }))
            .await?;
        return Ok(res.json::<ChatExchange>().await?);
    }

    pub async fn subscription_plans(&self) -> Result<BTreeMap<String, Plan>, ApiError> {
        let res = self
            .execute(self.http.get(self.endpoint("/subscription/plans")))
            .await?;
        return Ok(res.json::<BTreeMap<String, Plan>>().await?);
    }

    pub async fn create_checkout(
        &self,
        plan: &str,
        origin_url: &str,
    ) -> Result<CheckoutSession, ApiError> {
        let res = self
            .execute(self.http.post(self.endpoint("/payments/checkout")).json(
                &CheckoutRequest {
                    plan: plan.to_string(),
                    origin_url: origin_url.to_string(),
                },
            ))
            .await?;
        return Ok(res.json::<CheckoutSession>().await?);
    }

    pub async fn payment_status(&self, session_id: &str) -> Result<PaymentStatus, ApiError> {
        let res = self
            .execute(
                self.http
                    .get(self.endpoint(&format!("/payments/status/{session_id}"))),
            )
            .await?;
        return Ok(res.json::<PaymentStatus>().await?);
    }

    pub async fn plugin_status(&self) -> Result<PluginStatus, ApiError> {
        let res = self
            .execute(self.http.get(self.endpoint("/plugin/status")))
            .await?;
        return Ok(res.json::<PluginStatus>().await?);
    }
}

async fn error_detail(res: Response) -> String {
    let reason = res
        .status()
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string();

    let body = match res.text().await {
        Ok(body) => body,
        Err(_) => return reason,
    };

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        return parsed.detail;
    }

    if body.trim().is_empty() {
        return reason;
    }

    return body;
}
