#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

use std::path;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use dialoguer::Password;
use dialoguer::Select;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Role;
use crate::domain::models::Route;
use crate::domain::models::Theme;
use crate::domain::models::UserPatch;
use crate::domain::services::chat;
use crate::domain::services::payments::session_id_from_url;
use crate::domain::services::AuthStore;
use crate::domain::services::ChatFlow;
use crate::domain::services::PaymentPoller;
use crate::domain::services::ProjectStore;
use crate::domain::services::Router;
use crate::domain::services::SendOutcome;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::api::ApiError;
use crate::infrastructure::api::LoginRequest;
use crate::infrastructure::api::RegisterRequest;

/// Composition root. Owns the two stores, the router, and the API client;
/// every command handler funnels state changes through the stores' named
/// operations.
pub struct App {
    pub auth: Arc<Mutex<AuthStore>>,
    pub projects: ProjectStore,
    pub router: Arc<Mutex<Router>>,
    pub api: ApiClient,
}

impl App {
    pub fn from_config() -> App {
        let storage_path =
            path::PathBuf::from(Config::get(ConfigKey::StateDir)).join("notfox-auth.json");
        return App::assemble(
            &Config::get(ConfigKey::BaseUrl),
            AuthStore::load(storage_path),
        );
    }

    fn assemble(base_url: &str, auth_store: AuthStore) -> App {
        let authenticated = auth_store.is_authenticated;
        let auth = Arc::new(Mutex::new(auth_store));
        let router = Arc::new(Mutex::new(Router::default()));
        router.lock().unwrap().resolve(Route::Dashboard, authenticated);

        let api = ApiClient::new(base_url, auth.clone(), router.clone());

        return App {
            auth,
            projects: ProjectStore::new(),
            router,
            api,
        };
    }

    fn is_authenticated(&self) -> bool {
        return self.auth.lock().unwrap().is_authenticated;
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let res = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.auth
            .lock()
            .unwrap()
            .set_auth(res.user, &res.access_token);
        self.router.lock().unwrap().resolve(Route::Dashboard, true);

        return Ok(());
    }

    pub async fn sign_up(&self, email: &str, username: &str, password: &str) -> Result<(), ApiError> {
        let res = self
            .api
            .register(&RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                username: username.to_string(),
            })
            .await?;

        self.auth
            .lock()
            .unwrap()
            .set_auth(res.user, &res.access_token);
        self.router.lock().unwrap().resolve(Route::Dashboard, true);

        return Ok(());
    }

    pub fn sign_out(&self) {
        self.auth.lock().unwrap().logout();
        self.router.lock().unwrap().navigate(Route::Login);
    }

    pub async fn login_command(&self, email: Option<&str>) -> Result<()> {
        let email = prompt_or(email, "Email")?;
        let password = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?;

        match self.sign_in(&email, &password).await {
            Ok(()) => {
                let username = self
                    .auth
                    .lock()
                    .unwrap()
                    .user
                    .as_ref()
                    .map(|user| return user.username.to_string())
                    .unwrap_or_default();
                println!("Signed in as {username}.");
            }
            // Credential failures stay on the form; nothing was mutated.
            Err(err) => println!("{}", Paint::red(format!("Sign in failed: {err}"))),
        }

        return Ok(());
    }

    pub async fn register_command(&self, email: Option<&str>, username: Option<&str>) -> Result<()> {
        let email = prompt_or(email, "Email")?;
        let username = prompt_or(username, "Username")?;
        let password = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?;

        match self.sign_up(&email, &username, &password).await {
            Ok(()) => println!("Welcome to NotFox, {username}!"),
            Err(err) => println!("{}", Paint::red(format!("Registration failed: {err}"))),
        }

        return Ok(());
    }

    pub async fn whoami_command(&self) -> Result<()> {
        let user = self.api.current_user().await?;
        println!(
            "{} <{}> — {} tier, {} theme",
            user.username, user.email, user.subscription_tier, user.theme
        );

        self.auth.lock().unwrap().update_user(UserPatch {
            email: Some(user.email),
            username: Some(user.username),
            theme: Some(user.theme),
            subscription_tier: Some(user.subscription_tier),
        });

        return Ok(());
    }

    /// The local value wins immediately; the backend write is fire-and-forget
    /// and never rolls the store back.
    pub async fn theme_command(&self, theme: Theme) -> Result<()> {
        self.auth.lock().unwrap().set_theme(theme);
        println!("Theme set to {theme}.");

        if let Err(err) = self.api.update_theme(theme).await {
            tracing::warn!(err = ?err, "Unable to persist theme preference");
        }

        return Ok(());
    }

    pub async fn list_projects_command(&mut self) -> Result<()> {
        let projects = self.api.list_projects().await?;
        self.projects.set_projects(projects);

        if self.projects.projects.is_empty() {
            println!("No projects yet. Create one with `notfox projects create`.");
            return Ok(());
        }

        for project in &self.projects.projects {
            println!("- ({}) {}", project.id, project.name);
        }

        return Ok(());
    }

    pub async fn create_project_command(&mut self, name: &str) -> Result<()> {
        let project = self.api.create_project(name).await?;
        println!("Created project {} ({}).", project.name, project.id);
        self.projects.add_project(project);

        return Ok(());
    }

    pub async fn delete_project_command(&mut self, project_id: &str) -> Result<()> {
        let project = self.api.get_project(project_id).await?;
        self.api.delete_project(project_id).await?;
        self.projects.remove_project(project_id);
        println!("Deleted project {} ({project_id}).", project.name);

        return Ok(());
    }

    pub async fn chat_command(&mut self, project_query: Option<&str>) -> Result<()> {
        if !self.is_authenticated() {
            println!("You need to sign in first: `notfox login`.");
            return Ok(());
        }

        let projects = self.api.list_projects().await?;
        self.projects.set_projects(projects);
        if self.projects.projects.is_empty() {
            println!("No projects yet. Create one with `notfox projects create`.");
            return Ok(());
        }

        let selected = match project_query {
            Some(query) => self
                .projects
                .projects
                .iter()
                .find(|project| return project.id == query || project.name == query)
                .cloned(),
            None => {
                let names = self
                    .projects
                    .projects
                    .iter()
                    .map(|project| return project.name.to_string())
                    .collect::<Vec<String>>();
                let idx = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt("Which project?")
                    .default(0)
                    .items(&names)
                    .interact_opt()?
                    .unwrap_or(0);
                Some(self.projects.projects[idx].clone())
            }
        };

        let Some(project) = selected else {
            println!("No project matches {}.", project_query.unwrap_or_default());
            return Ok(());
        };

        println!("Chatting in {}. Type /quit to leave.", Paint::yellow(&project.name));
        self.projects.set_current_project(project);
        chat::refresh_messages(&self.api, &mut self.projects).await;
        chat::refresh_plugin_status(&self.api, &mut self.projects).await;

        if self.projects.plugin_status.connected {
            println!("{}", Paint::green("Plugin connected"));
        } else {
            println!("{}", Paint::yellow(&self.projects.plugin_status.message));
        }

        for message in &self.projects.messages {
            print_message(message);
        }

        let mut flow = ChatFlow::new();
        loop {
            let line: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("you")
                .allow_empty(true)
                .interact_text()?;

            if line.trim() == "/quit" || line.trim() == "/q" {
                break;
            }

            flow.input = line;
            let before = self.projects.messages.len();
            match flow.send(&self.api, &mut self.projects).await {
                SendOutcome::Sent => {
                    for message in &self.projects.messages[before..] {
                        if message.role != Role::User {
                            print_message(message);
                        }
                    }
                }
                SendOutcome::Ignored => {}
                outcome => {
                    if let Some(notice) = outcome.notice() {
                        println!("{}", Paint::red(notice));
                    }
                }
            }
        }

        return Ok(());
    }

    pub async fn plans_command(&self) -> Result<()> {
        let plans = self.api.subscription_plans().await?;
        for (id, plan) in plans {
            println!("{id}: {} — ${:.2}", plan.name, plan.amount);
            for feature in plan.features {
                println!("  - {feature}");
            }
        }

        return Ok(());
    }

    pub async fn subscribe_command(&self, plan: &str) -> Result<()> {
        let base_url = Config::get(ConfigKey::BaseUrl);
        let checkout = self.api.create_checkout(plan, &base_url).await?;

        println!("Opening checkout in your browser...");
        if let Err(err) = open::that(&checkout.url) {
            tracing::warn!(err = ?err, "Unable to open a browser");
            println!("Complete your checkout here: {}", checkout.url);
        }

        println!("Waiting for payment confirmation...");
        let outcome = PaymentPoller::default()
            .confirm(&self.api, Some(&checkout.session_id))
            .await;
        println!("{}", outcome.notice());

        return Ok(());
    }

    /// Second call site of the shared poller: confirm a checkout after the
    /// fact, from a session id or a pasted redirect URL.
    pub async fn confirm_payment_command(
        &self,
        session_id: Option<&str>,
        url: Option<&str>,
    ) -> Result<()> {
        let from_url = url.and_then(session_id_from_url);
        let session_id = session_id.map(str::to_string).or(from_url);

        let outcome = PaymentPoller::default()
            .confirm(&self.api, session_id.as_deref())
            .await;
        println!("{}", outcome.notice());

        return Ok(());
    }

    pub async fn plugin_command(&mut self) -> Result<()> {
        chat::refresh_plugin_status(&self.api, &mut self.projects).await;
        let status = &self.projects.plugin_status;
        if status.connected {
            println!("{}", Paint::green("Plugin connected"));
        } else {
            println!("{}", Paint::yellow(&status.message));
        }
        if let Some(last_synced) = &status.last_synced {
            println!("Last synced: {last_synced}");
        }

        return Ok(());
    }
}

fn prompt_or(value: Option<&str>, prompt: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value.to_string());
    }

    let res = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()?;
    return Ok(res);
}

fn print_message(message: &crate::domain::models::Message) {
    let label = match message.role {
        Role::User => Paint::yellow("you").to_string(),
        Role::Assistant => Paint::green("notfox").to_string(),
        Role::System => Paint::blue("system").to_string(),
    };

    println!("{label}: {}", message.content);
}
