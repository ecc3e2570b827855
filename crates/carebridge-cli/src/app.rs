//! Application state and command dispatch.
//!
//! The `App` owns the one `SessionController` for the process, resolves the
//! stored credential before any protected command runs, and routes each
//! command through the guard before touching the API.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, warn};

use carebridge_core::api::{AccessProfile, ApiClient, MentorApi, ParentApi};
use carebridge_core::auth::Registration;
use carebridge_core::config::Config;
use carebridge_core::models::{
    NewActivity, NewChild, NewGrowthLog, NewPost, NewResource, NewSession, Role, User,
};
use carebridge_core::nav::{guard, Gate, Navigator, Route};
use carebridge_core::SessionController;

use crate::cli::{text, Command, DataCommand};
use crate::render;

/// Environment variable holding the default sign-in email
const EMAIL_ENV: &str = "CAREBRIDGE_EMAIL";

/// Environment variable holding the sign-in password (skips the prompt)
const PASSWORD_ENV: &str = "CAREBRIDGE_PASSWORD";

// ============================================================================
// Navigation
// ============================================================================

/// Remembers where the session last asked to go so the next view can follow.
#[derive(Default)]
pub struct TerminalNavigator {
    pending: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    pub fn take(&self) -> Option<Route> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        debug!(route = %route, "Navigate");
        *self.pending.lock().unwrap_or_else(|e| e.into_inner()) = Some(route);
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    config: Config,
    client: ApiClient,
    session: Arc<SessionController>,
    navigator: Arc<TerminalNavigator>,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let api_url = config.api_url();
        debug!(api_url = %api_url, backend = ?config.credential_backend, "Config loaded");

        let client = ApiClient::new(api_url)?;
        let store = config.credential_store()?;
        let navigator = Arc::new(TerminalNavigator::default());
        let session = Arc::new(
            SessionController::new(store, Arc::new(client.clone()), navigator.clone())
                .with_verify_timeout(config.verify_timeout()),
        );

        Ok(Self {
            config,
            client,
            session,
            navigator,
        })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        self.session.bootstrap().await;
        debug!(state = self.session.current_state().name(), "Session resolved");

        match guard(&self.session.current_state(), command.route()) {
            Gate::Render => {}
            Gate::Placeholder => bail!("Still verifying your session, try again"),
            Gate::Redirect(Route::Login) => {
                bail!("You are not signed in. Run `carebridge login` first.")
            }
            Gate::Redirect(route) => bail!("Not available here, go to {}", route.title()),
        }

        match command {
            Command::Login { email } => self.login(email).await,
            Command::Register { name, email, role } => self.register(name, email, role).await,
            Command::Logout => {
                self.session.logout().await;
                println!("Signed out.");
                Ok(())
            }
            Command::WhoAmI => {
                let user = self.signed_in_user()?;
                print!("{}", render::whoami(&user));
                Ok(())
            }
            Command::Dashboard => self.dashboard().await,
            Command::Data(command) => self.data_command(command).await,
        }
    }

    fn signed_in_user(&self) -> Result<User> {
        self.session
            .current_user()
            .ok_or_else(|| anyhow!("You are not signed in. Run `carebridge login` first."))
    }

    fn profile(&self) -> Result<AccessProfile> {
        self.session
            .access_profile(&self.client)
            .ok_or_else(|| anyhow!("You are not signed in. Run `carebridge login` first."))
    }

    fn parent_api(&self) -> Result<ParentApi> {
        match self.profile()? {
            AccessProfile::Parent(api) => Ok(api),
            AccessProfile::Mentor(_) => bail!("This command is only available to parents"),
        }
    }

    fn mentor_api(&self) -> Result<MentorApi> {
        match self.profile()? {
            AccessProfile::Mentor(api) => Ok(api),
            AccessProfile::Parent(_) => bail!("This command is only available to mentors"),
        }
    }

    // =========================================================================
    // Account
    // =========================================================================

    async fn login(&mut self, email: Option<String>) -> Result<()> {
        let default_email = std::env::var(EMAIL_ENV)
            .ok()
            .or_else(|| self.config.last_email.clone())
            .unwrap_or_default();
        let email = match email {
            Some(e) => e,
            None => prompt("Email", &default_email)?,
        };
        let password = match std::env::var(PASSWORD_ENV) {
            Ok(p) if !p.is_empty() => p,
            _ => rpassword::prompt_password("Password: ").context("Failed to read password")?,
        };

        self.session
            .login(&email, &password)
            .await
            .map_err(|e| anyhow!(e.message().to_string()))?;

        self.remember_email(&email);
        self.show_landing().await
    }

    async fn register(&mut self, name: String, email: String, role: Role) -> Result<()> {
        let password = match std::env::var(PASSWORD_ENV) {
            Ok(p) if !p.is_empty() => p,
            _ => rpassword::prompt_password("Choose a password: ")
                .context("Failed to read password")?,
        };

        let registration = Registration {
            name,
            email: email.clone(),
            password,
            role,
        };
        self.session
            .register(&registration)
            .await
            .map_err(|e| anyhow!(e.message().to_string()))?;

        self.remember_email(&email);
        self.show_landing().await
    }

    fn remember_email(&mut self, email: &str) {
        self.config.last_email = Some(email.trim().to_string());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    /// Follow the navigation signal emitted by a successful sign-in
    async fn show_landing(&self) -> Result<()> {
        let user = self.signed_in_user()?;
        info!(user_id = user.user_id, "Signed in from terminal");
        println!("Signed in as {} ({}).", user.name, user.role);
        match self.navigator.take() {
            Some(Route::Dashboard) => self.dashboard().await,
            _ => Ok(()),
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    async fn dashboard(&self) -> Result<()> {
        let user = self.signed_in_user()?;
        print!("{}", render::header(&user, Route::Dashboard));

        match self.profile()? {
            AccessProfile::Parent(api) => {
                let shared = api.shared();
                let (children, mentor, sessions) =
                    futures::try_join!(api.children(), api.my_mentor(), shared.sessions())?;
                print!("{}", render::children(&children));
                println!();
                print!("{}", render::my_mentor(mentor.as_ref()));
                println!();
                print!("{}", render::sessions(&sessions));
            }
            AccessProfile::Mentor(api) => {
                let shared = api.shared();
                let (clients, sessions) = futures::try_join!(api.clients(), shared.sessions())?;
                print!("{}", render::clients(&clients));
                println!();
                print!("{}", render::sessions(&sessions));
            }
        }
        Ok(())
    }

    async fn data_command(&self, command: DataCommand) -> Result<()> {
        match command {
            DataCommand::Children => {
                let children = self.parent_api()?.children().await?;
                print!("{}", render::children(&children));
            }
            DataCommand::AddChild {
                name,
                born,
                gender,
                diagnosed,
            } => {
                let child = NewChild {
                    name,
                    date_of_birth: born,
                    gender,
                    diagnosis_date: diagnosed,
                };
                let child = self.parent_api()?.add_child(&child).await?;
                println!("Added {} (#{}).", child.name, child.child_id);
            }
            DataCommand::Growth { child_id } => {
                let logs = self.parent_api()?.growth_logs(child_id).await?;
                print!("{}", render::growth_logs(&logs));
            }
            DataCommand::LogGrowth {
                child_id,
                height,
                weight,
                head,
                note,
            } => {
                let note = text(&note);
                let log = NewGrowthLog {
                    height_cm: height,
                    weight_kg: weight,
                    head_circumference_cm: head,
                    note: (!note.is_empty()).then_some(note),
                };
                self.parent_api()?.add_growth_log(child_id, &log).await?;
                println!("Measurement saved.");
            }
            DataCommand::Activities { child_id } => {
                let activities = self.parent_api()?.activities(child_id).await?;
                print!("{}", render::activities(&activities));
            }
            DataCommand::AddActivity {
                child_id,
                activity_type,
                when,
                title,
            } => {
                let activity = NewActivity {
                    title: text(&title),
                    description: String::new(),
                    activity_type,
                    scheduled_time: when,
                };
                let activity = self.parent_api()?.add_activity(child_id, &activity).await?;
                println!("Scheduled {} ({}).", activity.title, activity.activity_type);
            }
            DataCommand::Mentors => {
                let mentors = self.parent_api()?.mentors().await?;
                print!("{}", render::mentors(&mentors));
            }
            DataCommand::Connect { mentor_id } => {
                let api = self.parent_api()?;
                api.connect_mentor(mentor_id).await?;
                let mentor = api.my_mentor().await?;
                print!("{}", render::my_mentor(mentor.as_ref()));
            }
            DataCommand::Clients => {
                let clients = self.mentor_api()?.clients().await?;
                print!("{}", render::clients(&clients));
            }
            DataCommand::Sessions => {
                let sessions = self.profile()?.shared().sessions().await?;
                print!("{}", render::sessions(&sessions));
            }
            DataCommand::CreateSession { when, link, title } => {
                let session = NewSession {
                    title: text(&title),
                    description: String::new(),
                    start_time: when,
                    meeting_link: link,
                };
                let session = self.mentor_api()?.create_session(&session).await?;
                println!("Created session {} (#{}).", session.title, session.session_id);
            }
            DataCommand::Resources { category } => {
                let resources = self
                    .profile()?
                    .shared()
                    .resources(category.as_deref())
                    .await?;
                print!("{}", render::resources(&resources, category.as_deref()));
            }
            DataCommand::AddResource {
                category,
                kind,
                url,
                title,
            } => {
                let resource = NewResource {
                    title: text(&title),
                    description: String::new(),
                    category,
                    kind,
                    url,
                };
                let resource = self.mentor_api()?.create_resource(&resource).await?;
                println!("Published {} (#{}).", resource.title, resource.resource_id);
            }
            DataCommand::DeleteResource { resource_id } => {
                let api = self.mentor_api()?;
                let resources = api.shared().resources(None).await?;
                let resource = resources
                    .iter()
                    .find(|r| r.resource_id == resource_id)
                    .ok_or_else(|| anyhow!("Resource #{} not found", resource_id))?;
                api.delete_resource(resource).await?;
                println!("Deleted {}.", resource.title);
            }
            DataCommand::Posts { category } => {
                let posts = self.profile()?.shared().posts(category.as_deref()).await?;
                print!("{}", render::posts(&posts, category.as_deref()));
            }
            DataCommand::Post { category, content } => {
                let post = NewPost {
                    content: text(&content),
                    category,
                };
                let post = self.profile()?.shared().create_post(&post).await?;
                println!("Posted (#{}).", post.post_id);
            }
            DataCommand::Like { post_id } => {
                self.profile()?.shared().like_post(post_id).await?;
                println!("Liked post #{}.", post_id);
            }
            DataCommand::Comments { post_id } => {
                let comments = self.profile()?.shared().comments(post_id).await?;
                print!("{}", render::comments(&comments));
            }
            DataCommand::Comment { post_id, content } => {
                self.profile()?
                    .shared()
                    .add_comment(post_id, &text(&content))
                    .await?;
                println!("Comment added.");
            }
        }
        Ok(())
    }
}

/// Read a line from stdin, falling back to `default` when left blank
fn prompt(label: &str, default: &str) -> Result<String> {
    if default.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, default);
    }
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let value = line.trim();
    Ok(if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_navigator_take() {
        let nav = TerminalNavigator::default();
        assert_eq!(nav.take(), None);
        nav.navigate(Route::Dashboard);
        assert_eq!(nav.take(), Some(Route::Dashboard));
        assert_eq!(nav.take(), None);
    }
}
