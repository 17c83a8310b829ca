//! Command handlers.
//!
//! `App` owns the one `SessionStore` of the process and hands it to the
//! router; protected commands navigate first and only talk to the API when
//! the guard lets them through.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use willpower_core::auth::SessionStore;
use willpower_core::models::{CheckInStatus, Credentials, Goal, GoalType, NewCheckIn, NewGoal, Registration};
use willpower_core::router::{Destination, Navigation, NavigationDecision, RouteName};
use willpower_core::{ApiClient, Config, Router};

use crate::cli::{Command, GoalsCommand};

/// Environment variable holding a password for non-interactive login
const PASSWORD_ENV: &str = "WILLPOWER_PASSWORD";

pub struct App {
    config: Config,
    session: Arc<SessionStore>,
    router: Router,
}

impl App {
    pub fn new(api_url: Option<String>) -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let base_url = api_url.unwrap_or_else(|| config.base_url());
        debug!(%base_url, backend = ?config.token_backend, "Config loaded");

        let api = ApiClient::new(&base_url).context("Failed to create API client")?;
        let storage = config.token_store()?;
        let session = Arc::new(SessionStore::new(api, storage));
        let router = Router::new(Arc::clone(&session));

        Ok(Self {
            config,
            session,
            router,
        })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Register { username } => self.register(username).await,
            Command::Login { username } => self.login(username).await,
            Command::Logout => {
                self.session.logout();
                println!("Logged out.");
                Ok(())
            }
            Command::Status => {
                self.status();
                Ok(())
            }
            Command::Open { path } => self.open(&path).await,
            Command::Goals(cmd) => self.goals(cmd).await,
            Command::Checkin {
                goal_id,
                status,
                notes,
            } => self.check_in(goal_id, &status, notes).await,
            Command::Summary { date } => self.summary(date.as_deref()).await,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    async fn register(&mut self, username: Option<String>) -> Result<()> {
        self.expect_route(RouteName::Register)?;

        let username = match username {
            Some(u) => u,
            None => prompt_line("Username: ")?,
        };
        let password = rpassword::prompt_password("Password: ")?;
        let confirm = rpassword::prompt_password("Confirm password: ")?;
        if password != confirm {
            bail!("Passwords do not match");
        }

        let payload = Registration::new(username, password);
        if let Some(problem) = payload.validation_error() {
            bail!(problem);
        }

        self.session.register(&payload).await?;
        self.remember_username(&payload.username);
        println!("Account created. Run `willpower login` to sign in.");
        Ok(())
    }

    async fn login(&mut self, username: Option<String>) -> Result<()> {
        self.expect_route(RouteName::Login)?;

        let username = match username.or_else(|| self.config.last_username.clone()) {
            Some(u) if !u.is_empty() => u,
            _ => prompt_line("Username: ")?,
        };
        let password = match std::env::var(PASSWORD_ENV) {
            Ok(p) if !p.is_empty() => p,
            _ => rpassword::prompt_password(format!("Password for {}: ", username))?,
        };
        if username.is_empty() || password.is_empty() {
            bail!("Username and password required");
        }

        self.session
            .login(&Credentials::new(username.clone(), password))
            .await
            .map_err(|e| anyhow::anyhow!("Login failed: {}", e))?;

        self.remember_username(&username);
        println!("Logged in as {}.", username);
        Ok(())
    }

    fn remember_username(&mut self, username: &str) {
        self.config.last_username = Some(username.to_string());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    fn status(&self) {
        let state = self.session.snapshot();
        if !state.is_authenticated() {
            println!("Not logged in.");
            return;
        }
        match state.identity {
            Some(identity) => println!("Logged in as {} (user #{}).", identity.username, identity.id),
            None => println!("Logged in (restored session)."),
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Entry screens bounce logged-in users to the dashboard.
    fn expect_route(&self, route: RouteName) -> Result<()> {
        let nav = self.router.navigate_to(Destination::named(route));
        if nav.decision == NavigationDecision::RedirectToDefault {
            bail!("Already logged in. Run `willpower logout` first.");
        }
        Ok(())
    }

    /// Navigate to a protected destination, failing when the guard redirects.
    fn enter(&self, destination: Destination) -> Result<Navigation> {
        let nav = self.router.navigate_to(destination);
        if nav.decision == NavigationDecision::RedirectToLogin {
            bail!("Not logged in. Run `willpower login` first.");
        }
        Ok(nav)
    }

    async fn open(&self, path: &str) -> Result<()> {
        let nav = self.router.navigate(path)?;
        if nav.was_redirected() {
            println!("Redirected to {}", nav.destination);
        }

        match nav.destination.name {
            RouteName::Login => println!("Log in with `willpower login`."),
            RouteName::Register => println!("Create an account with `willpower register`."),
            RouteName::Dashboard => self.show_dashboard().await?,
            RouteName::GoalDetail => {
                let id = nav
                    .destination
                    .param("id")
                    .and_then(|id| id.parse::<u64>().ok())
                    .with_context(|| format!("Invalid goal id in {}", nav.destination.path))?;
                self.show_goal(id).await?;
            }
        }
        Ok(())
    }

    async fn show_dashboard(&self) -> Result<()> {
        let api = self.session.authorized_client();
        let goals = api.fetch_goals().await?;
        if goals.is_empty() {
            println!("No goals yet. Add one with `willpower goals add will \"...\"`.");
            return Ok(());
        }
        let summaries = api.fetch_summaries(None).await?;
        for goal in goals.iter().filter(|g| g.is_active()) {
            let tally = summaries
                .iter()
                .find(|s| s.goal_id == goal.id)
                .map(|s| format!("{}/{} done", s.completed, s.total()))
                .unwrap_or_default();
            println!("{}  {}", format_goal(goal), tally);
        }
        Ok(())
    }

    async fn show_goal(&self, id: u64) -> Result<()> {
        let api = self.session.authorized_client();
        let goal = api.fetch_goal(id).await?;
        println!("{}", format_goal(&goal));
        println!("  status:  {}", goal.status);
        println!("  created: {}", goal.created_at.format("%b %d, %Y"));

        let check_ins = api.fetch_check_ins(id).await?;
        for check_in in &check_ins {
            let notes = if check_in.review_notes.is_empty() {
                String::new()
            } else {
                format!(" - {}", check_in.review_notes)
            };
            println!("  {}  {:?}{}", check_in.date, check_in.status, notes);
        }
        Ok(())
    }

    // =========================================================================
    // Goals and check-ins
    // =========================================================================

    async fn goals(&self, cmd: GoalsCommand) -> Result<()> {
        self.enter(Destination::named(RouteName::Dashboard))?;
        let api = self.session.authorized_client();

        match cmd {
            GoalsCommand::List => self.show_dashboard().await?,
            GoalsCommand::Add { kind, title } => {
                let goal_type = GoalType::parse(&kind)
                    .with_context(|| format!("Unknown goal kind '{}' (use will, wont or want)", kind))?;
                let goal = api.create_goal(&NewGoal { goal_type, title }).await?;
                println!("Created {}", format_goal(&goal));
            }
            GoalsCommand::Show { id } => {
                self.enter(Destination::goal(id))?;
                self.show_goal(id).await?;
            }
            GoalsCommand::SetStatus { id, status } => {
                api.update_goal_status(id, &status).await?;
                println!("Goal #{} is now {}.", id, status);
            }
            GoalsCommand::Delete { id } => {
                api.delete_goal(id).await?;
                println!("Goal #{} moved to the recycle bin.", id);
            }
            GoalsCommand::Trash => {
                let goals = api.fetch_deleted_goals().await?;
                if goals.is_empty() {
                    println!("Recycle bin is empty.");
                }
                for goal in &goals {
                    println!("{}", format_goal(goal));
                }
            }
            GoalsCommand::Restore { id } => {
                api.restore_goal(id).await?;
                println!("Goal #{} restored.", id);
            }
            GoalsCommand::Purge { id } => {
                api.permanently_delete_goal(id).await?;
                println!("Goal #{} deleted permanently.", id);
            }
        }
        Ok(())
    }

    async fn check_in(&self, goal_id: u64, status: &str, notes: String) -> Result<()> {
        self.enter(Destination::goal(goal_id))?;
        let status = CheckInStatus::parse(status)
            .with_context(|| format!("Unknown status '{}' (use completed, partial or failed)", status))?;

        let check_in = self
            .session
            .authorized_client()
            .record_check_in(&NewCheckIn {
                goal_id,
                status,
                review_notes: notes,
            })
            .await?;
        println!("Recorded {:?} for goal #{} on {}.", check_in.status, goal_id, check_in.date);
        Ok(())
    }

    async fn summary(&self, date: Option<&str>) -> Result<()> {
        self.enter(Destination::named(RouteName::Dashboard))?;
        let summaries = self.session.authorized_client().fetch_summaries(date).await?;
        for s in &summaries {
            println!(
                "#{:<4} {:<40} completed {:>3}  partial {:>3}  failed {:>3}  ({:.0}%)",
                s.goal_id,
                s.title,
                s.completed,
                s.partial,
                s.failed,
                s.completion_rate() * 100.0
            );
        }
        Ok(())
    }
}

fn format_goal(goal: &Goal) -> String {
    format!("#{:<4} [{}] {}", goal.id, goal.goal_type, goal.title)
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
