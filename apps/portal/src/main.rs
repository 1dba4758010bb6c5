use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portal::biodata::form::{BiodataForm, EditForm, RawForm};
use portal::biodata::submission::DeleteOutcome;
use portal::config::Config;
use portal::gateway::HttpGateway;
use portal::models::admin::AdminUserDetail;
use portal::models::user::Credentials;
use portal::notify::{AssumeYes, Confirm, ConsoleConfirm, ConsoleNotifier};
use portal::routes::{guard, Route};
use portal::session::{LocalSessionStore, SessionStore};
use portal::state::AppState;
use portal::{admin, auth, biodata};

#[derive(Parser)]
#[command(name = "portal", version, about = "Employee biodata portal client")]
struct Cli {
    /// Backend base URL (overrides PORTAL_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Session file (overrides PORTAL_SESSION_PATH)
    #[arg(long)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Show your biodata and history
    Profile,
    /// Submit a new biodata record with its history lists
    AddBiodata {
        /// JSON file of raw form input
        #[arg(long)]
        form: PathBuf,
    },
    /// Administrator commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Resolve a navigation path through the route guard
    Open { path: String },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List all users
    List,
    /// Show one user's full record
    Show { id: i64 },
    /// Apply edits from a form file to one user
    Update {
        id: i64,
        #[arg(long)]
        form: PathBuf,
    },
    /// Delete one user
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.api_url, cli.session);

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Portal client v{} -> {}", env!("CARGO_PKG_VERSION"), config.api_url);

    let gateway = HttpGateway::new(&config.api_url, config.request_timeout)
        .context("failed to build HTTP client")?;
    let session = LocalSessionStore::open(&config.session_path)
        .with_context(|| format!("failed to open session file {}", config.session_path.display()))?;

    let state = AppState {
        gateway: Arc::new(gateway),
        session: Arc::new(session),
        notifier: Arc::new(ConsoleNotifier),
    };

    run(&state, cli.command).await
}

async fn run(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Register { email, password } => {
            let next = auth::handlers::register(state, &Credentials { email, password }).await?;
            println!("next: {next}");
        }
        Commands::Login { email, password } => {
            let next = auth::handlers::login(state, &Credentials { email, password }).await?;
            println!("next: {next}");
        }
        Commands::Logout => {
            let next = auth::handlers::logout(state)?;
            println!("next: {next}");
        }
        Commands::Whoami => match state.session.session_user() {
            Some(session) => println!(
                "{} ({})",
                session.user.email.as_deref().unwrap_or("unknown"),
                if session.is_admin() { "admin" } else { "employee" }
            ),
            None => println!("not logged in"),
        },
        Commands::Profile => {
            let profile = biodata::handlers::load_profile(state).await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Commands::AddBiodata { form } => {
            let raw = read_form(&form)?;
            let mut state_form = BiodataForm::default();
            state_form.apply_raw(&raw)?;
            let report = biodata::handlers::submit_biodata(state, &state_form).await?;
            println!("{} records written", report.dispatched);
        }
        Commands::Admin { command } => run_admin(state, command).await?,
        Commands::Open { path } => {
            let requested =
                Route::parse(&path).with_context(|| format!("unknown route {path}"))?;
            let resolved = guard(requested, state.session.session_user().as_ref());
            println!("{resolved}");
        }
    }
    Ok(())
}

async fn run_admin(state: &AppState, command: AdminCommands) -> Result<()> {
    match command {
        AdminCommands::List => {
            let users = admin::handlers::list_users(state).await?;
            println!("{:<6} {:<30} {:<12} POSITION", "ID", "NAME", "BIRTH DATE");
            for user in users {
                println!(
                    "{:<6} {:<30} {:<12} {}",
                    user.id,
                    user.full_name,
                    user.birth_date_display(),
                    user.position
                );
            }
        }
        AdminCommands::Show { id } => {
            let detail = admin::handlers::load_user(state, id).await?;
            print_detail(&detail)?;
        }
        AdminCommands::Update { id, form } => {
            let raw = read_form(&form)?;
            let detail = admin::handlers::load_user(state, id).await?;
            let mut edit = EditForm::from_detail(detail);
            edit.apply_raw(&raw)?;
            let refreshed = admin::handlers::update_user(state, &edit).await?;
            print_detail(&refreshed)?;
        }
        AdminCommands::Delete { id, yes } => {
            let confirm: &dyn Confirm = if yes { &AssumeYes } else { &ConsoleConfirm };
            match admin::handlers::delete_user(state, id, confirm).await? {
                DeleteOutcome::Declined => println!("cancelled"),
                DeleteOutcome::Deleted { next } => println!("next: {next}"),
            }
        }
    }
    Ok(())
}

fn read_form(path: &Path) -> Result<RawForm> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read form file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not a valid form file", path.display()))
}

fn print_detail(detail: &AdminUserDetail) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(detail)?);
    Ok(())
}
