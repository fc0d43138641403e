//!
//! orchestrator-client CLI
//! -----------------------
//! Signs in to the orchestrator API, then issues one authorized request or resolves
//! a console route against the signed-in identity's permissions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use orchestrator_client::client::ENV_BASE_URL;
use orchestrator_client::identity::Navigation;
use orchestrator_client::{ApiClient, ClientConfig, ClientError, Navigator, Payload, SessionStore};

#[derive(Debug, Parser)]
#[command(name = "orchestrator-client", version, about = "Authenticated client for the orchestrator API")]
struct Cli {
    /// API root (defaults to $ORCH_API_BASE_URL, then http://127.0.0.1:8000)
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, short, env = "ORCH_USERNAME")]
    user: String,

    #[arg(long, short, env = "ORCH_PASSWORD", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the signed-in identity and its permissions
    Me,
    /// GET an API path
    Get { path: String },
    /// POST a JSON body to an API path
    Post { path: String, body: String },
    /// DELETE an API path
    Delete { path: String },
    /// List the console views this identity may open
    Routes,
    /// Resolve a console path through the route gate and permission guard
    Open { path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("invalid log filter")?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(base) = cli.base_url.clone() {
        config.base_url = base;
    }
    info!(target: "startup", base_url = %config.base_url, env = ENV_BASE_URL, "orchestrator-client starting");

    let session = SessionStore::new();
    let client = ApiClient::new(config, session.clone())?;

    let identity = client
        .sign_in(&cli.user, &cli.password)
        .await
        .with_context(|| format!("sign-in failed for user '{}'", cli.user))?;

    let outcome = run(&client, &session, cli.command, identity).await;
    if let Err(e) = &outcome {
        if let Some(ce) = e.downcast_ref::<ClientError>() {
            let _ = client.end_session_if_expired(ce.clone());
        }
    }
    client.logout().await;
    outcome
}

async fn run(
    client: &ApiClient,
    session: &SessionStore,
    command: Command,
    identity: orchestrator_client::client::Identity,
) -> Result<()> {
    match command {
        Command::Me => print_json(&serde_json::to_value(&identity)?),
        Command::Get { path } => print_payload(client.get(&path).await?),
        Command::Post { path, body } => {
            let body: Value = serde_json::from_str(&body).context("request body is not valid JSON")?;
            print_payload(client.post(&path, body).await?)
        }
        Command::Delete { path } => print_payload(client.delete(&path).await?),
        Command::Routes => {
            let nav = Navigator::new(session.clone());
            for r in nav.visible_routes() {
                println!("{:<12} {}", r.path, r.title);
            }
            Ok(())
        }
        Command::Open { path } => {
            let nav = Navigator::new(session.clone());
            match nav.navigate(&path) {
                Navigation::Render(r) => println!("render {} ({})", r.path, r.title),
                Navigation::Redirect(to) => println!("redirect {}", to),
                Navigation::NotFound => println!("not found"),
            }
            Ok(())
        }
    }
}

fn print_payload(payload: Payload) -> Result<()> {
    match payload {
        Payload::NoContent => {
            println!("(no content)");
            Ok(())
        }
        Payload::Json(v) => print_json(&v),
    }
}

fn print_json(v: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}
