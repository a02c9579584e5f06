//! Tablero CLI - Main entry point

mod commands;

use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand};
use commands::{render_activities, render_decision, render_home, render_json, App};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tablero_access::RouteGuard;
use tablero_foundation::TableroConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tablero - dashboard access gating from the terminal
#[derive(Parser, Debug)]
#[command(name = "tablero")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Storage file (default: .tablero/storage.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the access snapshot as JSON
    Snapshot,
    /// Evaluate a route guard
    Check(CheckArgs),
    /// Print the home route
    Home,
    /// Set a storage key
    Set { key: String, value: String },
    /// Print a storage key
    Get { key: String },
    /// Remove a storage key
    Remove { key: String },
    /// Recent activity
    #[command(subcommand)]
    Activity(ActivityCommand),
    /// Call a dashboard endpoint
    #[command(subcommand)]
    Api(ApiCommand),
    /// Show or write configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(ClapArgs, Debug)]
#[command(group(ArgGroup::new("requirement").required(true).args(["module", "permission", "admin"])))]
struct CheckArgs {
    /// Module name (matches any `PERMISO_<module>` token)
    #[arg(long)]
    module: Option<String>,

    /// Exact permission token
    #[arg(long)]
    permission: Option<String>,

    /// Require all admin tokens
    #[arg(long)]
    admin: bool,
}

impl CheckArgs {
    fn guard(self) -> RouteGuard {
        match (self.module, self.permission) {
            (Some(module), _) => RouteGuard::module(module),
            (None, Some(permission)) => RouteGuard::permission(permission),
            (None, None) => RouteGuard::admin(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum ActivityCommand {
    /// List recent activity
    List,
    /// Record an activity
    Add { title: String, route: String },
}

#[derive(Subcommand, Debug)]
enum ApiCommand {
    /// GET /api/obtenerListaJefes
    Jefes,
    /// GET /api/obtenerSolicitudesCalendarioJefes
    Calendario,
    /// GET /api/obtenerPruebas/{id}
    Pruebas { id: String },
    /// POST /api/obtenerJustsPorSuper
    Justs { grupo: String, cargo: String },
    /// PUT /api/encuesta/{id}
    Encuesta { id: String, state: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to .tablero/config.json
    Init {
        /// Write to ~/.config/tablero/config.json instead
        #[arg(long)]
        global: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let config = config_or_default(TableroConfig::load());

    let app = App::open(config, args.store)?;
    run(&app, args.command).await
}

/// 설정 로드 실패 시 경고 후 기본값
fn config_or_default(loaded: tablero_foundation::Result<TableroConfig>) -> TableroConfig {
    loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        TableroConfig::default()
    })
}

async fn run(app: &App, command: Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Snapshot => println!("{}", app.snapshot()?),
        Command::Check(check) => {
            let decision = app.check(check.guard());
            println!("{}", render_decision(&decision));
            if !decision.is_allowed() {
                return Ok(ExitCode::from(2));
            }
        }
        Command::Home => println!("{}", render_home(&app.home())),
        Command::Set { key, value } => {
            app.set(&key, &value)?;
            tracing::info!(key = %key, "Stored value");
        }
        Command::Get { key } => match app.get(&key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("Key not found: {}", key);
                return Ok(ExitCode::from(1));
            }
        },
        Command::Remove { key } => {
            if !app.remove(&key)? {
                eprintln!("Key not found: {}", key);
            }
        }
        Command::Activity(ActivityCommand::List) => {
            println!("{}", render_activities(&app.activities()))
        }
        Command::Activity(ActivityCommand::Add { title, route }) => {
            let list = app.record_activity(&title, &route)?;
            println!("{}", render_activities(&list));
        }
        Command::Api(api_command) => {
            let api = app.api()?;
            let value = match api_command {
                ApiCommand::Jefes => Value::Array(api.obtener_lista_jefes().await),
                ApiCommand::Calendario => {
                    Value::Array(api.obtener_solicitudes_calendario_jefes().await)
                }
                ApiCommand::Pruebas { id } => Value::Array(api.obtener_pruebas(&id).await),
                ApiCommand::Justs { grupo, cargo } => {
                    Value::Array(api.obtener_justs_por_super(&grupo, &cargo).await)
                }
                ApiCommand::Encuesta { id, state } => {
                    match api.try_actualizar_encuesta(&id, state).await {
                        Ok(value) => value,
                        Err(e) => {
                            eprintln!("Request failed: {}", e);
                            return Ok(ExitCode::from(1));
                        }
                    }
                }
            };
            println!("{}", render_json(&value)?);
        }
        Command::Config(ConfigCommand::Show) => println!("{}", app.config_json()?),
        Command::Config(ConfigCommand::Init { global }) => {
            let path = app.save_config(global)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
