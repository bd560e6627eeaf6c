use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use signup::app::App;
use signup::config::Config;
use signup::logging;
use signup::rest::{self, ApiDoc, ApiState, DocFormat, RestApiServer};
use signup::store;

#[derive(Parser)]
#[command(name = "signup")]
#[command(about = "Lead-capture signup wizard and survey API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the terminal signup wizard (default)
    Wizard {
        /// Run the survey API in-process and submit to it
        #[arg(long)]
        serve: bool,
    },

    /// Start the survey submission API
    Serve {
        /// Port to listen on (default: 7008)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the OpenAPI document
    Openapi {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// Show the effective configuration with secrets redacted
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_wizard_mode = matches!(cli.command, None | Some(Commands::Wizard { .. }));

    // Initialize logging (file-based for the wizard, stderr otherwise)
    let logging_handle = logging::init_logging(&config, is_wizard_mode, cli.debug)?;

    match cli.command {
        None => {
            run_wizard(config, false, logging_handle.log_file_path).await?;
        }
        Some(Commands::Wizard { serve }) => {
            run_wizard(config, serve, logging_handle.log_file_path).await?;
        }
        Some(Commands::Serve { port }) => {
            cmd_serve(config, port).await?;
        }
        Some(Commands::Openapi { yaml }) => {
            cmd_openapi(yaml)?;
        }
        Some(Commands::Config) => {
            cmd_config(&config)?;
        }
    }

    Ok(())
}

async fn run_wizard(config: Config, serve: bool, log_file_path: Option<PathBuf>) -> Result<()> {
    let mut server = None;
    let mut submission_url = config.wizard.submission_url.clone();

    if serve {
        let store = store::connect(&config.database)
            .await
            .context("Failed to open the survey store")?;
        let api = RestApiServer::new(ApiState::new(config.clone(), store), "127.0.0.1:0");
        let addr = api.start().await.map_err(anyhow::Error::msg)?;
        submission_url = format!("http://{addr}/api/survey");
        server = Some(api);
    }

    let mut app = App::new(config, &submission_url)?;
    let result = app.run().await;

    if let Some(server) = server {
        server.shutdown().await;
    }

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

async fn cmd_serve(mut config: Config, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr = config.server_addr();

    let store = store::connect(&config.database)
        .await
        .context("Failed to open the survey store")?;

    println!("Starting survey API server...");
    println!("  Address: {}", addr);
    println!("  Storage: {}", store.backend_name());
    println!("  Endpoints:");
    println!("    GET  /api/v1/health   Health check");
    println!("    GET  /api/v1/status   Server status");
    println!("    POST /api/survey      Submit a survey");
    println!("    GET  /swagger-ui      API explorer");
    println!();

    let state = ApiState::new(config, store);
    rest::serve(state, &addr).await?;

    Ok(())
}

fn cmd_openapi(yaml: bool) -> Result<()> {
    let format = if yaml { DocFormat::Yaml } else { DocFormat::Json };
    println!("{}", ApiDoc::render(format)?);
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    print!("{}", config.redacted().to_toml()?);
    Ok(())
}
