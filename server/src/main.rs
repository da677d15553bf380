use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{DefaultEmployeeService, EmployeeStore, InMemoryEmployeeStore};
use server::{
    config::AppConfig,
    graphql,
    http::{self, AppState, ServeConfig},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "directory-server", version, about = "Role-filtered employee directory")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Load and validate the employee directory.
    #[command(name = "directory:check")]
    DirectoryCheck(DirectoryArgs),
    /// Print the GraphQL schema.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct DirectoryArgs {
    #[arg(long, value_name = "FILE", help = "JSON employee directory (overrides DIRECTORY_PATH)")]
    directory: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[command(flatten)]
    directory: DirectoryArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    let app_config = AppConfig::load()?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::DirectoryCheck(args) => directory_check(args, app_config),
        Command::SchemaPrint { output } => schema_print(output),
    }
}

async fn run_server(cmd: ServeCommand, config: AppConfig) -> Result<()> {
    let config = Arc::new(config.with_directory(cmd.directory.directory));
    let store: Arc<dyn EmployeeStore> = Arc::new(config.load_directory()?);
    let service = Arc::new(DefaultEmployeeService::new(store.clone()));
    let state = AppState::new(config, store, service)?;
    http::serve(ServeConfig::new(cmd.host, cmd.port), state).await
}

fn directory_check(args: DirectoryArgs, config: AppConfig) -> Result<()> {
    let store = config.with_directory(args.directory).load_directory()?;
    info!(employees = store.len(), "employee directory is valid");
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let service = DefaultEmployeeService::new(Arc::new(InMemoryEmployeeStore::default()));
    let sdl = graphql::build_schema(Arc::new(service)).sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "GraphQL schema written");
        }
        None => println!("{sdl}"),
    }
    Ok(())
}
