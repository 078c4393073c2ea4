use clap::Parser;
use mimalloc::MiMalloc;
use schemapush::api::ManagementApi;
use schemapush::cli::{Cli, Commands};
use schemapush::config::Config;
use schemapush::service::{SchemaApplier, connectivity};
use schemapush::{SchemaPushError, SchemaScript};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = match cli.resolve_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {}", e.report());
            return ExitCode::FAILURE;
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    debug!(
        api_base = %cfg.api_base,
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        project_ref = %cfg.project_ref.as_deref().unwrap_or("<none>"),
        loglevel = %cfg.loglevel
    );

    let outcome = match &cli.command {
        Commands::Apply { file, dry_run, .. } => run_apply(&cfg, file, *dry_run).await,
        Commands::Check => run_check(&cfg).await,
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e.report());
            ExitCode::FAILURE
        }
    }
}

async fn run_apply(cfg: &Config, file: &Path, dry_run: bool) -> Result<ExitCode, SchemaPushError> {
    let script = SchemaScript::load(file)?;
    let applier = SchemaApplier::new(ManagementApi::from_config(cfg)?);

    if dry_run {
        let project_ref = cfg
            .project_ref
            .as_deref()
            .ok_or(SchemaPushError::MissingSetting("project_ref (SCHEMAPUSH_PROJECT_REF)"))?;
        println!("{}", applier.preview(&script, project_ref)?);
        return Ok(ExitCode::SUCCESS);
    }

    let creds = cfg.credentials()?;

    println!("Applying schema...");
    match applier.apply(&script, &creds).await {
        Ok(body) => {
            println!("Success!");
            println!("{body}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Failed to apply schema:");
            eprintln!("{}", e.report());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_check(cfg: &Config) -> Result<ExitCode, SchemaPushError> {
    let token = cfg.access_token()?;
    let api = ManagementApi::from_config(cfg)?;

    let report = connectivity::check(&api, &token).await?;
    println!("Status: {}", report.status.as_u16());
    println!("{}", report.body);

    Ok(if report.is_authorized() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
