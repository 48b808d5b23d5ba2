//! Provisioner CLI - creates a client folder structure from the Drive template
//!
//! Prints exactly one JSON record on stdout for the calling automation and
//! exits non-zero unless the run succeeded. Logs go to stderr.

mod credentials;
mod logging;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use provisioner_core::settings::validate_organization_name;
use provisioner_core::{
    ProvisionError, ReplicationPlan, ReplicationResult, Settings, TreeReplicator,
};
use provisioner_gdrive::DriveClient;

#[derive(Parser)]
#[command(name = "provisioner")]
#[command(about = "Provisioner - create a client folder structure from the Drive template")]
#[command(version)]
struct Cli {
    /// Organization (client) name
    #[arg(value_name = "ORGANIZATION")]
    organization: String,

    /// Settings file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Service account key file (defaults to $GOOGLE_SERVICE_ACCOUNT_JSON)
    #[arg(long, value_name = "PATH")]
    credentials_file: Option<PathBuf>,

    /// List the template and print what would be created, without writing
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

enum Outcome {
    Replicated(ReplicationResult),
    Planned(ReplicationPlan),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let (success, emitted) = match runtime.block_on(run(&cli)) {
        Ok(Outcome::Replicated(result)) => (result.success, emit(&result)),
        Ok(Outcome::Planned(plan)) => (true, emit(&plan)),
        Err(err) => {
            tracing::error!(code = err.code(), error = %err, "Provisioning aborted");
            (false, emit(&ReplicationResult::aborted(&err)))
        }
    };

    if let Err(e) = emitted {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    if !success {
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<Outcome, ProvisionError> {
    let organization = validate_organization_name(&cli.organization)?;
    let settings = Settings::load(&cli.config)?;
    let key = credentials::load(cli.credentials_file.as_deref())?;
    let client = DriveClient::connect(&key).await?;
    let replicator = TreeReplicator::new(&client, &settings);

    if cli.dry_run {
        let outcome = match replicator.plan(organization).await {
            Ok(plan) => {
                info!(
                    folders = plan.root.folder_count(),
                    files = plan.root.file_count(),
                    "Dry run - no changes made\n{}",
                    plan.render_tree()
                );
                Outcome::Planned(plan)
            }
            Err(err) => Outcome::Replicated(ReplicationResult::plan_failed(organization, &err)),
        };
        return Ok(outcome);
    }

    Ok(Outcome::Replicated(replicator.provision(organization).await))
}

/// Write `value` as pretty JSON on stdout
fn emit(value: &impl Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("Failed to write result")?;
    Ok(())
}
