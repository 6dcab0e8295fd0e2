use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use eyre::Result;
use orbipax_cli::commands;
use orbipax_cli::config;
use orbipax_core::step::WizardStepId;
use orbipax_schema::rules::ValidationIssue;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "orbipax")]
#[command(about = "Patient intake validation and storage")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new config
    Init {
        /// Organization the records belong to
        #[arg(long)]
        organization: Uuid,
        /// Directory for file-backed records
        #[arg(long)]
        storage_root: Option<PathBuf>,
        /// Replace an existing config
        #[arg(long)]
        force: bool,
    },
    /// List the configured steps
    Steps,
    /// Validate a step draft from a JSON file
    Validate {
        step: WizardStepId,
        file: PathBuf,
        /// Only check fields that are present
        #[arg(long)]
        partial: bool,
    },
    /// Validate and save a step draft from a JSON file
    Save {
        patient: Uuid,
        step: WizardStepId,
        file: PathBuf,
    },
    /// Print a stored step record
    Load { patient: Uuid, step: WizardStepId },
    /// Check whether a patient's intake is ready to submit
    Submit { patient: Uuid },
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_issues(issues: &[ValidationIssue]) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(issues)?);
    Ok(if issues.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let today = jiff::Zoned::now().date();

    match cli.command {
        Commands::Init {
            organization,
            storage_root,
            force,
        } => {
            commands::init(&config_path, organization, storage_root, force)?;
            println!("Wrote {}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Steps => {
            let config = config::load_config_from(&config_path)?;
            for line in commands::describe_steps(&config) {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate {
            step,
            file,
            partial,
        } => {
            let draft = commands::read_draft(&file)?;
            print_issues(&commands::validate(step, &draft, partial, today)?)
        }
        Commands::Save {
            patient,
            step,
            file,
        } => {
            let config = config::load_config_from(&config_path)?;
            let store = commands::open_store(&config).await;
            let draft = commands::read_draft(&file)?;
            print_issues(&commands::save(store.as_ref(), patient, step, &draft, today).await?)
        }
        Commands::Load { patient, step } => {
            let config = config::load_config_from(&config_path)?;
            let store = commands::open_store(&config).await;
            match commands::load(store.as_ref(), patient, step).await? {
                Some(record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("No {step} record for patient {patient}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Submit { patient } => {
            let config = config::load_config_from(&config_path)?;
            let store = commands::open_store(&config).await;
            print_issues(&commands::submit(&config, store, patient, today).await?)
        }
    }
}
