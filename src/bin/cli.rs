//! Log triage CLI
//!
//! Local execution entry point. For AWS Lambda, use `triage-lambda`.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log_triage::{
    config::apply_overrides,
    error::{AppError, Result},
    models::{Config, ObjectRef},
    pipeline::{self, TriageOutcome},
    services::{BedrockAnalyzer, Notifier, SnsNotifier, StdoutNotifier},
    storage::{LocalLogSource, LogSource},
};

/// Log triage - flag suspicious access-log rows and get an AI assessment
#[derive(Parser, Debug)]
#[command(name = "triage", version, about = "Web access log triage")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "triage.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the rows that would be flagged
    Scan {
        /// Log file to scan
        file: PathBuf,
    },

    /// Print the prompt that would be sent to the model
    Prompt {
        /// Log file to scan
        file: PathBuf,
    },

    /// Run the full pipeline against a local file
    Analyze {
        /// Log file to analyze
        file: PathBuf,

        /// Print the alert instead of publishing it
        #[arg(long)]
        dry_run: bool,

        /// SNS topic to publish to (overrides config and SNS_TOPIC_ARN)
        #[arg(long)]
        topic: Option<String>,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Split a file path into a source rooted at its directory and the object it names.
fn local_object(file: &Path) -> Result<(LocalLogSource, ObjectRef)> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::config(format!("not a file path: {}", file.display())))?;
    let root = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    Ok((LocalLogSource::new(root), ObjectRef::new("local", name)))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = if cli.config.exists() {
        log::info!("Loading configuration from {}", cli.config.display());
        Config::load_or_default(&cli.config)
    } else {
        Config::default()
    };
    apply_overrides(&mut config, |name| std::env::var(name).ok());

    match cli.command {
        Command::Scan { file } => {
            let (source, object) = local_object(&file)?;
            let content = source.fetch_text(&object).await?;
            let report = pipeline::scan(&content, config.triage.delimiter_byte()?)?;

            for entry in &report.entries {
                println!("{:>6}  {}", entry.line, entry);
            }

            let (errors, paths, bots) = report.breakdown();
            log::info!(
                "Flagged {} of {} rows (errors: {}, sensitive paths: {}, scanners: {})",
                report.entries.len(),
                report.rows_scanned,
                errors,
                paths,
                bots
            );
        }

        Command::Prompt { file } => {
            let (source, object) = local_object(&file)?;
            let content = source.fetch_text(&object).await?;
            let report = pipeline::scan(&content, config.triage.delimiter_byte()?)?;

            if report.is_empty() {
                log::info!("No suspicious activity detected; no prompt would be sent.");
            } else {
                print!(
                    "{}",
                    pipeline::build_prompt(&report.entries, config.triage.sample_limit)
                );
            }
        }

        Command::Analyze {
            file,
            dry_run,
            topic,
        } => {
            if let Some(topic) = topic {
                config.notify.topic_arn = Some(topic);
            }
            config.validate()?;

            let (source, object) = local_object(&file)?;
            let sdk_config =
                aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let analyzer = BedrockAnalyzer::from_conf(&sdk_config, config.inference.clone());
            let notifier: Box<dyn Notifier> = if dry_run {
                Box::new(StdoutNotifier)
            } else {
                Box::new(SnsNotifier::from_conf(
                    &sdk_config,
                    config.notify.topic_arn()?,
                ))
            };

            let outcome =
                pipeline::run_triage(&config, &source, &analyzer, notifier.as_ref(), &object)
                    .await
                    .inspect_err(|e| log::error!("Triage failed: {}", e))?;

            match outcome {
                TriageOutcome::NoActivity { rows_scanned } => {
                    log::info!("No suspicious activity in {} rows", rows_scanned);
                }
                TriageOutcome::Notified {
                    flagged, sampled, ..
                } => {
                    log::info!("Alert sent for {} flagged rows ({} sampled)", flagged, sampled);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Model: {}", config.inference.model_id);
            log::info!("✓ Sample limit: {}", config.triage.sample_limit);
            match config.notify.topic_arn() {
                Ok(arn) => log::info!("✓ Topic: {}", arn),
                Err(_) => log::warn!("No topic configured; only --dry-run analysis will work"),
            }

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
