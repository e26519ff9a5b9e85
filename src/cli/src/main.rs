//! CLI for batch token distribution over an object-ledger network.

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use multisend_cli::commands::{balance, check, estimate, send};
use multisend_cli::commands::send::SendOutcome;
use multisend_cli::config::CliConfig;
use multisend_core::types::RequirementKind;

/// Command line arguments for the CLI.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "multisend",
    about = "Batch token distribution over an object-ledger network"
)]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Node to connect to
    #[structopt(short, long)]
    node: Option<String>,

    /// Sender account address
    #[structopt(short, long)]
    sender: Option<String>,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the CLI.
#[derive(Debug, StructOpt)]
enum Command {
    /// Show an account's balances
    #[structopt(name = "balance")]
    Balance {
        /// Account to query instead of the configured sender
        #[structopt(long)]
        address: Option<String>,
    },

    /// Estimate the fee for a batch
    #[structopt(name = "estimate-fee")]
    EstimateFee {
        /// Number of recipients in the batch
        #[structopt(long)]
        recipients: usize,
    },

    /// Check whether balances cover a batch before building it
    #[structopt(name = "check")]
    Check {
        /// Asset to distribute: `native` or a coin type tag
        #[structopt(long, default_value = "native")]
        asset: String,

        /// Path to the recipient list file
        #[structopt(long, parse(from_os_str))]
        recipients: PathBuf,
    },

    /// Build a batch and hand it to the signer
    #[structopt(name = "send")]
    Send {
        /// Asset to distribute: `native` or a coin type tag
        #[structopt(long, default_value = "native")]
        asset: String,

        /// Path to the recipient list file
        #[structopt(long, parse(from_os_str))]
        recipients: PathBuf,

        /// Build and show the transaction without submitting it
        #[structopt(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();

    // Load configuration
    let mut config = match &opt.config {
        Some(path) => CliConfig::from_file(path)?,
        None => match CliConfig::default_path().filter(|p| p.exists()) {
            Some(path) => CliConfig::from_file(path)?,
            None => CliConfig::default(),
        },
    };

    // Override node if specified
    if let Some(node) = opt.node {
        config.node = node;
    }

    let sender = opt.sender.as_deref();

    // Run the appropriate command
    match opt.cmd {
        Command::Balance { address } => {
            balance::run(&config, address.as_deref().or(sender)).await?;
        }
        Command::EstimateFee { recipients } => {
            println!(
                "{} {} native for {} recipients",
                "Estimated fee:".green(),
                estimate::run(recipients),
                recipients
            );
        }
        Command::Check { asset, recipients } => {
            let report = check::run(&config, sender, &asset, &recipients).await?;

            let denomination = match report.kind {
                RequirementKind::Fee => " native (fee reserve)",
                RequirementKind::TransferAndFee => " native (transfer + fee)",
                RequirementKind::Transfer => "",
            };
            if report.sufficient {
                println!(
                    "{} balance {} covers required {}{}",
                    "Sufficient:".green(),
                    report.current_balance,
                    report.required,
                    denomination
                );
            } else {
                println!(
                    "{} balance {} is below required {}{}",
                    "Insufficient:".red(),
                    report.current_balance,
                    report.required,
                    denomination
                );
            }
        }
        Command::Send {
            asset,
            recipients,
            dry_run,
        } => match send::run(&config, sender, &asset, &recipients, dry_run).await? {
            SendOutcome::DryRun(tx) => {
                println!("{}", "Unsubmitted transaction:".green());
                for command in &tx.commands {
                    println!("  {}", command);
                }
                if tx.decimals.defaulted {
                    println!(
                        "{}",
                        "Warning: decimal count defaulted to 9, metadata lookup failed".yellow()
                    );
                }
                println!("{} {}", "Digest:".green(), tx.digest());
            }
            SendOutcome::Executed { digest, recipients } => {
                println!(
                    "{} {} recipients paid, digest {}",
                    "Transaction executed:".green(),
                    recipients,
                    digest
                );
                if let Some(link) = config.explorer_link(&digest) {
                    println!("{} {}", "Explorer:".green(), link);
                }
            }
            SendOutcome::Rejected => {
                println!(
                    "{}",
                    "Aborted by signer; no transaction occurred.".yellow()
                );
            }
        },
    }

    Ok(())
}
