//! idseal: command line entry point for the identity ledger node.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use zeroize::Zeroizing;

use idseal_node::{
    init_logging, BiometricMode, IdentityNode, NodeConfig, RegisterRequest, RegisterStatus,
    VerifyRequest, VerifyStatus,
};
use idseal_types::BlockHash;
use idseal_utils::format_millis;
use idseal_verification::JsonTemplateExtractor;

#[derive(Parser)]
#[command(name = "idseal", about = "Tamper-evident identity ledger")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "IDSEAL_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the LMDB ledger.
    #[arg(long, env = "IDSEAL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "IDSEAL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "IDSEAL_LOG_FORMAT")]
    log_format: Option<String>,

    /// Required leading zero hex characters per block hash.
    #[arg(long, env = "IDSEAL_DIFFICULTY")]
    difficulty: Option<u8>,

    /// "live" reads face encodings from image files, "stub" matches every face.
    #[arg(long, env = "IDSEAL_BIOMETRIC_MODE", value_parser = ["live", "stub"])]
    biometric_mode: Option<String>,

    /// Proof-of-work deadline per registration, in milliseconds.
    #[arg(long, env = "IDSEAL_MINING_DEADLINE_MS")]
    mining_deadline_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Seal a new identity into the ledger.
    Register {
        #[arg(long)]
        full_name: String,
        /// Primary identity key.
        #[arg(long)]
        pan_number: String,
        /// Secondary identifier. Only its SHA-256 digest is stored.
        #[arg(long, env = "IDSEAL_AADHAAR_NUMBER", hide_env_values = true)]
        aadhaar_number: String,
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        /// Supporting document path (repeatable).
        #[arg(long = "document")]
        documents: Vec<String>,
        /// Face encoding file (JSON array of numbers) or image for the extractor.
        #[arg(long)]
        id_photo: PathBuf,
    },
    /// Verify a claimant against a registered identity.
    Verify {
        #[arg(long)]
        pan_number: String,
        /// Name claimed by the person presenting.
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        live_selfie: PathBuf,
    },
    /// Print the verification audit trail as JSON lines.
    Audit,
    /// Print one ledger block as JSON.
    ShowBlock {
        #[arg(long, conflicts_with = "index", required_unless_present = "index")]
        hash: Option<String>,
        #[arg(long)]
        index: Option<u64>,
    },
    /// Recheck every block's seal and link.
    VerifyChain,
    /// Print the effective configuration as TOML.
    InitConfig {
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let base = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            NodeConfig::from_toml_file(&path).with_context(|| format!("loading config {path}"))?
        }
        None => NodeConfig::default(),
    };

    let biometric_mode = match cli.biometric_mode.as_deref() {
        Some("stub") => BiometricMode::Stub,
        Some(_) => BiometricMode::Live,
        None => base.biometric_mode,
    };

    let config = NodeConfig {
        data_dir: cli.data_dir.clone().unwrap_or(base.data_dir.clone()),
        log_level: cli.log_level.clone().unwrap_or(base.log_level.clone()),
        log_format: cli.log_format.clone().unwrap_or(base.log_format.clone()),
        difficulty: cli.difficulty.unwrap_or(base.difficulty),
        mining_deadline_ms: cli.mining_deadline_ms.unwrap_or(base.mining_deadline_ms),
        biometric_mode,
        ..base
    };
    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if let Command::InitConfig { output } = &cli.command {
        let rendered = config.to_toml_string()?;
        match output {
            Some(path) => std::fs::write(path, rendered)
                .with_context(|| format!("writing {}", path.display()))?,
            None => print!("{rendered}"),
        }
        return Ok(ExitCode::SUCCESS);
    }

    init_logging(config.parsed_log_format()?, &config.log_level)?;
    let node = IdentityNode::open(config, Arc::new(JsonTemplateExtractor))?;

    let code = match cli.command {
        Command::Register {
            full_name,
            pan_number,
            aadhaar_number,
            dob,
            gender,
            phone_number,
            documents,
            id_photo,
        } => {
            let request = RegisterRequest {
                full_name,
                pan_number,
                aadhaar_number: Zeroizing::new(aadhaar_number),
                dob,
                gender,
                phone_number,
                document_paths: documents,
                id_photo: read_file(&id_photo)?,
            };
            let started = Instant::now();
            let response = node.handle_register(request).await;
            tracing::info!(
                elapsed = %format_millis(started.elapsed().as_millis() as u64),
                "register finished"
            );
            print_json(&response)?;
            match response.status {
                RegisterStatus::Success => ExitCode::SUCCESS,
                RegisterStatus::Error => ExitCode::FAILURE,
            }
        }
        Command::Verify {
            pan_number,
            full_name,
            live_selfie,
        } => {
            let request = VerifyRequest {
                pan_number,
                full_name,
                live_selfie: read_file(&live_selfie)?,
            };
            let response = node.handle_verify(request).await;
            print_json(&response)?;
            match response.status {
                VerifyStatus::Verified => ExitCode::SUCCESS,
                VerifyStatus::Rejected => ExitCode::from(1),
                VerifyStatus::Error | VerifyStatus::Failed => ExitCode::from(2),
            }
        }
        Command::Audit => {
            for entry in node.audit_trail()? {
                println!("{}", serde_json::to_string(&entry)?);
            }
            ExitCode::SUCCESS
        }
        Command::ShowBlock { hash, index } => {
            let block = match (hash, index) {
                (Some(hash), _) => {
                    let hash = BlockHash::from_hex(&hash)?;
                    node.block_by_hash(&hash)?
                }
                (None, Some(index)) => node.block_by_index(index)?,
                (None, None) => anyhow::bail!("either --hash or --index is required"),
            };
            print_json(&block)?;
            ExitCode::SUCCESS
        }
        Command::VerifyChain => {
            let report = node.verify_ledger()?;
            println!("{report}");
            if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::InitConfig { .. } => ExitCode::SUCCESS,
    };

    node.shutdown();
    Ok(code)
}
