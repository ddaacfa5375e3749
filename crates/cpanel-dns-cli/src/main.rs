// # cpanel-dns - ACME TXT records on cPanel
//
// Thin command-line layer over `cpanel-dns-uapi`. All protocol and
// matching logic lives in the library crates; this binary only:
// 1. Locates and loads the `.dns-env` configuration file
// 2. Initializes logging
// 3. Logs in and runs one ADD or DELETE
// 4. Reports the outcome and maps it to an exit code
//
// ## Usage
//
// ```bash
// cpanel-dns ADD _acme-challenge.example.com DGyRejmCefe7v4NfDGDKfA
// cpanel-dns DELETE _acme-challenge.example.com DGyRejmCefe7v4NfDGDKfA
// ```
//
// Without arguments the loaded configuration (password masked) and usage
// are printed. No login happens on that path, so bad credentials only
// surface once ADD or DELETE runs.
//
// ## Configuration
//
// `.dns-env` next to the executable (override with `--env-file`). When the
// file does not exist a template is written and the process exits 0; while
// `DNS_ZONE` still holds the template value the process exits 1.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cpanel_dns_core::config::ENV_TEMPLATE;
use cpanel_dns_core::traits::{ChangeResult, TxtRecordProvider};
use cpanel_dns_core::{CpanelConfig, Error, RecordRequest};
use cpanel_dns_uapi::CpanelClient;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Configuration file name, looked up next to the executable
const ENV_FILE_NAME: &str = ".dns-env";

/// Exit codes for different termination scenarios
///
/// - 0: Operation succeeded, template written, or usage printed
/// - 1: Configuration missing, invalid, or still the template
/// - 2: Login or zone operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliExitCode {
    Success = 0,
    ConfigError = 1,
    OperationFailed = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Parser)]
#[command(name = "cpanel-dns", version, about = "Manage ACME TXT records on a cPanel zone")]
struct Cli {
    /// Configuration file (default: .dns-env next to the executable)
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Action {
    /// Add a TXT record
    #[command(name = "ADD", alias = "add")]
    Add { fqdn: String, token: String },

    /// Delete the first TXT record matching FQDN and TOKEN
    #[command(name = "DELETE", alias = "delete")]
    Delete { fqdn: String, token: String },
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::Add { .. } => "ADD",
            Action::Delete { .. } => "DELETE",
        }
    }

    fn request(&self) -> cpanel_dns_core::Result<RecordRequest> {
        match self {
            Action::Add { fqdn, token } | Action::Delete { fqdn, token } => {
                RecordRequest::new(fqdn.as_str(), token.as_str())
            }
        }
    }
}

/// Outcome of looking for the configuration file
#[derive(Debug)]
enum EnvFile {
    /// File was missing; a template now exists at the path
    Created,
    /// File was read and parsed
    Loaded(CpanelConfig),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_path = match cli.env_file.clone() {
        Some(path) => path,
        None => match default_env_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Configuration error: {:#}", e);
                return CliExitCode::ConfigError.into();
            }
        },
    };

    let config = match load_or_create(&env_path) {
        Ok(EnvFile::Loaded(config)) => config,
        Ok(EnvFile::Created) => {
            println!("{} MISSING, CREATED A TEMPLATE, CUSTOMIZE IT", ENV_FILE_NAME);
            println!("--> NEW ENV LOCATION: {}", env_path.display());
            return CliExitCode::Success.into();
        }
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return CliExitCode::ConfigError.into();
        }
    };

    if config.is_default() {
        println!("WORKING WITH DEFAULT ENV FILE, PLEASE CUSTOMIZE");
        println!("--> ENV LOCATION: {}", env_path.display());
        return CliExitCode::ConfigError.into();
    }

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CliExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&config.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CliExitCode::ConfigError.into();
    }

    let Some(action) = cli.action else {
        print!("{}", summary(&config));
        return CliExitCode::Success.into();
    };

    // One operation, strictly sequential
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CliExitCode::OperationFailed.into();
        }
    };

    match rt.block_on(run(&action, &config)) {
        Ok(result) => {
            println!("{}", success_message(&result));
            CliExitCode::Success.into()
        }
        Err(e) => {
            error!("{} failed: {}", action.label(), e);
            println!("{}", failure_message(&action, &e));
            CliExitCode::OperationFailed.into()
        }
    }
}

/// Log in and perform one action
async fn run(action: &Action, config: &CpanelConfig) -> cpanel_dns_core::Result<ChangeResult> {
    let request = action.request()?;

    let mut client = CpanelClient::new(config)?;
    client.login().await?;

    let provider: &dyn TxtRecordProvider = &client;
    info!(
        "{} {} via {} (zone {})",
        action.label(),
        request.fqdn(),
        provider.provider_name(),
        config.zone
    );

    match action {
        Action::Add { .. } => provider.add_txt_record(&request).await,
        Action::Delete { .. } => provider.delete_txt_record(&request).await,
    }
}

fn default_env_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the executable")?;
    let dir = exe
        .parent()
        .context("Executable path has no parent directory")?;
    Ok(dir.join(ENV_FILE_NAME))
}

/// Load the configuration file, writing the template if it is missing
fn load_or_create(path: &Path) -> Result<EnvFile> {
    if !path.is_file() {
        fs::write(path, ENV_TEMPLATE)
            .with_context(|| format!("Failed to write template to {}", path.display()))?;
        return Ok(EnvFile::Created);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = CpanelConfig::parse(&contents)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    Ok(EnvFile::Loaded(config))
}

fn log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Loaded configuration plus usage, printed when no action is given
fn summary(config: &CpanelConfig) -> String {
    format!(
        "APP_NAME: {name}\n\
         APP_VERSION: {version}\n\
         \n\
         Loaded cPanel Dashboard: {host}\n\
         Loaded Port: {port}\n\
         Loaded Username: {user}\n\
         Loaded Password: {password} (Masked)\n\
         \n\
         Loaded DNS Zone: {zone}\n\
         Loaded TTL: {ttl}\n\
         ------------------\n\
         MISSING ARGUMENTS:\n\
         \n\
         ADD FQDN TOKEN\n\
         DELETE FQDN TOKEN\n\
         \n\
         EXAMPLE: ADD _acme-challenge.example.com DGyRejmCefe7v4NfDGDKfA\n",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        host = config.hostname,
        port = config.port,
        user = config.username,
        password = config.masked_password(),
        zone = config.zone,
        ttl = config.ttl,
    )
}

fn success_message(result: &ChangeResult) -> String {
    match result {
        ChangeResult::Added { name, serial } => {
            format!("ADD WAS SUCCESSFUL ({} at serial {})", name, serial)
        }
        ChangeResult::Removed { line_index, serial } => {
            format!(
                "DELETE WAS SUCCESSFUL (line {} at serial {})",
                line_index, serial
            )
        }
    }
}

fn failure_message(action: &Action, err: &Error) -> String {
    match err {
        Error::Authentication(payload) => format!("LOGIN ERROR\n\n{}", payload),
        Error::NotFound(_) => format!("{} FAILED - NO RECORD FOUND", action.label()),
        Error::Api(payload) => format!("{} FAILED\n\n{}", action.label(), payload),
        other => format!("{} FAILED\n\n{}", action.label(), other),
    }
}
