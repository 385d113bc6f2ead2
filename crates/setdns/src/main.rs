// # set-dns
//
// Points `<tenant>.<cluster>.` at an IP address in a hosted DNS zone.
//
// This binary is a THIN integration layer:
// - Parses arguments (flags or `SETDNS_*` environment variables)
// - Loads and validates credentials
// - Builds a DNS client through the registry
// - Runs the reconciliation engine once and prints its progress
//
// All DNS logic lives in setdns-core.
//
// ## Credentials
//
// With `--credentials <file>`, the file holds `KEY=VALUE` lines:
//
// ```text
// AWS_ACCESS_KEY_ID=AKIA...
// AWS_SECRET_ACCESS_KEY=...
// ```
//
// Without it, the same two variables are read from the environment.
//
// ## Example
//
// ```bash
// set-dns --ip 192.168.1.10 -t dev1 -c nuk9.com -f ~/.aws/route53.env
// ```

use anyhow::{Context, Result};
use clap::Parser;
use setdns_core::config::DEFAULT_CLUSTER;
use setdns_core::types::DEFAULT_TTL;
use setdns_core::{
    ClientRegistry, CredentialProvider, DnsClient, EngineConfig, EnvCredentialProvider,
    FileCredentialProvider, ProviderConfig, ReconcileConfig, ReconcileEngine, ReconcileOutcome,
    ReconcileRequest, RecordType,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: Record is in place
/// - 1: Arguments, configuration or credentials are unusable
/// - 2: Reconciliation failed against the provider
#[derive(Debug, Clone, Copy)]
enum SetDnsExitCode {
    Success = 0,
    ConfigError = 1,
    ReconcileError = 2,
}

impl From<SetDnsExitCode> for ExitCode {
    fn from(code: SetDnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "set-dns")]
#[command(about = "Set host IP address to be mapped to a DNS entry using AWS Route 53", long_about = None)]
#[command(version)]
struct Cli {
    /// IP address the tenant name must resolve to
    #[arg(long, env = "SETDNS_IP")]
    ip: String,

    /// Tenant name, without the cluster suffix
    #[arg(short, long, env = "SETDNS_TENANT")]
    tenant: String,

    /// Cluster (hosted zone) the tenant belongs to
    #[arg(short, long, env = "SETDNS_CLUSTER", default_value = DEFAULT_CLUSTER)]
    cluster: String,

    /// Record type to create or replace
    #[arg(short, long, env = "SETDNS_RECORD_TYPE", default_value = "A")]
    record_type: String,

    /// Credentials file with AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY lines
    /// (defaults to the process environment)
    #[arg(short = 'f', long, env = "SETDNS_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Signing region
    #[arg(long, env = "SETDNS_REGION")]
    region: Option<String>,

    /// API endpoint override
    #[arg(long, env = "SETDNS_ENDPOINT")]
    endpoint: Option<String>,

    /// TTL in seconds for the created record
    #[arg(long, env = "SETDNS_TTL", default_value_t = DEFAULT_TTL)]
    ttl: u32,

    /// Log the change batches instead of submitting them
    #[arg(long, env = "SETDNS_DRY_RUN")]
    dry_run: bool,

    /// trace, debug, info, warn or error
    #[arg(long, env = "SETDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Map arguments onto the core configuration
    fn to_config(&self) -> Result<ReconcileConfig> {
        let record_type: RecordType = self.record_type.parse()?;

        let request = ReconcileRequest::new(self.tenant.trim(), self.ip.trim())
            .with_cluster(self.cluster.trim())
            .with_record_type(record_type);

        let config = ReconcileConfig {
            request,
            provider: ProviderConfig::Route53 {
                region: self.region.clone(),
                endpoint: self.endpoint.clone(),
                dry_run: self.dry_run,
                comment: Some(format!("set-dns {}", self.tenant.trim())),
            },
            engine: EngineConfig {
                ttl: self.ttl,
                ..EngineConfig::default()
            },
        };
        config.validate()?;

        Ok(config)
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "Log level '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                SetDnsExitCode::ConfigError.into()
            } else {
                SetDnsExitCode::Success.into()
            };
        }
    };

    // Initialize tracing
    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SetDnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SetDnsExitCode::ConfigError.into();
    }

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return SetDnsExitCode::ConfigError.into();
        }
    };

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SetDnsExitCode::ConfigError.into();
        }
    };

    let result = rt.block_on(async {
        let client = match build_client(&cli, &config).await {
            Ok(client) => client,
            Err(e) => {
                error!("Cannot set up DNS client: {:#}", e);
                return SetDnsExitCode::ConfigError;
            }
        };

        match reconcile(client, config).await {
            Ok(outcome) => {
                info!("DNS entry {} is set", outcome.record_name());
                SetDnsExitCode::Success
            }
            Err(e) => {
                error!("Error occurred in setting DNS entry: {:#}", e);
                SetDnsExitCode::ReconcileError
            }
        }
    });

    result.into()
}

/// Load credentials and create the DNS client
async fn build_client(cli: &Cli, config: &ReconcileConfig) -> Result<Box<dyn DnsClient>> {
    let source: Box<dyn CredentialProvider> = match &cli.credentials {
        Some(path) => Box::new(FileCredentialProvider::new(path)),
        None => Box::new(EnvCredentialProvider::new()),
    };

    let credentials = source
        .credentials()
        .await
        .with_context(|| format!("Failed to load credentials from {}", source.source_name()))?;
    credentials
        .validate()
        .with_context(|| format!("Incomplete credentials in {}", source.source_name()))?;
    info!("Extracted AWS credentials from {}", source.source_name());

    let registry = ClientRegistry::new();

    #[cfg(feature = "route53")]
    setdns_provider_route53::register(&registry);

    let client = registry
        .create_client(&config.provider, credentials)
        .context("Failed to create DNS client")?;
    info!("Using {} DNS client", client.provider_name());

    Ok(client)
}

/// Run the engine once, printing events as they arrive
async fn reconcile(client: Box<dyn DnsClient>, config: ReconcileConfig) -> Result<ReconcileOutcome> {
    let (engine, mut events) = ReconcileEngine::new(client, config)?;

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("{}", event);
        }
    });

    let result = engine.run().await;

    // Dropping the engine closes the event channel
    drop(engine);
    if let Err(e) = printer.await {
        warn!("Event printer stopped unexpectedly: {}", e);
    }

    Ok(result?)
}
