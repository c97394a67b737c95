//! Domwatch CLI Application
//!
//! A command-line interface that decides whether domain names are available
//! by asking the authoritative nameservers of their top-level zone.
//! This CLI application provides a user-friendly interface to domwatch-lib.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domwatch_lib::{
    load_domains_from_file, load_env_config, normalize_domain, parse_record_types, parse_timeout,
    Availability, CheckConfig, ConfigManager, DomainCheckError, DomainChecker, DomainResult,
    EnvConfig, FileConfig, RecordType, Transport,
};
use futures::StreamExt;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domwatch
#[derive(Parser, Debug)]
#[command(name = "domwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check domain availability by asking authoritative nameservers")]
#[command(
    long_about = "Check domain availability by asking the authoritative nameservers of the domain's top-level zone.\n\nA domain is reported AVAILABLE when none of them returns records for it."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain names to check (e.g. example.com)
    #[arg(value_name = "DOMAINS", help_heading = "Domain Selection")]
    pub domains: Vec<String>,

    /// Read domain names from a file, one per line
    #[arg(short = 'f', long = "file", value_name = "FILE", help_heading = "Domain Selection")]
    pub file: Option<String>,

    /// Query over TCP (default)
    #[arg(long = "tcp", conflicts_with = "udp", help_heading = "Transport")]
    pub tcp: bool,

    /// Query over UDP
    #[arg(long = "udp", help_heading = "Transport")]
    pub udp: bool,

    /// Bootstrap DNS server used to find the zone's nameservers
    #[arg(short = 's', long = "server", value_name = "ADDR", help_heading = "Transport")]
    pub server: Option<String>,

    /// Per-exchange timeout (e.g. 2s, 1m)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Transport")]
    pub timeout: Option<String>,

    /// Probe A records
    #[arg(long = "a", help_heading = "Record Types")]
    pub a: bool,

    /// Probe AAAA records
    #[arg(long = "aaaa", help_heading = "Record Types")]
    pub aaaa: bool,

    /// Probe CNAME records
    #[arg(long = "cname", help_heading = "Record Types")]
    pub cname: bool,

    /// Probe LOC records
    #[arg(long = "loc", help_heading = "Record Types")]
    pub loc: bool,

    /// Probe MX records
    #[arg(long = "mx", help_heading = "Record Types")]
    pub mx: bool,

    /// Probe NS records
    #[arg(long = "ns", help_heading = "Record Types")]
    pub ns: bool,

    /// Probe PTR records
    #[arg(long = "ptr", help_heading = "Record Types")]
    pub ptr: bool,

    /// Probe SOA records
    #[arg(long = "soa", help_heading = "Record Types")]
    pub soa: bool,

    /// Probe SPF records
    #[arg(long = "spf", help_heading = "Record Types")]
    pub spf: bool,

    /// Probe SRV records
    #[arg(long = "srv", help_heading = "Record Types")]
    pub srv: bool,

    /// Probe TXT records
    #[arg(long = "txt", help_heading = "Record Types")]
    pub txt: bool,

    /// Record types to probe, comma-separated (e.g. NS,SOA)
    #[arg(
        short = 't',
        long = "types",
        value_name = "TYPES",
        value_delimiter = ',',
        help_heading = "Record Types"
    )]
    pub types: Vec<String>,

    /// Domains checked at once (1-100)
    #[arg(short = 'c', long = "concurrency", value_name = "N", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Output results as JSON
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Trace every query to stderr
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,

    /// Use a specific config file instead of discovered ones
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,
}

/// Effective settings after layering file, environment and CLI values.
#[derive(Debug, Clone)]
struct Settings {
    check: CheckConfig,
    json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(args.verbose);

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    match run_domain_check(args).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Log to stderr; `--verbose` enables the per-query trace.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("domwatch=debug,domwatch_lib=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.domains.is_empty() && args.file.is_none() {
        return Err("You must specify at least one domain name or --file".to_string());
    }

    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 100 {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if let Some(timeout) = &args.timeout {
        parse_timeout(timeout).map_err(|e| e.to_string())?;
    }

    if let Some(server) = &args.server {
        if server.trim().is_empty() {
            return Err("Server cannot be empty".to_string());
        }
    }

    Ok(())
}

/// Check every requested domain. Returns `Ok(false)` if any check failed.
async fn run_domain_check(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let settings = build_config(&args, &env_config)?;
    let domains = get_domains_to_check(&args)?;

    if settings.check.record_types.is_empty() {
        return Err(DomainCheckError::NoRecordTypes.into());
    }

    tracing::debug!(
        server = %settings.check.server,
        transport = %settings.check.transport,
        types = ?settings.check.record_types,
        domains = domains.len(),
        "Starting checks"
    );

    let checker = DomainChecker::with_config(settings.check.clone());
    let started = Instant::now();

    let results = if settings.json {
        let results = checker.check_domains(&domains).await;
        let json = serde_json::to_string_pretty(&results)?;
        println!("{}", json);
        results
    } else {
        let mut results = Vec::with_capacity(domains.len());
        let mut stream = checker.check_domains_stream(&domains);
        while let Some(result) = stream.next().await {
            ui::print_result(&result);
            results.push(result);
        }
        if results.len() > 1 {
            println!();
            ui::print_summary(&results, started.elapsed());
        }
        results
    };

    Ok(!results.iter().any(is_failure))
}

/// Collect domains from arguments and `--file`, normalized and validated.
///
/// Any invalid name aborts the run before a single query is sent.
fn get_domains_to_check(args: &Args) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut raw = args.domains.clone();
    if let Some(path) = &args.file {
        raw.extend(load_domains_from_file(path)?);
    }

    let mut domains = Vec::with_capacity(raw.len());
    for name in &raw {
        let domain = normalize_domain(name)
            .map_err(|_| format!("'{}' is not a domain name", name.trim()))?;
        if !domains.contains(&domain) {
            domains.push(domain);
        }
    }

    Ok(domains)
}

/// Build the effective settings.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (DW_*)
/// 3. Config file (--config / DW_CONFIG, or discovered files)
/// 4. Built-in defaults
fn build_config(args: &Args, env_config: &EnvConfig) -> Result<Settings, DomainCheckError> {
    let config_manager = ConfigManager::new(args.verbose);

    let file_config = match args.config.as_ref().or(env_config.config.as_ref()) {
        Some(path) => {
            tracing::debug!(path = %path, "Using explicit config file");
            config_manager.load_file(path)?
        }
        None => config_manager.discover_and_load()?,
    };

    let settings = Settings {
        check: CheckConfig::default(),
        json: false,
    };
    let settings = merge_file_config(settings, &file_config)?;
    let settings = apply_environment_config(settings, env_config)?;
    apply_cli_args_to_config(settings, args)
}

fn merge_file_config(
    mut settings: Settings,
    file_config: &FileConfig,
) -> Result<Settings, DomainCheckError> {
    if let Some(defaults) = &file_config.defaults {
        settings.check = defaults.apply_to(settings.check)?;
        settings.json = defaults.json.unwrap_or(settings.json);
    }
    Ok(settings)
}

fn apply_environment_config(
    mut settings: Settings,
    env_config: &EnvConfig,
) -> Result<Settings, DomainCheckError> {
    settings.check = env_config.apply_to(settings.check)?;
    settings.json = env_config.json.unwrap_or(settings.json);
    Ok(settings)
}

/// Apply CLI arguments (highest precedence).
///
/// Flags only override when given; absent flags keep file/env values.
fn apply_cli_args_to_config(mut settings: Settings, args: &Args) -> Result<Settings, DomainCheckError> {
    let mut check = settings.check;

    if let Some(server) = &args.server {
        check = check.with_server(server.trim());
    }
    if args.udp {
        check = check.with_transport(Transport::Udp);
    } else if args.tcp {
        check = check.with_transport(Transport::Tcp);
    }
    if let Some(timeout) = &args.timeout {
        check = check.with_timeout(parse_timeout(timeout)?);
    }
    if let Some(concurrency) = args.concurrency {
        check = check.with_concurrency(concurrency);
    }

    let selected = selected_record_types(args)?;
    if !selected.is_empty() {
        check = check.with_record_types(selected);
    }

    settings.check = check;
    settings.json |= args.json;
    Ok(settings)
}

/// Record types named on the command line: per-type flags first, then `--types`.
fn selected_record_types(args: &Args) -> Result<Vec<RecordType>, DomainCheckError> {
    let flags = [
        (args.a, RecordType::A),
        (args.aaaa, RecordType::AAAA),
        (args.cname, RecordType::CNAME),
        (args.loc, RecordType::LOC),
        (args.mx, RecordType::MX),
        (args.ns, RecordType::NS),
        (args.ptr, RecordType::PTR),
        (args.soa, RecordType::SOA),
        (args.spf, RecordType::SPF),
        (args.srv, RecordType::SRV),
        (args.txt, RecordType::TXT),
    ];

    let names: Vec<&str> = flags
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, record_type)| record_type.as_str())
        .chain(args.types.iter().map(String::as_str))
        .collect();

    parse_record_types(&names)
}

/// Whether a result should be reported as a failed check.
fn is_failure(result: &DomainResult) -> bool {
    result.status == Availability::Unknown
}
