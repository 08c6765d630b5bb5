//! dn-check CLI Application
//!
//! A command-line interface for checking which names are still unregistered
//! across a set of TLDs, using DNS lookups. This CLI application provides a
//! user-friendly interface to the dn-check-lib library.

mod output;
mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use dn_check_lib::{
    is_blank, load_env_config, normalize_name, parse_timeout, read_names_file, split_names,
    split_tlds, CheckConfig, ConfigManager, EnvConfig, FailureKind, FileConfig, NameChecker,
    Outcome, ResolverKind, MAX_CONCURRENCY,
};
use output::OutputFormat;
use std::collections::BTreeMap;
use std::process;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for dn-check
#[derive(Parser, Debug)]
#[command(name = "dn-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check whether names are registered across a set of TLDs using DNS")]
#[command(
    long_about = "Check whether names are registered across a set of TLDs using DNS.\n\nEvery name is combined with every TLD and looked up concurrently. A name that does not exist in DNS (NXDOMAIN) is reported as available."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Names to check (without TLD)
    #[arg(value_name = "NAMES", help_heading = "Name Selection")]
    pub names: Vec<String>,

    /// Comma-separated list of names; takes precedence over --file
    #[arg(
        short = 'n',
        long = "names",
        value_name = "LIST",
        help_heading = "Name Selection"
    )]
    pub names_list: Option<String>,

    /// File with names to check, one per line
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Name Selection"
    )]
    pub file: Option<String>,

    /// TLDs to check (comma-separated or multiple -d flags) [default: com]
    #[arg(short = 'd', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Name Selection")]
    pub tlds: Option<Vec<String>>,

    /// Spool results to a file instead of the console table
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output Format"
    )]
    pub output: Option<String>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Output plain `name.tld : bool` lines
    #[arg(long = "text", help_heading = "Output Format")]
    pub text: bool,

    /// Disable colors in the console table
    #[arg(long = "no-color", help_heading = "Output Format")]
    pub no_color: bool,

    /// Max concurrent lookups (default: 20, max: 100)
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub concurrency: Option<usize>,

    /// Per-lookup timeout, e.g. "5s", "2m" (default: 5s)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Upstream resolver: system, google, cloudflare, quad9
    #[arg(long = "resolver", value_name = "KIND", help_heading = "Resolver")]
    pub resolver: Option<ResolverKind>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Pairs that could not be checked, grouped by failure category.
#[derive(Debug, Default)]
pub(crate) struct ErrorStats {
    by_kind: BTreeMap<FailureKind, Vec<String>>,
}

impl ErrorStats {
    pub(crate) fn add_error(&mut self, fqdn: &str, kind: FailureKind) {
        self.by_kind.entry(kind).or_default().push(fqdn.to_string());
    }

    pub(crate) fn for_kind(&self, kind: FailureKind) -> &[String] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.by_kind.values().any(|fqdns| !fqdns.is_empty())
    }

    pub(crate) fn total(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }
}

/// Settings resolved from defaults, config files, environment and CLI.
#[derive(Debug, Clone)]
struct Settings {
    check: CheckConfig,
    color: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Run the checks
    if let Err(e) = run_name_check(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise warnings only, or debug for our crates with -v.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,dn_check=debug,dn_check_lib=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    // Can't have multiple output formats
    if args.json && args.text {
        return Err("Cannot specify both --json and --text".to_string());
    }

    // Validate concurrency
    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            return Err(format!(
                "Concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            ));
        }
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    if let Some(tlds) = &args.tlds {
        if tlds.iter().all(|tld| split_tlds(tld).is_empty()) {
            return Err("TLD list cannot be empty".to_string());
        }
    }

    Ok(())
}

/// Main name checking logic
async fn run_name_check(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let env_config = load_env_config();

    // Build configuration from files, environment and CLI args
    let settings = build_config(&args, &env_config)?;

    let names = get_names_to_check(&args, &env_config)?;
    let name_count = names.iter().filter(|name| !is_blank(name)).count();
    if name_count == 0 {
        return Err("No names provided".into());
    }

    let tlds = settings.check.tlds.clone();
    let checks = name_count * tlds.len();
    let format = output_format(&args);

    if args.verbose {
        ui::print_header(name_count, tlds.len(), settings.check.concurrency);
    }

    // The table is the only mode that keeps the terminal interactive.
    // Spinner::start returns None if stderr isn't a TTY.
    let spinner = if format.is_none() && args.output.is_none() {
        ui::Spinner::start(format!(
            "Checking {} name{} across {} TLD{}...",
            name_count,
            if name_count == 1 { "" } else { "s" },
            tlds.len(),
            if tlds.len() == 1 { "" } else { "s" },
        ))
    } else {
        None
    };

    let checker = NameChecker::with_config(settings.check.clone());
    let mut error_stats = ErrorStats::default();
    let start_time = Instant::now();

    let outcome = checker
        .run_with_progress(&names, &tlds, |report| {
            if let Outcome::TransientError(e) = &report.outcome {
                error_stats.add_error(&report.fqdn(), e.kind);
            }
        })
        .await;

    let duration = start_time.elapsed();

    // Stop spinner before printing results
    if let Some(s) = spinner {
        s.stop().await;
    }

    let results = outcome?;

    if let Some(path) = &args.output {
        output::write_to_file(path, &results, format.unwrap_or(OutputFormat::Text))?;
        if args.verbose {
            eprintln!("Results written to {}", path);
        }
        if error_stats.has_errors() {
            ui::print_error_summary(&error_stats);
        }
        return Ok(());
    }

    match format {
        Some(format) => {
            print!("{}", output::render(&results, format)?);
            if error_stats.has_errors() {
                ui::print_error_summary(&error_stats);
            }
        }
        None => {
            print!("{}", ui::render_table(&results, &tlds, settings.color));
            println!();
            ui::print_summary(&ui::RunCounts::from_results(&results, checks), duration);
            if error_stats.has_errors() {
                println!();
                ui::print_error_summary(&error_stats);
            }
        }
    }

    tracing::debug!(
        unchecked = error_stats.total(),
        elapsed_ms = duration.as_millis() as u64,
        "run complete"
    );

    Ok(())
}

/// Structured output format requested on the command line, if any.
fn output_format(args: &Args) -> Option<OutputFormat> {
    if args.json {
        Some(OutputFormat::Json)
    } else if args.text {
        Some(OutputFormat::Text)
    } else {
        None
    }
}

/// Build settings from CLI arguments with config file integration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (DNC_*)
/// 3. Local config file (./dn-check.toml)
/// 4. Global config file (~/.dn-check.toml)
/// 5. XDG config file (~/.config/dn-check/config.toml)
/// 6. Built-in defaults
fn build_config(args: &Args, env_config: &EnvConfig) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings {
        check: CheckConfig::default(),
        color: true,
    };

    let config_manager = ConfigManager::new(args.verbose);

    // Step 1: Load config files, explicit path first
    let explicit_path = args.config.as_ref().or(env_config.config.as_ref());
    let file_config = match explicit_path {
        Some(path) => {
            tracing::debug!(%path, "using explicit config file");
            config_manager
                .load_file(path)
                .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?
        }
        None => config_manager.discover_and_load()?,
    };
    settings = merge_file_config(settings, file_config);

    // Step 2: Apply environment variables (DNC_*)
    settings.check = apply_environment_config(settings.check, env_config);

    // Step 3: Apply CLI arguments (highest precedence)
    settings = apply_cli_args(settings, args);

    Ok(settings)
}

/// Merge FileConfig into the settings.
fn merge_file_config(mut settings: Settings, file_config: FileConfig) -> Settings {
    let Some(defaults) = file_config.defaults else {
        return settings;
    };

    if let Some(tlds) = defaults.tlds {
        let tlds = split_tlds(&tlds.join(","));
        if !tlds.is_empty() {
            settings.check = settings.check.with_tlds(tlds);
        }
    }
    if let Some(concurrency) = defaults.concurrency {
        settings.check = settings.check.with_concurrency(concurrency);
    }
    if let Some(timeout) = defaults.timeout.as_deref().and_then(parse_timeout) {
        settings.check = settings.check.with_timeout(timeout);
    }
    if let Some(resolver) = defaults.resolver {
        settings.check = settings.check.with_resolver(resolver);
    }
    if let Some(color) = defaults.color {
        settings.color = color;
    }

    settings
}

/// Apply validated environment variables to the check configuration.
fn apply_environment_config(mut config: CheckConfig, env_config: &EnvConfig) -> CheckConfig {
    if let Some(tlds) = &env_config.tlds {
        config = config.with_tlds(tlds.clone());
    }
    if let Some(concurrency) = env_config.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(timeout) = env_config.timeout {
        config = config.with_timeout(timeout);
    }
    if let Some(resolver) = env_config.resolver {
        config = config.with_resolver(resolver);
    }
    config
}

/// Apply CLI arguments to the settings (highest precedence).
fn apply_cli_args(mut settings: Settings, args: &Args) -> Settings {
    if let Some(tlds) = &args.tlds {
        let tlds = split_tlds(&tlds.join(","));
        if !tlds.is_empty() {
            settings.check = settings.check.with_tlds(tlds);
        }
    }
    if let Some(concurrency) = args.concurrency {
        settings.check = settings.check.with_concurrency(concurrency);
    }
    if let Some(timeout) = args.timeout.as_deref().and_then(parse_timeout) {
        settings.check = settings.check.with_timeout(timeout);
    }
    if let Some(resolver) = args.resolver {
        settings.check = settings.check.with_resolver(resolver);
    }

    // Only override when the user explicitly passes the flag
    if args.no_color {
        settings.color = false;
    }

    settings
}

/// Get the list of names to check.
///
/// Positional names come first. `--names` wins over `--file`, which wins
/// over `DNC_FILE`. Blank entries are kept; the checker ignores them.
fn get_names_to_check(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut names: Vec<String> = args.names.iter().map(|n| normalize_name(n)).collect();

    if let Some(list) = &args.names_list {
        names.extend(split_names(list));
    } else if let Some(path) = args.file.as_ref().or(env_config.file.as_ref()) {
        names.extend(read_names_file(path)?);
    }

    Ok(names)
}
