//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use prospector_core::pipeline::{ProgressReporter, RankRunConfig, RankRunResult};
use prospector_core::results;
use prospector_shared::{
    AppConfig, init_config, init_config_at, load_config, load_config_from, load_rules_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Prospector: rank discussion contributors into a prioritized outreach list.
#[derive(Parser)]
#[command(
    name = "prospector",
    version,
    about = "Rank discussion contributors into a prioritized outreach list.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.prospector/prospector.toml).
    #[arg(long, global = true, env = "PROSPECTOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Rank a JSON file of contributors and write the reports.
    Rank {
        /// JSON array of contributor records.
        input: PathBuf,

        /// Results root (defaults to `results_dir` from the config).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// TOML file overriding the `[ranking]` rules.
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Manage the dated results directory.
    Results {
        /// Results subcommand.
        #[command(subcommand)]
        action: ResultsAction,

        /// Results root (defaults to `results_dir` from the config).
        #[arg(long, global = true)]
        root: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Results subcommands.
#[derive(Subcommand)]
pub(crate) enum ResultsAction {
    /// Move loose timestamped files into date directories.
    Organize,
    /// List date directories, newest first.
    List,
    /// Print the path of the newest prospects report.
    Latest,
    /// Move old date directories into `archives/`.
    Archive {
        /// Days to keep (defaults to `days_to_keep` from the config).
        #[arg(long)]
        days: Option<u32>,
    },
    /// Show file counts and disk usage.
    Summary,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "prospector=info",
        1 => "prospector=debug",
        _ => "prospector=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Rank { input, out, rules } => {
            let config = resolve_config(config_path)?;
            cmd_rank(config, input, out, rules.as_deref())
        }
        Command::Results { action, root } => {
            let config = resolve_config(config_path)?;
            let root = root.unwrap_or_else(|| PathBuf::from(&config.defaults.results_dir));
            match action {
                ResultsAction::Organize => cmd_results_organize(&root),
                ResultsAction::List => cmd_results_list(&root),
                ResultsAction::Latest => cmd_results_latest(&root),
                ResultsAction::Archive { days } => {
                    cmd_results_archive(&root, days.unwrap_or(config.defaults.days_to_keep))
                }
                ResultsAction::Summary => cmd_results_summary(&root),
            }
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the config from `--config` if given, else the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_rank(
    config: AppConfig,
    input: PathBuf,
    out: Option<PathBuf>,
    rules: Option<&Path>,
) -> Result<()> {
    if !input.is_file() {
        return Err(eyre!("input file '{}' not found", input.display()));
    }

    let rules = match rules {
        Some(p) => load_rules_from(p)?,
        None => config.ranking,
    };

    let run_config = RankRunConfig {
        input,
        results_root: out.unwrap_or_else(|| PathBuf::from(&config.defaults.results_dir)),
        source: config.defaults.source_label,
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        rules,
        outreach: config.outreach,
    };

    info!(
        input = %run_config.input.display(),
        results = %run_config.results_root.display(),
        "ranking contributors"
    );

    let reporter = CliProgress::new();
    let result = prospector_core::pipeline::rank_file(&run_config, &reporter)?;

    println!();
    println!("  Prospects ranked!");
    println!("  Run:       {}", result.run_id);
    println!("  Input:     {}", result.report.input_count);
    println!("  Dropped:   {}", result.report.dropped_count);
    println!("  Merged:    {}", result.report.merged_count);
    println!("  Prospects: {}", result.report.prospect_count);
    for (tier, count) in &result.tier_counts {
        println!("    {:<22} {count}", tier.label());
    }
    println!("  Report:    {}", result.outputs.markdown.display());
    println!("  Tracking:  {}", result.outputs.csv.display());
    println!("  Export:    {}", result.outputs.json.display());
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_results_organize(root: &Path) -> Result<()> {
    let moved = results::organize(root)?;
    println!("Organized {moved} file(s) into date directories under {}", root.display());
    Ok(())
}

fn cmd_results_list(root: &Path) -> Result<()> {
    let dirs = results::list(root)?;
    if dirs.is_empty() {
        println!("No results found in {}", root.display());
        return Ok(());
    }

    println!("{:<12} {:>5} {:>5} {:>5}  LATEST", "DATE", "JSON", "CSV", "MD");
    for dir in dirs {
        println!(
            "{:<12} {:>5} {:>5} {:>5}  {}",
            dir.date.format("%Y-%m-%d"),
            dir.json_files,
            dir.csv_files,
            dir.md_files,
            dir.latest_file.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn cmd_results_latest(root: &Path) -> Result<()> {
    match results::latest_report(root)? {
        Some(path) => println!("{}", path.display()),
        None => println!("No prospects report found in {}", root.display()),
    }
    Ok(())
}

fn cmd_results_archive(root: &Path, days: u32) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let moved = results::archive(root, days, today)?;
    println!("Archived {moved} date directory(ies) older than {days} days");
    Ok(())
}

fn cmd_results_summary(root: &Path) -> Result<()> {
    let summary = results::summary(root)?;

    println!();
    println!("  Results:     {}", root.display());
    println!("  Date dirs:   {}", summary.date_dirs);
    match summary.latest_date {
        Some(date) => println!("  Latest:      {}", date.format("%Y-%m-%d")),
        None => println!("  Latest:      -"),
    }
    println!("  JSON files:  {}", summary.json_files);
    println!("  CSV files:   {}", summary.csv_files);
    println!("  MD files:    {}", summary.md_files);
    println!(
        "  Total size:  {:.2} MB",
        summary.total_bytes as f64 / (1024.0 * 1024.0)
    );
    println!();
    Ok(())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => init_config_at(p)?,
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &RankRunResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
