use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use keyword_harvester::config::{
    default_config_paths, find_config_file, get_config, load_config, Config,
};
use keyword_harvester::export::ExportSink;
use keyword_harvester::models::{SourceKind, DEFAULT_KEYWORDS};
use keyword_harvester::pipeline::{CollectionPipeline, PipelineError};
use keyword_harvester::sources::{SourceError, SourceRegistry};
use keyword_harvester::ui::{self, Spinner, Status};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Keyword Harvester - collect keyword-matching discussions from Reddit and Hacker News
#[derive(Parser, Debug)]
#[command(name = "keyword-harvester")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Collect keyword-matching discussions from Reddit and Hacker News", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv, -vvv)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory the CSV export is written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Number of records to preview after a run
    #[arg(long, global = true, default_value_t = 5)]
    preview: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover subreddits for the keywords and collect their newest discussions
    #[command(alias = "r")]
    Reddit {
        /// Comma-separated keywords
        #[arg(long, short, default_value = DEFAULT_KEYWORDS)]
        keywords: String,

        /// Reddit application client id (overrides REDDIT_CLIENT_ID)
        #[arg(long)]
        client_id: Option<String>,

        /// Reddit application client secret (overrides REDDIT_CLIENT_SECRET)
        #[arg(long)]
        client_secret: Option<String>,

        /// User agent sent to Reddit (overrides REDDIT_USER_AGENT)
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Search Hacker News for each keyword
    #[command(alias = "hn")]
    Hackernews {
        /// Comma-separated keywords
        #[arg(long, short, default_value = DEFAULT_KEYWORDS)]
        keywords: String,
    },

    /// List sources and whether they are usable
    Sources,

    /// Write a default configuration file
    InitConfig {
        /// Where to write the file (default: ./keyword-harvester.toml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("keyword_harvester={}", env_filter)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let mut config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else {
        get_config().context("Failed to read KEYWORD_HARVESTER__* settings")?
    };

    if let Some(dir) = &cli.output_dir {
        config.export.directory = dir.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }

    match &cli.command {
        Commands::Reddit {
            keywords,
            client_id,
            client_secret,
            user_agent,
        } => {
            if let Some(id) = client_id {
                config.reddit.client_id = Some(id.clone());
            }
            if let Some(secret) = client_secret {
                config.reddit.client_secret = Some(secret.clone());
            }
            if let Some(agent) = user_agent {
                config.reddit.user_agent = Some(agent.clone());
            }
            config.validate()?;
            collect(&cli, &config, SourceKind::Reddit, keywords).await
        }
        Commands::Hackernews { keywords } => {
            config.validate()?;
            collect(&cli, &config, SourceKind::HackerNews, keywords).await
        }
        Commands::Sources => {
            list_sources(&config)?;
            Ok(())
        }
        Commands::InitConfig { path, force } => init_config(&config, path.clone(), *force),
    }
}

async fn collect(cli: &Cli, config: &Config, kind: SourceKind, keywords: &str) -> Result<()> {
    let registry = SourceRegistry::from_config(config)?;
    let source = match registry.get_required(kind.id()) {
        Ok(source) => source,
        Err(SourceError::MissingCredentials(fields)) => bail!(
            "Missing Reddit credentials: {}. Set REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET and \
             REDDIT_USER_AGENT, pass them as flags, or add them to the config file.",
            fields
        ),
        Err(e) => return Err(e.into()),
    };

    let spinner = Spinner::new(
        &format!("{} Collecting from {}", ui::source_icon(kind), kind),
        !cli.quiet,
    );
    let pipeline = CollectionPipeline::from_config(config);

    let outcome = match pipeline.run(&**source, keywords).await {
        Ok(outcome) => {
            spinner.finish_with_success(&format!(
                "Collected {} records from {} source(s)",
                ui::format_number(outcome.result_set.len()),
                outcome.sources.len()
            ));
            outcome
        }
        Err(e @ (PipelineError::NoValidSources | PipelineError::EmptyResult)) => {
            spinner.finish_with_error("Nothing collected");
            ui::print_status(Status::Warning, &capitalize(&e.to_string()));
            return Ok(());
        }
        Err(e) => {
            spinner.finish_with_error("Run failed");
            return Err(e.into());
        }
    };

    if !cli.quiet {
        for warning in &outcome.warnings {
            ui::print_status(Status::Warning, &warning.to_string());
        }
        if cli.preview > 0 {
            ui::print_section("Preview");
            ui::print_preview(&outcome.result_set, cli.preview);
        }
    }

    let exported = ExportSink::from_config(&config.export)
        .export(&outcome.result_set)
        .context("Failed to export results")?;

    if !cli.quiet {
        ui::print_section("Export");
    }
    ui::print_status(
        Status::Success,
        &format!(
            "{} ({}, {}, {} records)",
            exported.path.display(),
            exported.mime_type,
            ui::format_file_size(exported.bytes),
            ui::format_number(exported.records)
        ),
    );
    Ok(())
}

fn list_sources(config: &Config) -> Result<()> {
    let registry = SourceRegistry::from_config(config)?;

    for kind in [SourceKind::Reddit, SourceKind::HackerNews] {
        let icon = ui::source_icon(kind);
        match registry.get(kind.id()) {
            Some(source) => {
                ui::print_status(
                    Status::Success,
                    &format!("{} {} ({})", icon, source.name(), source.id()),
                );
                println!("    Capabilities: {}", source.capabilities().names().join(", "));
            }
            None => {
                let reason = registry.unavailable_reason(kind.id()).unwrap_or("not registered");
                ui::print_status(
                    Status::Warning,
                    &format!("{} {} ({}) unavailable, missing: {}", icon, kind, kind.id(), reason),
                );
            }
        }
    }
    Ok(())
}

fn init_config(config: &Config, path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path
        .or_else(|| default_config_paths().into_iter().next())
        .context("No configuration path available")?;

    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    config.save(&path)?;
    ui::print_status(
        Status::Success,
        &format!("Wrote configuration to {}", path.display()),
    );
    Ok(())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_reddit_defaults() {
        let cli = Cli::parse_from(["keyword-harvester", "reddit"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.preview, 5);
        assert!(cli.timeout.is_none());
        match cli.command {
            Commands::Reddit {
                keywords,
                client_id,
                ..
            } => {
                assert_eq!(keywords, DEFAULT_KEYWORDS);
                assert!(client_id.is_none());
            }
            other => panic!("Expected Reddit command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_reddit_credentials() {
        let cli = Cli::parse_from([
            "keyword-harvester",
            "reddit",
            "--keywords",
            "genai",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--user-agent",
            "harvester/0.1",
        ]);
        match cli.command {
            Commands::Reddit {
                keywords,
                client_id,
                client_secret,
                user_agent,
            } => {
                assert_eq!(keywords, "genai");
                assert_eq!(client_id.as_deref(), Some("id"));
                assert_eq!(client_secret.as_deref(), Some("secret"));
                assert_eq!(user_agent.as_deref(), Some("harvester/0.1"));
            }
            other => panic!("Expected Reddit command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_hackernews_alias_and_globals() {
        let cli = Cli::parse_from([
            "keyword-harvester",
            "hn",
            "-k",
            "ai, rust",
            "-vv",
            "--timeout",
            "60",
            "--output-dir",
            "/tmp/out",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.timeout, Some(60));
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
        assert!(matches!(cli.command, Commands::Hackernews { ref keywords } if keywords == "ai, rust"));
    }

    #[test]
    fn test_cli_init_config() {
        let cli = Cli::parse_from(["keyword-harvester", "init-config", "--force"]);
        assert!(matches!(
            cli.command,
            Commands::InitConfig {
                path: None,
                force: true
            }
        ));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("no relevant results"), "No relevant results");
        assert_eq!(capitalize(""), "");
    }
}
