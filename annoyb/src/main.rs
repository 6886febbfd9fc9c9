//! annoyb - check relationships and rate limits, then tweet at your targets

use anyhow::Context;
use clap::Parser;
use libannoyb::auth;
use libannoyb::config::{resolve_config_path, LogConfig};
use libannoyb::logging::LoggingConfig;
use libannoyb::{Config, Result, RunOptions, TwitterClient};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Commit the binary was built from, set by build.rs
const GIT_HASH: &str = match option_env!("ANNOYB_GIT_HASH") {
    Some(hash) => hash,
    None => "not found",
};

#[derive(Parser, Debug)]
#[command(name = "annoyb", version)]
#[command(about = "Slightly annoying twitter thing", long_about = None)]
struct Cli {
    /// Path to config file (defaults to config.json beside the executable)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run as daemon (not supported; the run happens once)
    #[arg(short, long)]
    daemon: bool,

    /// Message to post after the checks pass
    #[arg(short, long)]
    message: Option<String>,

    /// Compose the message but do not post it
    #[arg(long)]
    dry_run: bool,

    /// Report rate limits for every endpoint
    #[arg(long)]
    all_endpoints: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = resolve_config_path(cli.config.as_deref())
        .and_then(|path| Config::load_from_path(&path));

    let log_section = match &loaded {
        Ok(config) => config.log.clone(),
        Err(_) => LogConfig::default(),
    };
    let logging_ready = match init_logging(&log_section, cli.verbose) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Warning: {:#}", e);
            false
        }
    };

    let result = match loaded {
        Ok(config) => execute(&cli, &config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        if logging_ready {
            error!("{}", e);
        }
        // Log output only reaches the terminal when it goes to stderr
        if !logging_ready || log_section.file.is_some() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(e.exit_code());
    }
}

fn init_logging(section: &LogConfig, verbose: bool) -> anyhow::Result<()> {
    LoggingConfig::from_section(section, verbose)
        .init()
        .map_err(anyhow::Error::msg)
        .context("Failed to initialize logging")
}

async fn execute(cli: &Cli, config: &Config) -> Result<()> {
    info!("annoyb {} | git: {}", env!("CARGO_PKG_VERSION"), GIT_HASH);
    info!(
        "Launch command: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );

    if cli.daemon {
        warn!("Daemon mode is not supported, running once");
    }

    config.validate()?;

    let api = TwitterClient::new(config)?;

    if !config.has_access_token() {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        auth::bootstrap(&api, &mut input, &mut output).await?;
        return Ok(());
    }

    let options = RunOptions {
        message: cli.message.clone(),
        dry_run: cli.dry_run,
        all_endpoints: cli.all_endpoints,
    };
    libannoyb::run(config, &api, &options).await?;

    info!("Exiting normally");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_short_flags() {
        let cli = Cli::try_parse_from(["annoyb", "-c", "/tmp/c.json", "-d", "-m", "Cake"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
        assert!(cli.daemon);
        assert_eq!(cli.message.as_deref(), Some("Cake"));
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_git_hash_is_commit_or_placeholder() {
        let is_commit = matches!(GIT_HASH.len(), 40 | 64)
            && GIT_HASH.chars().all(|c| c.is_ascii_hexdigit());
        assert!(
            GIT_HASH == "not found" || is_commit,
            "unexpected git hash {:?}",
            GIT_HASH
        );
    }
}
