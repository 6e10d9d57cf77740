mod collect;
mod prompt;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mktscrape_core::{
    load_variation_rules, AppConfig, ContactsRunConfig, DirectoryRunConfig, RedditRunConfig,
    TrustpilotRunConfig, VariationRules,
};

#[derive(Debug, Parser)]
#[command(name = "mktscrape")]
#[command(about = "Incremental market-research scraper for Reddit, TrustPilot, and contact info")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect Reddit comments and/or submissions through PullPush
    Reddit {
        /// Run config (defaults to config/reddit.json)
        config: Option<PathBuf>,

        /// Ask for source, limit, paths, and direction before running
        #[arg(long)]
        interactive: bool,
    },
    /// Collect TrustPilot reviews, newest first
    Trustpilot {
        /// Run config (defaults to config/trustpilot.json)
        config: Option<PathBuf>,
    },
    /// Look up emails, phones, and addresses for each website
    Contacts {
        /// Run config (defaults to config/contacts.json)
        config: Option<PathBuf>,
    },
    /// Scrape member website links from a directory listing page
    Directory {
        /// Run config (defaults to config/directory.json)
        config: Option<PathBuf>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Reddit { .. } => "reddit",
            Self::Trustpilot { .. } => "trustpilot",
            Self::Contacts { .. } => "contacts",
            Self::Directory { .. } => "directory",
        }
    }

    fn config_path(&self) -> PathBuf {
        let explicit = match self {
            Self::Reddit { config, .. }
            | Self::Trustpilot { config }
            | Self::Contacts { config }
            | Self::Directory { config } => config.clone(),
        };
        explicit.unwrap_or_else(|| default_config_path(self.name()))
    }
}

fn default_config_path(command: &str) -> PathBuf {
    Path::new("config").join(format!("{command}.json"))
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

fn variation_rules(config: &AppConfig) -> anyhow::Result<VariationRules> {
    Ok(match &config.aliases_path {
        Some(path) => load_variation_rules(path)?,
        None => VariationRules::builtin(),
    })
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = mktscrape_core::load_app_config()?;
    init_tracing(&config)?;
    let rules = variation_rules(&config)?;

    let config_path = cli.command.config_path();
    tracing::info!(command = cli.command.name(), config = %config_path.display(), "starting");

    match cli.command {
        Commands::Reddit { interactive, .. } => {
            let mut run_config = RedditRunConfig::load(&config_path)?;
            if interactive {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                run_config =
                    prompt::customize_reddit(run_config, &mut stdin.lock(), &mut stdout.lock())?;
            }
            collect::reddit::run(&config, &run_config, &rules).await
        }
        Commands::Trustpilot { .. } => {
            let run_config = TrustpilotRunConfig::load(&config_path)?;
            collect::trustpilot::run(&config, &run_config, &rules).await
        }
        Commands::Contacts { .. } => {
            let run_config = ContactsRunConfig::load(&config_path)?;
            collect::contacts::run(&config, &run_config, &rules).await
        }
        Commands::Directory { .. } => {
            let run_config = DirectoryRunConfig::load(&config_path)?;
            collect::directory::run(&config, &run_config).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let result = run(cli).await;
    println!("[done] Execution complete.");
    result
}
