use clap::{Parser, Subcommand};
use std::sync::Arc;

use carik_admin::application::errors::BotError;
use carik_admin::application::messaging::MessageParser;
use carik_admin::application::services::{
    BatchRunner, CommandService, NameLocks, PluginLifecycleManager, ScopeBindingManager,
};
use carik_admin::domain::traits::Bot;
use carik_admin::infrastructure::adapters::ConsoleAdapter;
use carik_admin::infrastructure::config::Config;
use carik_admin::infrastructure::host::InMemoryPluginHost;
use carik_admin::infrastructure::metadata::PackageMetadata;
use carik_admin::infrastructure::storage::InMemoryProfileStore;

#[derive(Parser)]
#[command(name = "carik-admin")]
#[command(about = "Plugin administration console for carik-bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the admin console
    Run {
        /// Treat console input as sent in this group
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { group } => {
            if let Err(e) = run_admin(&cli.config, group) {
                tracing::error!("carik-admin stopped: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("carik-admin v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config(&cli.config);
        }
    }
}

fn load_config(config_path: &str) -> Config {
    if !std::path::Path::new(config_path).exists() {
        tracing::info!("No config at {}, using defaults", config_path);
        return Config::load_env();
    }

    let mut config = Config::load(config_path).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}, using defaults", e);
        Config::default()
    });
    config.apply_env();
    config
}

fn run_admin(config_path: &str, group_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path);
    config.validate()?;

    tracing::info!("Starting carik-admin for {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_console(config, group_override))
}

async fn run_console(config: Config, group_override: Option<String>) -> Result<(), BotError> {
    let host = Arc::new(InMemoryPluginHost::new(config.plugins.catalog.clone(), config.teardown_delay()));
    let runner = BatchRunner::new(Arc::new(NameLocks::new()), config.transition_timeout());

    let lifecycle = PluginLifecycleManager::new(host.clone(), runner.clone());
    let report = lifecycle.mount(&config.plugins.auto_mount).await?;
    for (name, outcome) in report.iter() {
        tracing::info!("Auto-mount {}: {}", name, outcome.message);
    }

    let profile = InMemoryProfileStore::new(config.bot.uin.clone(), host.clone(), config.admin.default_apply);
    let scope = ScopeBindingManager::new(runner);

    let mut commands = CommandService::new(&config.bot.prefix, lifecycle, scope, PackageMetadata::current());
    commands.register_defaults();
    let parser = MessageParser::new(commands.prefix());

    let group = group_override.or_else(|| config.console_group());
    if let Some(group_id) = &group {
        profile.join_group(group_id.clone()).await;
        tracing::info!("Console input is treated as group {}", group_id);
    }

    let bot = ConsoleAdapter::new(&config.bot.name, &config.bot.uin);
    bot.start().await?;
    println!("Type commands like `{}mount rss`, `{}help` for the list, `exit` to quit.", commands.prefix(), commands.prefix());

    while let Some(line) = bot.read_line().await? {
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let message = parser
            .parse("console", line, group.clone())
            .with_platform("console");

        let response = match commands.handle(&bot, &profile, &message).await {
            Ok(Some(response)) => response,
            Ok(None) => continue,
            Err(e) => format!("Error: {}", e),
        };

        if let Err(e) = bot.send_message(&message.chat_id, &response).await {
            tracing::error!("Failed to send message: {}", e);
        }
    }

    tracing::info!("Console closed");
    Ok(())
}

fn init_config(path: &str) {
    if std::path::Path::new(path).exists() {
        println!("{} already exists, leaving it untouched", path);
        return;
    }

    let yaml = match Config::default().to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("Failed to render default config: {}", e);
            return;
        }
    };

    match std::fs::write(path, yaml) {
        Ok(()) => println!("Wrote default config to {}", path),
        Err(e) => eprintln!("Failed to write {}: {}", path, e),
    }
}
