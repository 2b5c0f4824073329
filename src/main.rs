use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use petstore_config::{HarnessConfig, PetProperties};
use std::path::PathBuf;

/// Deploy the pet store stack onto a local cloud emulator and verify it
#[derive(Parser)]
#[command(name = "petstore-stack")]
#[command(version)]
#[command(about = "Deploy the pet store stack onto a local cloud emulator and verify it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Use a running emulator instead of starting a container
    #[arg(short, long, value_name = "URL", global = true)]
    endpoint: Option<String>,

    /// CloudFormation stack name (overrides config file)
    #[arg(long, value_name = "NAME", global = true)]
    stack_name: Option<String>,

    /// Maximum number of status polls before timing out
    #[arg(long, value_name = "N", global = true)]
    max_attempts: Option<u32>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy, wait, verify and tear down (default if no subcommand given)
    Run,
    /// Create the stack and wait for it to complete
    Deploy,
    /// Check that the function and a REST API exist
    Verify,
    /// Delete the stack (best effort)
    Teardown,
    /// Print the resolved configuration as JSON
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => HarnessConfig::load().context("Failed to load configuration")?,
    };
    apply_cli_overrides(&mut config, &cli);
    petstore_stack::prepare(&config)?;

    if let Some(Commands::Config) = cli.command {
        let pets = PetProperties::from_env();
        println!("{}", petstore_stack::describe_config(&config, &pets)?);
        return Ok(());
    }

    display_startup_info(&config);

    // Calls are strictly sequential; one thread is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    match cli.command {
        Some(Commands::Deploy) => runtime.block_on(petstore_stack::deploy(&config)),
        Some(Commands::Verify) => runtime.block_on(petstore_stack::verify(&config)),
        Some(Commands::Teardown) => runtime.block_on(petstore_stack::teardown(&config)),
        Some(Commands::Run) | Some(Commands::Config) | None => {
            runtime.block_on(petstore_stack::run(&config))
        }
    }
}

fn apply_cli_overrides(config: &mut HarnessConfig, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint {
        config.emulator.endpoint = Some(endpoint.clone());
    }
    if let Some(name) = &cli.stack_name {
        config.stack.name = name.clone();
    }
    if let Some(attempts) = cli.max_attempts {
        config.poll.max_attempts = attempts;
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
}

fn display_startup_info(config: &HarnessConfig) {
    use tracing::info;

    info!("╭─────────────────────────────────────────────────");
    info!("│ petstore-stack v{}", env!("CARGO_PKG_VERSION"));
    info!("├─────────────────────────────────────────────────");
    info!("│ Stack: {}", config.stack.name);
    info!("│ Template: {}", config.stack.template_path.display());
    match &config.emulator.endpoint {
        Some(endpoint) => info!("│ Emulator: {}", endpoint),
        None => info!(
            "│ Emulator: {}:{} (container)",
            config.emulator.image, config.emulator.tag
        ),
    }
    info!("│ Region: {}", config.emulator.region);
    info!(
        "│ Polling: {} attempts, {}s apart",
        config.poll.max_attempts, config.poll.interval_secs
    );
    info!("│ Expected function: {}", config.stack.expected_function);
    info!("╰─────────────────────────────────────────────────");
}
