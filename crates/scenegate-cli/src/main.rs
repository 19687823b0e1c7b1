// crates/scenegate-cli/src/main.rs
// ============================================================================
// Module: Scene Gate CLI Entry Point
// Description: Command dispatcher for the Scene Gate gateway.
// Purpose: Start the gateway and inspect its configuration and tool surface.
// Dependencies: clap, scenegate-config, scenegate-contract, scenegate-mcp, tokio.
// ============================================================================

//! ## Overview
//! The Scene Gate CLI starts the gateway on stdio or loopback HTTP, validates
//! configuration files, prints a commented configuration example, and dumps
//! the canonical tool catalog. Stdout is reserved for protocol traffic when
//! serving over stdio, so every diagnostic goes to stderr.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use scenegate_config::EnvOverrides;
use scenegate_config::ScenegateConfig;
use scenegate_config::ServerTransport;
use scenegate_config::config_toml_example;
use scenegate_contract::tooling::tool_contracts;
use scenegate_contract::types::ToolContract;
use scenegate_mcp::McpServer;
use scenegate_mcp::McpServerError;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "scenegate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Scene Gate server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Tool surface utilities.
    Tools {
        /// Selected tools subcommand.
        #[command(subcommand)]
        command: ToolsCommand,
    },
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to scenegate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Transport override; takes precedence over file and environment.
    #[arg(long, value_enum, value_name = "TRANSPORT")]
    transport: Option<TransportArg>,
}

/// Transport selection accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TransportArg {
    /// JSON-RPC over stdin/stdout.
    Stdio,
    /// JSON-RPC and the HTTP facade on a loopback address.
    Http,
}

impl From<TransportArg> for ServerTransport {
    fn from(value: TransportArg) -> Self {
        match value {
            TransportArg::Stdio => Self::Stdio,
            TransportArg::Http => Self::Http,
        }
    }
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Scene Gate configuration file.
    Validate(ConfigValidateCommand),
    /// Print a commented configuration example.
    Example,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to scenegate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Tools subcommands.
#[derive(Subcommand, Debug)]
enum ToolsCommand {
    /// Print the tool catalog as canonical JSON.
    List,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("scenegate {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Tools {
            command,
        } => command_tools(&command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config.as_deref())?;
    if let Some(transport) = command.transport {
        config.server.transport = transport.into();
    }

    let server = tokio::task::spawn_blocking(move || McpServer::from_config(config))
        .await
        .map_err(|err| CliError::new(format!("server init failed: init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    server
        .serve()
        .await
        .map_err(|err: McpServerError| CliError::new(format!("server failed: {err}")))?;

    Ok(ExitCode::SUCCESS)
}

/// Loads configuration with environment overrides applied and validated.
fn load_config(path: Option<&Path>) -> CliResult<ScenegateConfig> {
    let overrides = EnvOverrides::from_env()
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    ScenegateConfig::load_with_overrides(path, &overrides)
        .map_err(|err| CliError::new(format!("config load failed: {err}")))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => command_config_example(),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    write_stdout_line(&validate_summary(&config))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Renders the one-line summary printed after successful validation.
fn validate_summary(config: &ScenegateConfig) -> String {
    let transport = config.server.transport.as_str();
    match config.server.transport {
        ServerTransport::Stdio => format!("config ok (transport {transport})"),
        ServerTransport::Http => {
            format!("config ok (transport {transport}, bind {})", config.server.effective_bind())
        }
    }
}

/// Prints the configuration example.
fn command_config_example() -> CliResult<ExitCode> {
    write_stdout_bytes(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Tools Commands
// ============================================================================

/// Dispatches tools subcommands.
fn command_tools(command: &ToolsCommand) -> CliResult<ExitCode> {
    match command {
        ToolsCommand::List => {
            let bytes = render_tool_catalog(&tool_contracts())?;
            write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Serializes tool contracts to canonical JSON with a trailing newline.
fn render_tool_catalog(contracts: &[ToolContract]) -> CliResult<Vec<u8>> {
    let mut bytes = serde_jcs::to_vec(contracts)
        .map_err(|err| CliError::new(format!("tool catalog serialization failed: {err}")))?;
    bytes.push(b'\n');
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
