use anyhow::{Context, Result};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::future::Future;
use std::io;
use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use yeet_provider::resource::{self, dispatch, Operation};
use yeet_provider::ProviderSettings;

/// Provider plugin for yeet hosts
///
/// Reads resource configuration or state as JSON (file or stdin) and
/// writes the resulting state as JSON to stdout.
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-yeet", version, about, long_about = None)]
struct Args {
    /// Provider configuration block (JSON file)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API key (falls back to the config file, then YEET_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Host URL for the yeet API
    #[arg(long, global = true)]
    host: Option<String>,

    /// Skip TLS verification (`--insecure=false` overrides the config file)
    #[arg(
        long,
        global = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    insecure: Option<bool>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the provider and resource schemas
    Schema,
    /// Create a resource from its configuration
    Create(OperationArgs),
    /// Refresh a resource from its state
    Read(OperationArgs),
    /// Destroy a resource
    Delete {
        #[command(flatten)]
        args: OperationArgs,

        /// Abort the prune call after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[derive(ClapArgs, Debug)]
struct OperationArgs {
    /// Resource type
    #[arg(short = 't', long = "type", default_value = "yeet_host")]
    resource_type: String,

    /// Input JSON file ("-" or omitted for stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Logs go to a file; stdout carries state.
fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("terraform-provider-yeet started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("yeet").join("provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".yeet").join("provider.log");
    }
    PathBuf::from("terraform-provider-yeet.log")
}

/// Provider block: config file, then flags on top
fn load_settings(args: &Args) -> Result<ProviderSettings> {
    let file = match &args.config {
        Some(path) => ProviderSettings::load(path)?,
        None => ProviderSettings::default(),
    };

    let flags = ProviderSettings {
        api_key: args.api_key.clone(),
        host: args.host.clone(),
        insecure: args.insecure,
    };

    Ok(file.merge(flags))
}

fn read_input(path: Option<&Path>) -> Result<Value> {
    let content = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&content).context("Input is not valid JSON")
}

/// Run `fut` until it finishes, `cancel` resolves `Ok`, or the deadline
/// passes. Dropping the future aborts any request in flight. A `cancel`
/// that fails (no signal handler) is ignored.
async fn run_cancellable<F, C>(fut: F, cancel: C, timeout: Option<Duration>) -> Result<Value>
where
    F: Future<Output = yeet_provider::Result<Value>>,
    C: Future<Output = io::Result<()>>,
{
    let deadline = async {
        match timeout {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = fut => Ok(result?),
        Ok(()) = cancel => {
            tracing::warn!("Interrupted, operation cancelled");
            Err(anyhow::anyhow!("operation cancelled; resource left unchanged"))
        }
        _ = deadline => {
            tracing::warn!("Operation exceeded deadline");
            Err(anyhow::anyhow!("operation timed out; resource left unchanged"))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let (op, op_args, timeout) = match &args.command {
        Command::Schema => {
            let schema = serde_json::to_string_pretty(resource::get_schema())?;
            println!("{}", schema);
            return Ok(());
        }
        Command::Create(op_args) => (Operation::Create, op_args, None),
        Command::Read(op_args) => (Operation::Read, op_args, None),
        Command::Delete { args: op_args, timeout } => {
            (Operation::Delete, op_args, (*timeout).map(Duration::from_secs))
        }
    };

    let settings = load_settings(&args)?;
    tracing::debug!("Provider settings: {:?}", settings);
    let client = settings.resolve().context("Failed to configure provider")?;

    let input = read_input(op_args.input.as_deref())?;

    let state = run_cancellable(
        dispatch::invoke(&op_args.resource_type, op, &client, &input),
        tokio::signal::ctrl_c(),
        timeout,
    )
    .await
    .with_context(|| format!("{} {} failed", op, op_args.resource_type))?;

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    run(args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use yeet_provider::ProviderError;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("arguments should parse")
    }

    fn config_file(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("yeet-cli-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_insecure_flag_forms() {
        assert_eq!(parse(&["prog", "schema"]).insecure, None);
        assert_eq!(parse(&["prog", "--insecure", "schema"]).insecure, Some(true));
        assert_eq!(parse(&["prog", "--insecure=false", "schema"]).insecure, Some(false));
        assert_eq!(parse(&["prog", "schema", "--insecure=true"]).insecure, Some(true));
    }

    #[test]
    fn test_cli_can_turn_off_insecure_from_config() {
        let path = config_file(r#"{"api_key":"abc","insecure":true}"#);
        let config = path.to_string_lossy().to_string();

        let args = parse(&["prog", "--config", &config, "--insecure=false", "read"]);
        let settings = load_settings(&args).unwrap();
        assert_eq!(settings.insecure, Some(false));

        let args = parse(&["prog", "--config", &config, "read"]);
        let settings = load_settings(&args).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings.insecure, Some(true));
    }

    #[test]
    fn test_cli_flags_override_config_file() {
        let path = config_file(r#"{"api_key":"file-key","host":"https://file.test"}"#);
        let config = path.to_string_lossy().to_string();

        let args = parse(&["prog", "-c", &config, "--host", "https://flag.test", "delete"]);
        let settings = load_settings(&args).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.api_key.as_deref(), Some("file-key"));
        assert_eq!(settings.host.as_deref(), Some("https://flag.test"));
        assert_eq!(settings.insecure, None);
    }

    #[tokio::test]
    async fn test_failed_signal_handler_does_not_cancel() {
        let op = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, ProviderError>(serde_json::json!({"id": "k"}))
        };
        let cancel = async { Err(io::Error::other("signal handler unavailable")) };

        let state = run_cancellable(op, cancel, None).await.unwrap();
        assert_eq!(state["id"], "k");
    }

    #[tokio::test]
    async fn test_cancel_aborts_operation() {
        let op = std::future::pending::<yeet_provider::Result<Value>>();
        let cancel = async { Ok(()) };

        let err = run_cancellable(op, cancel, None).await.unwrap_err();
        assert!(err.to_string().contains("cancelled"));
    }

    #[tokio::test]
    async fn test_deadline_aborts_operation() {
        let op = std::future::pending::<yeet_provider::Result<Value>>();
        let cancel = std::future::pending::<io::Result<()>>();

        let err = run_cancellable(op, cancel, Some(Duration::from_millis(10)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_operation_error_propagates() {
        let op = async { Err::<Value, _>(ProviderError::EmptyId) };
        let cancel = std::future::pending::<io::Result<()>>();

        let err = run_cancellable(op, cancel, None).await.unwrap_err();
        assert_eq!(err.to_string(), "resource ID is empty");
    }
}
