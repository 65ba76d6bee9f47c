//! Binary entry point for the ctxize CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Add `ctx context.Context` to store.DB.Get and pass it from every caller
//! ctxize example.com/app/store.DB.Get ./...
//!
//! # Preview as a unified diff
//! ctxize --dry-run example.com/app/store.DB.Get ./server
//!
//! # Thread a different variable
//! ctxize --var 'log example.com/app/logging.Logger = logging.Default()' \
//!     example.com/app/store.Open ./cmd/...
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use ctxize::cli::{default_gopath, run_ctxize, RewriteOptions};
use ctxize_core::error::{CtxizeError, OutputErrorCode};
use ctxize_core::output::{emit_response, ErrorResponse, RewriteResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Add a context parameter to a Go function and pass it at every call.
///
/// FUNC is `<package>.<name>` or `<package>.<type>.<name>`. PKG patterns name
/// the packages whose calls are rewritten, as import paths, relative
/// directories, or either followed by `/...`.
#[derive(Parser, Debug)]
#[command(name = "ctxize", version)]
struct Cli {
    /// Function or method to rewrite.
    func: String,

    /// Packages whose calls are rewritten.
    packages: Vec<String>,

    /// Variable to thread: `<name> <path>.<type> = <init expression>`.
    #[arg(long = "var", default_value = "ctx context.Context = context.TODO()")]
    var: String,

    /// Working directory (default: current directory).
    #[arg(long)]
    dir: Option<PathBuf>,

    /// GOPATH entry; may be repeated (default: $GOPATH, else $HOME/go).
    #[arg(long)]
    gopath: Vec<PathBuf>,

    /// Do not load `_test.go` files.
    #[arg(long)]
    no_tests: bool,

    /// Print a unified diff instead of writing files.
    #[arg(long)]
    dry_run: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log level for tracing output.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log every declaration and call site rewritten.
    #[arg(long)]
    debug: bool,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Written files, or the unified diff with `--dry-run` (default).
    #[default]
    Text,
    /// Full JSON response.
    Json,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    // --debug output is logged at debug level.
    let level = if cli.debug {
        LogLevel::Debug
    } else {
        cli.log_level
    };
    init_tracing(level, cli.format);

    let format = cli.format;
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            match format {
                OutputFormat::Json => {
                    // Errors go to stdout as JSON
                    let _ = emit_response(&ErrorResponse::from_error(&err), &mut io::stdout());
                    let _ = io::stdout().flush();
                }
                OutputFormat::Text => eprintln!("ctxize: {}", err),
            }
            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber. `RUST_LOG` overrides `--log-level`.
///
/// With `--format json` log records are written as JSON lines too, so
/// stderr stays machine-readable alongside the JSON response on stdout.
fn init_tracing(level: LogLevel, format: OutputFormat) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    match format {
        OutputFormat::Json => builder.json().init(),
        OutputFormat::Text => builder.init(),
    }
}

fn execute(cli: Cli) -> Result<(), CtxizeError> {
    let dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()
            .map_err(|e| CtxizeError::internal(format!("cannot get current directory: {}", e)))?,
    };
    let options = RewriteOptions {
        dir,
        gopath: if cli.gopath.is_empty() {
            default_gopath()
        } else {
            cli.gopath
        },
        var: Some(cli.var),
        tests: !cli.no_tests,
        dry_run: cli.dry_run,
        debug: cli.debug,
    };
    let response = run_ctxize(&options, &cli.func, &cli.packages)?;
    match cli.format {
        OutputFormat::Json => emit_response(&response, &mut io::stdout())?,
        OutputFormat::Text => print_text(&response)?,
    }
    io::stdout().flush()?;
    Ok(())
}

fn print_text(response: &RewriteResponse) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if response.files.is_empty() {
        writeln!(out, "No changes.")?;
        return Ok(());
    }
    for file in &response.files {
        match &file.diff {
            Some(diff) => write!(out, "{}", diff)?,
            None => writeln!(out, "{}", file.path)?,
        }
    }
    Ok(())
}
