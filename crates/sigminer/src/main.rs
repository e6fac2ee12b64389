use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde_json::json;
use sigminer_core::query::{SignatureQuery, UnknownTypePolicy};
use sigminer_core::symbols::BinaryImage;
use sigminer_core::types::{SignatureResult, SourceLocation};
use sigminer_utils::{debug, init_logging_from, LogFormat, LogLevel, LoggingConfig, LoggingGuard};

/// Canonical function signatures from DWARF debug information.
#[derive(Parser, Debug)]
#[command(name = "sigminer")]
#[command(version)]
#[command(about = "Print canonical function signatures for symbols in shared objects", long_about = None)]
struct Cli
{
    #[command(subcommand)]
    command: Commands,

    /// Log level (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format: pretty or json (overrides SIGMINER_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Print the signature of one or more symbols
    Signature
    {
        /// Shared object or executable with DWARF debug information
        binary: PathBuf,
        /// Symbol names (raw, or demangled Rust paths)
        #[arg(required = true)]
        symbols: Vec<String>,
        /// Fail on any parameter or return type that cannot be classified
        #[arg(long, default_value_t = false)]
        strict: bool,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the defined function symbols of a binary
    Symbols
    {
        /// Shared object or executable
        binary: PathBuf,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main()
{
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    let succeeded = match cli.command {
        Commands::Signature {
            binary,
            symbols,
            strict,
            json,
        } => run_signature(&binary, &symbols, strict, json),
        Commands::Symbols { binary, json } => run_symbols(&binary, json),
    };

    if !succeeded {
        process::exit(1);
    }
}

fn setup_logging(cli: &Cli) -> Result<LoggingGuard, sigminer_utils::LoggingError>
{
    let mut config = LoggingConfig::from_env()?;
    if let Some(level) = cli.log_level {
        config = config.with_level(level);
    }
    if let Some(format) = cli.log_format {
        config = config.with_format(format);
    }
    init_logging_from(config)
}

/// Returns `true` if every symbol produced a signature.
fn run_signature(binary: &Path, symbols: &[String], strict: bool, as_json: bool) -> bool
{
    let policy = if strict {
        UnknownTypePolicy::Strict
    } else {
        UnknownTypePolicy::Degrade
    };
    let query = SignatureQuery::new().unknown_types(policy);

    // A binary that cannot be opened fails every symbol the same way.
    let image = match BinaryImage::open(binary) {
        Ok(image) => Some(image),
        Err(e) => {
            eprintln!("Error: {}", e);
            None
        }
    };

    let mut all_ok = true;
    let mut reports = Vec::new();
    for symbol in symbols {
        let (result, location) = match &image {
            Some(image) => {
                let result = query.run_on(image, symbol);
                let location = if result.is_success() {
                    image
                        .find_symbol(symbol)
                        .and_then(|found| image.source_location(found.address()))
                } else {
                    None
                };
                (result, location)
            }
            None => {
                let result = query.run(binary, symbol);
                (result, None)
            }
        };
        debug!(symbol = %symbol, code = %result.ret_code(), "query finished");
        all_ok &= result.is_success();

        if as_json {
            reports.push(json!({
                "symbol": symbol,
                "ret_code": result.ret_code(),
                "signature": result.signature(),
                "location": location,
            }));
        } else {
            print_result(symbol, &result, location.as_ref());
        }
    }

    if as_json {
        match serde_json::to_string_pretty(&reports) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                return false;
            }
        }
    }
    all_ok
}

fn print_result(symbol: &str, result: &SignatureResult, location: Option<&SourceLocation>)
{
    match result.signature() {
        Some(sig) => match location {
            Some(location) => println!("{symbol}: {sig}  [{location}]"),
            None => println!("{symbol}: {sig}"),
        },
        None => println!("{symbol}: {}", result.ret_code()),
    }
}

fn run_symbols(binary: &Path, as_json: bool) -> bool
{
    let image = match BinaryImage::open(binary) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            return false;
        }
    };

    if as_json {
        return match serde_json::to_string_pretty(image.symbols()) {
            Ok(text) => {
                println!("{text}");
                true
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                false
            }
        };
    }

    println!("{} ({}, debug info: {})", image.path().display(), image.architecture(), image.has_debug_info());
    for symbol in image.symbols() {
        println!(
            "  {}  {:>6}  {:<4}  {}",
            symbol.address(),
            symbol.size(),
            symbol.name().language().as_str(),
            symbol.name()
        );
    }
    true
}
