//! Run configuration and CLI argument parsing
//!
//! Everything the benchmark run needs is resolved here, through:
//! - Command-line arguments
//! - Environment variables (with VOLLEY_ prefix)
//!
//! # Configuration Priority
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Default values (lowest priority)
//!
//! Worker count and calls-per-worker are compiled in, not configurable:
//! runs are only comparable when every invocation issues the same amount
//! of work.
//!
//! # Example Usage
//!
//! ```bash
//! # Default codec against the default address
//! volley
//!
//! # Compact codec against a remote server, over TLS
//! volley -P compact --addr bench-target:9090 --secure
//!
//! # Using environment variables
//! export VOLLEY_PROTOCOL=json
//! export VOLLEY_ADDR=bench-target:9090
//! volley
//! ```

use anyhow::{Result, anyhow};
use clap::Parser;
use volley_wire::CodecKind;

/// Workers spawned per run.
pub const DEFAULT_WORKERS: usize = 1024;
/// Sequential calls each worker performs.
pub const DEFAULT_CALLS_PER_WORKER: usize = 10_000;

/// Command-line arguments for the load generator
///
/// All arguments can also be set via environment variables with the
/// VOLLEY_ prefix. CLI arguments take precedence over environment variables.
#[derive(Parser, Debug)]
#[command(
    name = "volley",
    about = "Concurrent RPC load generator",
    long_about = "Fires a fixed volume of blocking ping calls at an RPC server from many concurrent workers, then reports elapsed time and throughput.\n\nEnvironment variables with VOLLEY_ prefix are supported. CLI arguments take precedence over environment variables."
)]
pub struct Args {
    #[arg(
        short = 'P',
        long,
        value_name = "NAME",
        help = "Wire codec: binary, compact, json, simplejson",
        default_value = "binary",
        env = "VOLLEY_PROTOCOL"
    )]
    pub protocol: String,
    #[arg(
        long,
        value_name = "HOST:PORT",
        help = "Server address to connect to",
        default_value = "localhost:9090",
        env = "VOLLEY_ADDR"
    )]
    pub addr: String,
    #[arg(
        long,
        help = "Connect over TLS (certificate verification disabled)",
        env = "VOLLEY_SECURE"
    )]
    pub secure: bool,
    #[arg(
        long,
        value_name = "LEVEL",
        help = "Log level: error, warn, info, debug, trace",
        default_value = "info",
        env = "VOLLEY_LOG_LEVEL"
    )]
    pub log_level: String,

    // Utility options
    #[arg(
        long,
        help = "List all environment variables and exit",
        action = clap::ArgAction::SetTrue
    )]
    pub list_env_vars: bool,
}

/// Resolved configuration for one benchmark run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Concurrent workers to spawn
    pub workers: usize,
    /// Sequential calls each worker performs
    pub calls_per_worker: usize,
    /// Server address (host:port)
    pub addr: String,
    /// Wire codec used by every worker
    pub protocol: CodecKind,
    /// Connect over TLS with certificate verification disabled
    pub secure: bool,
    /// Write and read buffer size per connection
    pub buffer_size: usize,
    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl RunConfig {
    /// Build configuration from environment variables and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the codec name is not recognized or the
    /// configuration fails validation.
    pub fn from_env_and_args() -> Result<Self> {
        // Clap resolves precedence: CLI arguments, then environment
        // variables, then defaults
        let args = Args::parse();

        // Handle --list-env-vars
        if args.list_env_vars {
            Self::print_env_vars();
            std::process::exit(0);
        }

        Self::from_args(args)
    }

    /// Build configuration from already-parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let config = RunConfig {
            workers: DEFAULT_WORKERS,
            calls_per_worker: DEFAULT_CALLS_PER_WORKER,
            addr: args.addr,
            protocol: args.protocol.parse::<CodecKind>()?,
            secure: args.secure,
            buffer_size: volley_wire::DEFAULT_BUFFER_SIZE,
            log_level: args.log_level,
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow!("worker count must be greater than zero"));
        }
        if self.calls_per_worker == 0 {
            return Err(anyhow!("calls per worker must be greater than zero"));
        }
        if self.buffer_size == 0 {
            return Err(anyhow!("buffer size must be greater than zero"));
        }
        if self.addr.is_empty() {
            return Err(anyhow!("server address must not be empty"));
        }

        Ok(())
    }

    /// Print all available environment variables and their descriptions
    fn print_env_vars() {
        println!("Volley Environment Variables");
        println!("============================");
        println!();
        println!("All environment variables use the VOLLEY_ prefix.");
        println!("CLI arguments take precedence over environment variables.");
        println!();
        println!(
            "  VOLLEY_PROTOCOL=<name>   Wire codec: binary, compact, json, simplejson [default: binary]"
        );
        println!("  VOLLEY_ADDR=<host:port>  Server address [default: localhost:9090]");
        println!("  VOLLEY_SECURE=true|false Connect over TLS [default: false]");
        println!(
            "  VOLLEY_LOG_LEVEL=<level> Log level: error, warn, info, debug, trace [default: info]"
        );
        println!();
        println!("Examples:");
        println!("  # Compact codec against a remote server");
        println!("  export VOLLEY_PROTOCOL=compact");
        println!("  export VOLLEY_ADDR=bench-target:9090");
        println!("  volley");
    }
}
