//! Command line argument parsing for HostGate.
//!
//! This module defines the CLI interface using [`clap`] for argument parsing.
//! It provides configuration for the binding address, listen port, connection
//! cap, and output verbosity. The whitelist and pipeline tuning come from
//! environment variables instead, so the flags stay short.
//!
//! # Example
//!
//! ```no_run
//! use hostgate::args::Args;
//! use clap::Parser;
//!
//! let args = Args::parse();
//! if let Err(e) = args.validate() {
//!     eprintln!("Configuration error: {}", e);
//!     std::process::exit(1);
//! }
//! ```

use clap::Parser;

/// Command line arguments for HostGate.
///
/// This struct defines all CLI options available for configuring the proxy.
/// The allowed host patterns and pipeline settings are read from
/// environment variables (see `--help` output).
///
/// # Fields
///
/// * `bind` - Address to bind the listener to (default: "0.0.0.0")
/// * `listen` - Port to listen on for incoming requests
/// * `max_connections` - Cap on concurrent connections (0 = unlimited)
/// * `verbose` - Enable detailed configuration output
/// * `quiet` - Suppress non-essential output (conflicts with verbose)
/// * `json_logs` - Output logs in JSON format for structured logging
///
/// # Example
///
/// ```no_run
/// use hostgate::args::Args;
/// use clap::Parser;
///
/// // Parse from command line
/// let args = Args::parse();
///
/// println!("Listening on {}:{}", args.bind, args.listen);
/// ```
#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(
    long_about = "🚪 \"Name your destination\" - A host-whitelisting gate for outbound HTTP\nForwards /<host>/<path> to https://<host>/<path> when the host is on your list\n\nExample usage:\n  ALLOWED_HOSTS=api.github.com hostgate --listen 8080\n  ALLOWED_HOSTS='*.openai.com' hostgate -l 8080 --verbose"
)]
#[command(
    after_help = "Environment variables:\n  ALLOWED_HOSTS          Comma-separated allowed host patterns (required; * matches one label)\n  RATE_LIMIT_REQUESTS    Max requests per client per window (default: 100)\n  RATE_LIMIT_WINDOW_MS   Rate limit window in milliseconds (default: 60000)\n  PROXY_TIMEOUT_MS       Upstream timeout in milliseconds (default: 30000)\n\nFor more configuration options, see https://crates.io/crates/hostgate"
)]
pub struct Args {
    /// Address to bind the listener to
    #[arg(
        long,
        short = 'b',
        help = "Bind address for the listener",
        value_name = "ADDRESS",
        default_value = "0.0.0.0"
    )]
    pub bind: String,

    /// Port to listen on for incoming requests
    #[arg(
        long,
        short = 'l',
        help = "Listen port for incoming connections",
        value_name = "PORT"
    )]
    pub listen: u16,

    /// Maximum number of concurrent connections (0 = unlimited)
    #[arg(
        long,
        short = 'c',
        help = "Cap on concurrent connections, 0 disables the cap",
        value_name = "COUNT",
        default_value_t = hostgate_core::defaults::MAX_CONNECTIONS
    )]
    pub max_connections: usize,

    /// Enable verbose output
    #[arg(
        long,
        short = 'v',
        help = "Show detailed configuration and startup information"
    )]
    pub verbose: bool,

    /// Enable quiet mode (minimal output)
    #[arg(
        long,
        short = 'q',
        help = "Suppress configuration output, show only essential messages",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output logs in JSON format (for structured logging)
    #[arg(long, help = "Output logs in JSON format for structured logging")]
    pub json_logs: bool,
}

impl Args {
    /// Validates the parsed command line arguments.
    ///
    /// Performs the following validations:
    /// - Listen port must be greater than 0
    /// - Bind address must be a valid IP address
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If all arguments are valid
    /// * `Err(String)` - A descriptive error message if validation fails
    ///
    /// # Example
    ///
    /// ```
    /// use hostgate::args::Args;
    /// use clap::Parser;
    ///
    /// // Port 0 is reserved
    /// let args = Args::try_parse_from(["hostgate", "-l", "0"]).unwrap();
    /// assert!(args.validate().is_err());
    ///
    /// // Valid configuration
    /// let args = Args::try_parse_from(["hostgate", "-l", "8080"]).unwrap();
    /// assert!(args.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if self.listen == 0 {
            return Err("Listen port must be greater than 0".to_string());
        }

        // Validate bind address format
        if self.bind.parse::<std::net::IpAddr>().is_err() {
            return Err(format!("Invalid bind address: '{}'", self.bind));
        }

        Ok(())
    }
}
