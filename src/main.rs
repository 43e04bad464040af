use clap::Parser;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use hostgate::args::Args;
use hostgate::config;
use hostgate::connection::ConnectionLimiter;
use hostgate::server;
use hostgate::{RateLimiter, Whitelist, build_http_client, handle_request};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the level; otherwise `--quiet` selects errors only,
/// `--verbose` selects debug, and the default is info.
fn init_tracing(args: &Args) {
    let default_level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(err) = args.validate() {
        eprintln!("❌ Configuration error: {err}");
        std::process::exit(1);
    }

    init_tracing(&args);

    let settings = config::get_proxy_settings();

    // An empty or invalid whitelist refuses to start: a proxy with nothing
    // allowed (or the wrong things allowed) is a misconfiguration.
    let whitelist = match Whitelist::compile(config::get_allowed_host_patterns()) {
        Ok(whitelist) => Arc::new(whitelist),
        Err(err) => {
            eprintln!("❌ Whitelist error: {err}");
            eprintln!("   Set ALLOWED_HOSTS to a comma-separated list of host patterns");
            std::process::exit(1);
        }
    };

    let http_client = match build_http_client() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("❌ Failed to build HTTP client: {err}");
            std::process::exit(1);
        }
    };

    server::print_startup_info(&args, &settings, &whitelist);

    // Initialize rate limiter and connection cap
    let rate_limiter = RateLimiter::new();
    let connection_limiter = ConnectionLimiter::new(args.max_connections);

    // Bind to address
    let bind_ip: std::net::IpAddr = match args.bind.parse() {
        Ok(ip) => ip,
        Err(_) => {
            eprintln!("❌ Invalid bind address: '{}'", args.bind);
            std::process::exit(1);
        }
    };
    let bind_addr = SocketAddr::from((bind_ip, args.listen));
    let listener = match TcpListener::bind(bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("❌ Failed to bind to port {}: {}", args.listen, err);
            std::process::exit(1);
        }
    };

    println!("✅ HostGate is running on port {}", args.listen);

    // Accept connections
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                eprintln!("⚠️  Failed to accept connection: {err}");
                continue;
            }
        };

        let permit = connection_limiter.try_acquire();
        if connection_limiter.is_enabled() && permit.is_none() {
            warn!(client = %addr.ip(), "connection limit reached, dropping connection");
            continue;
        }

        if args.verbose && !args.quiet {
            println!("📡 New connection from {addr}");
        }

        let io = TokioIo::new(stream);
        let whitelist = whitelist.clone();
        let limiter = rate_limiter.clone();
        let http_client = http_client.clone();

        tokio::task::spawn(async move {
            // Held for the lifetime of the connection task.
            let _permit = permit;

            let service = service_fn(move |req| {
                handle_request(
                    req,
                    addr.ip().to_string(),
                    whitelist.clone(),
                    limiter.clone(),
                    settings,
                    http_client.clone(),
                )
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                warn!(client = %addr.ip(), error = %err, "connection error");
            }
        });
    }
}
