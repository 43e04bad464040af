use crate::{args::Args, env_vars};
use hostgate_core::{ProxySettings, Whitelist, defaults};
use std::env;

/// Print startup banner with configuration
pub fn print_startup_info(args: &Args, settings: &ProxySettings, whitelist: &Whitelist) {
    if args.quiet {
        // Quiet mode: only essential information
        println!(
            "🚀 HostGate v{} starting on port {}",
            env!("CARGO_PKG_VERSION"),
            args.listen
        );
        return;
    }

    // Normal/verbose mode: full configuration display
    println!("🛡️  {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("   {}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("📡 Network Configuration:");
    println!("   Bind Address:   {}", args.bind);
    println!("   Listen Port:    {}", args.listen);
    if args.max_connections > 0 {
        println!("   Max Conns:      {}", args.max_connections);
    } else {
        println!("   Max Conns:      unlimited");
    }
    println!();

    println!("⚡ Rate Limiting:");
    println!(
        "   Max Requests:   {} per {} ms",
        settings.rate_limit.max_requests,
        settings.rate_limit.window_ms()
    );

    println!("🔧 Upstream Configuration:");
    println!("   Timeout:        {} ms", settings.upstream.timeout_ms());
    println!("   Scheme:         https (forced, no explicit ports)");
    println!("   Redirects:      up to {}", defaults::MAX_REDIRECTS);

    print_whitelist(whitelist);

    // Show environment configuration in verbose mode
    if args.verbose {
        print_env_config();
    }

    println!();
    println!("🚀 Server starting...");
}

/// Print the compiled whitelist summary
fn print_whitelist(whitelist: &Whitelist) {
    println!("🔒 Allowed Hosts ({} patterns):", whitelist.len());
    for source in whitelist.sources() {
        println!("   - {source}");
    }
}

/// Print environment variable configuration status (used in verbose mode)
fn print_env_config() {
    println!();
    println!("🔧 Environment Variables:");

    for &var_name in env_vars::all_env_vars() {
        match env::var(var_name) {
            Ok(value) => {
                println!("   {:<22} = {}", var_name, value);
            }
            Err(_) => {
                println!("   {:<22} = [NOT SET]", var_name);
            }
        }
    }
}
