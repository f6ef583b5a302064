//! CLI administration tool for WSS13 Framework services.
//!
//! Inspects the security configuration the server would start with, without
//! starting it.
//!
//! # Usage
//!
//! ```bash
//! # Show the effective configuration
//! cargo run --bin wss13-admin -- config
//!
//! # Show the headers written on a POST response
//! cargo run --bin wss13-admin -- headers --method POST
//!
//! # Print the Content-Security-Policy, one directive per line
//! cargo run --bin wss13-admin -- csp
//!
//! # Check whether a Host header value would be accepted
//! cargo run --bin wss13-admin -- host api.wss13.com.br:443
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (see `wss13_framework::config`),
//! including a `.env` file if present.

use wss13_framework::config::{self, Config};
use wss13_framework::policy::host::strip_port;
use wss13_framework::policy::{ContentSecurityPolicy, SecurityHeaders, TrustedHosts};

use anyhow::{Context, Result};
use axum::http::{HeaderMap, Method};
use clap::{Parser, Subcommand};
use colored::*;
use std::process::ExitCode;
use std::time::Duration;

/// CLI tool for inspecting WSS13 Framework security settings.
#[derive(Parser)]
#[command(name = "wss13-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show the effective configuration
    Config,

    /// Show the security headers written on every response
    Headers {
        /// Request method used to pick the Cache-Control value
        #[arg(short, long, default_value = "GET")]
        method: String,
    },

    /// Print the Content-Security-Policy
    Csp,

    /// Check a Host header value against the allow-list
    Host {
        /// Host header value, optionally with a port
        host: String,
    },
}

fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config => show_config(&load_config()?),
        Commands::Headers { method } => show_headers(&method)?,
        Commands::Csp => show_csp(),
        Commands::Host { host } => return check_host(&load_config()?, &host),
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config() -> Result<Config> {
    config::load_from_env().context("Failed to load configuration")
}

/// Prints server and security settings.
fn show_config(config: &Config) {
    let security = &config.security;

    println!("{}", "Server".bright_blue().bold());
    println!("  {:<24} {}", "Listen address:", config.listen_addr);
    println!("  {:<24} {}", "Log level:", config.log_level);
    println!("  {:<24} {}", "Log format:", config.log_format);
    println!();

    println!("{}", "Trusted hosts".bright_blue().bold());
    for host in &security.allowed_hosts {
        println!("  - {}", host.cyan());
    }
    println!("  {:<24} {}", "www redirect:", yes_no(security.www_redirect));
    println!();

    println!("{}", "CORS".bright_blue().bold());
    println!(
        "  {:<24} {}",
        "Origins:",
        security.cors_allowed_origins.join(", ").cyan()
    );
    println!(
        "  {:<24} {}",
        "Methods:",
        security.cors_allowed_methods.join(", ")
    );
    println!(
        "  {:<24} {}",
        "Credentials:",
        yes_no(security.cors_allow_credentials)
    );
    println!("  {:<24} {}s", "Preflight max-age:", security.cors_max_age_seconds);
    println!();

    println!("{}", "Performance".bright_blue().bold());
    println!(
        "  {:<24} {} bytes",
        "Compression threshold:", security.compression_min_size
    );
    println!(
        "  {:<24} burst {}, 1 request per {}s",
        "Rate limit:", security.rate_limit_burst, security.rate_limit_period_seconds
    );
    println!(
        "  {:<24} {}",
        "Client key:",
        if security.behind_proxy {
            "forwarded headers"
        } else {
            "peer address"
        }
    );
}

/// Prints the header set as it would appear on a response to `method`.
fn show_headers(method: &str) -> Result<()> {
    let method = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{method}'"))?;

    let headers = SecurityHeaders::new(&ContentSecurityPolicy::standard())
        .context("Failed to build security headers")?;

    let mut map = HeaderMap::new();
    headers.apply(&mut map, &method, Duration::ZERO);

    println!(
        "{}",
        format!("Response headers for {method} requests").bright_blue().bold()
    );
    for (name, value) in &map {
        let value = value.to_str().unwrap_or("<binary>");
        let note = if name == "x-response-time" {
            " (measured per request)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {}: {}{}", name.as_str().green(), value, note);
    }

    Ok(())
}

fn show_csp() {
    let policy = ContentSecurityPolicy::standard();

    println!("{}", "Content-Security-Policy".bright_blue().bold());
    for directive in policy.directives() {
        println!(
            "  {} {}",
            directive.name.green(),
            directive.sources.join(" ")
        );
    }
}

/// Exits with failure when the host would be rejected.
fn check_host(config: &Config, raw_host: &str) -> Result<ExitCode> {
    let hosts = TrustedHosts::parse(&config.security.allowed_hosts, config.security.www_redirect)
        .context("Invalid ALLOWED_HOSTS")?;

    let host = strip_port(raw_host);

    if hosts.is_allowed(host) {
        println!("{} {}", "✓ allowed:".green().bold(), raw_host);
        Ok(ExitCode::SUCCESS)
    } else if hosts.should_redirect_to_www(host) {
        println!(
            "{} {} → www.{}",
            "↪ redirected:".yellow().bold(),
            raw_host,
            raw_host
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{} {}", "✗ rejected:".red().bold(), raw_host);
        Ok(ExitCode::FAILURE)
    }
}

fn yes_no(value: bool) -> ColoredString {
    if value { "yes".green() } else { "no".red() }
}
